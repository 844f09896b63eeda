//! The entity store proper.

use crate::config::ProjectConfig;
use kanri_codec as codec;
use kanri_common_core::{Error, Result, Slug, TaskNumber};
use kanri_common_fs as fs_util;
use kanri_entities::{EntityKind, EpicHeader, PrdHeader, TaskHeader};
use std::path::PathBuf;
use tracing::debug;

/// Seed content for `memory_bank.md`, written once by `init_project`.
const MEMORY_BANK_TEMPLATE: &str = "\
# Memory Bank

Long-lived project context. Append notes that future sessions should see;
structured planning state lives in `prds/` and `epics/`.
";

const EPIC_FILE: &str = "epic.md";

/// File-backed repository for PRDs, epics, and tasks.
///
/// The only component permitted I/O. All writes are whole-file and atomic;
/// all reads load fresh from disk.
#[derive(Debug, Clone)]
pub struct EntityStore {
    config: ProjectConfig,
}

impl EntityStore {
    /// Store over an explicit project configuration.
    pub fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    /// The project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    // ===== Path composition (pure, no I/O) =====

    /// Compose the path for an entity. Pure; performs no I/O and no
    /// existence check.
    ///
    /// `child` selects a task file within an epic and is ignored for other
    /// kinds.
    pub fn locate(&self, kind: EntityKind, id: &str, child: Option<TaskNumber>) -> PathBuf {
        let base = self.config.claude_dir();
        match (kind, child) {
            (EntityKind::Prd, _) => base.join("prds").join(format!("{id}.md")),
            (EntityKind::Epic, None) | (EntityKind::Task, None) => {
                base.join("epics").join(id).join(EPIC_FILE)
            }
            (EntityKind::Epic, Some(n)) | (EntityKind::Task, Some(n)) => {
                base.join("epics").join(id).join(format!("{n}.md"))
            }
        }
    }

    fn prds_dir(&self) -> PathBuf {
        self.config.claude_dir().join("prds")
    }

    fn epics_dir(&self) -> PathBuf {
        self.config.claude_dir().join("epics")
    }

    fn epic_dir(&self, epic: &Slug) -> PathBuf {
        self.epics_dir().join(epic.as_str())
    }

    // ===== Layout =====

    /// Create the top-level `.claude` layout. Idempotent: a second call
    /// succeeds and changes nothing.
    pub fn init_project(&self) -> Result<()> {
        fs_util::ensure_dir(self.prds_dir())?;
        fs_util::ensure_dir(self.epics_dir())?;

        let memory_bank = self.config.claude_dir().join("memory_bank.md");
        if !memory_bank.exists() {
            fs_util::write_string_atomic(&memory_bank, MEMORY_BANK_TEMPLATE)?;
        }
        debug!(root = %self.config.root().display(), "project layout initialized");
        Ok(())
    }

    /// True once `init_project` has run for this root.
    pub fn is_initialized(&self) -> bool {
        self.prds_dir().is_dir() && self.epics_dir().is_dir()
    }

    // ===== Existence =====

    /// True when the PRD's backing file exists.
    pub fn prd_exists(&self, slug: &Slug) -> bool {
        self.locate(EntityKind::Prd, slug.as_str(), None).is_file()
    }

    /// True when the epic's header file exists.
    pub fn epic_exists(&self, slug: &Slug) -> bool {
        self.locate(EntityKind::Epic, slug.as_str(), None).is_file()
    }

    /// True when the task's backing file exists.
    pub fn task_exists(&self, epic: &Slug, task: TaskNumber) -> bool {
        self.locate(EntityKind::Task, epic.as_str(), Some(task))
            .is_file()
    }

    // ===== Enumeration =====

    /// Identifiers of all stored PRDs, sorted.
    pub fn list_prds(&self) -> Result<Vec<Slug>> {
        let mut slugs = Vec::new();
        for path in fs_util::list_files(self.prds_dir())? {
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = fs_util::file_stem(&path) {
                if let Ok(slug) = Slug::validate(&stem) {
                    slugs.push(slug);
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    /// Identifiers of all stored epics, sorted.
    pub fn list_epics(&self) -> Result<Vec<Slug>> {
        let mut slugs = Vec::new();
        for path in fs_util::list_dirs(self.epics_dir())? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Only directories that actually hold an epic header count.
            if !path.join(EPIC_FILE).is_file() {
                continue;
            }
            if let Ok(slug) = Slug::validate(name) {
                slugs.push(slug);
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    /// Task numbers within an epic, sorted numerically (001 < 002 < 010).
    pub fn list_tasks(&self, epic: &Slug) -> Result<Vec<TaskNumber>> {
        if !self.epic_exists(epic) {
            return Err(Error::not_found("epic", epic.as_str()));
        }
        let mut numbers = Vec::new();
        for path in fs_util::list_files(self.epic_dir(epic))? {
            if path.file_name().and_then(|n| n.to_str()) == Some(EPIC_FILE) {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = fs_util::file_stem(&path) {
                if let Ok(number) = TaskNumber::parse(&stem) {
                    numbers.push(number);
                }
            }
        }
        numbers.sort();
        Ok(numbers)
    }

    /// The lowest unused task number in an epic.
    pub fn next_task_number(&self, epic: &Slug) -> Result<TaskNumber> {
        let used = self.list_tasks(epic)?;
        let next_index = used.last().map(|n| n.index() + 1).unwrap_or(1);
        TaskNumber::new(next_index)
    }

    // ===== PRD I/O =====

    /// Read a PRD, validating its header.
    pub fn read_prd(&self, slug: &Slug) -> Result<(PrdHeader, String)> {
        let path = self.locate(EntityKind::Prd, slug.as_str(), None);
        if !path.is_file() {
            return Err(Error::not_found("prd", slug.as_str()));
        }
        let raw = fs_util::read_to_string(&path)?;
        codec::validate_and_decode("prd", slug.as_str(), &raw)
    }

    /// Write a PRD, replacing any existing file.
    pub fn write_prd(&self, slug: &Slug, header: &PrdHeader, body: &str) -> Result<()> {
        let path = self.locate(EntityKind::Prd, slug.as_str(), None);
        let raw = codec::encode_typed(header, body)?;
        fs_util::write_string_atomic(path, &raw)
    }

    /// Create a new PRD. Fails with `AlreadyExists` when the slug is taken;
    /// creation is never implicitly idempotent.
    pub fn create_prd(&self, slug: &Slug, header: &PrdHeader, body: &str) -> Result<()> {
        if self.prd_exists(slug) {
            return Err(Error::already_exists("prd", slug.as_str()));
        }
        self.write_prd(slug, header, body)
    }

    /// Delete a PRD.
    pub fn delete_prd(&self, slug: &Slug) -> Result<()> {
        let path = self.locate(EntityKind::Prd, slug.as_str(), None);
        if !fs_util::remove_file_if_exists(path)? {
            return Err(Error::not_found("prd", slug.as_str()));
        }
        Ok(())
    }

    // ===== Epic I/O =====

    /// Read an epic header file, validating its header.
    pub fn read_epic(&self, slug: &Slug) -> Result<(EpicHeader, String)> {
        let path = self.locate(EntityKind::Epic, slug.as_str(), None);
        if !path.is_file() {
            return Err(Error::not_found("epic", slug.as_str()));
        }
        let raw = fs_util::read_to_string(&path)?;
        codec::validate_and_decode("epic", slug.as_str(), &raw)
    }

    /// Write an epic header file, replacing any existing one.
    pub fn write_epic(&self, slug: &Slug, header: &EpicHeader, body: &str) -> Result<()> {
        let path = self.locate(EntityKind::Epic, slug.as_str(), None);
        let raw = codec::encode_typed(header, body)?;
        fs_util::write_string_atomic(path, &raw)
    }

    /// Create a new epic.
    pub fn create_epic(&self, slug: &Slug, header: &EpicHeader, body: &str) -> Result<()> {
        if self.epic_exists(slug) {
            return Err(Error::already_exists("epic", slug.as_str()));
        }
        self.write_epic(slug, header, body)
    }

    /// Delete an epic and every task under it.
    pub fn delete_epic(&self, slug: &Slug) -> Result<()> {
        if !fs_util::remove_dir_if_exists(self.epic_dir(slug))? {
            return Err(Error::not_found("epic", slug.as_str()));
        }
        Ok(())
    }

    // ===== Task I/O =====

    /// Read a task, validating its header.
    pub fn read_task(&self, epic: &Slug, task: TaskNumber) -> Result<(TaskHeader, String)> {
        let path = self.locate(EntityKind::Task, epic.as_str(), Some(task));
        if !path.is_file() {
            return Err(Error::not_found("task", format!("{}/{}", epic, task)));
        }
        let raw = fs_util::read_to_string(&path)?;
        codec::validate_and_decode("task", &task.to_string(), &raw)
    }

    /// Read every task of an epic, paired with its number.
    pub fn read_all_tasks(&self, epic: &Slug) -> Result<Vec<(TaskNumber, TaskHeader)>> {
        let mut tasks = Vec::new();
        for number in self.list_tasks(epic)? {
            let (header, _) = self.read_task(epic, number)?;
            tasks.push((number, header));
        }
        Ok(tasks)
    }

    /// Write a task, replacing any existing file. The epic must exist.
    pub fn write_task(
        &self,
        epic: &Slug,
        task: TaskNumber,
        header: &TaskHeader,
        body: &str,
    ) -> Result<()> {
        if !self.epic_exists(epic) {
            return Err(Error::not_found("epic", epic.as_str()));
        }
        let path = self.locate(EntityKind::Task, epic.as_str(), Some(task));
        let raw = codec::encode_typed(header, body)?;
        fs_util::write_string_atomic(path, &raw)
    }

    /// Create a new task.
    pub fn create_task(
        &self,
        epic: &Slug,
        task: TaskNumber,
        header: &TaskHeader,
        body: &str,
    ) -> Result<()> {
        if self.task_exists(epic, task) {
            return Err(Error::already_exists("task", format!("{}/{}", epic, task)));
        }
        self.write_task(epic, task, header, body)
    }

    /// Delete a task.
    pub fn delete_task(&self, epic: &Slug, task: TaskNumber) -> Result<()> {
        let path = self.locate(EntityKind::Task, epic.as_str(), Some(task));
        if !fs_util::remove_file_if_exists(path)? {
            return Err(Error::not_found("task", format!("{}/{}", epic, task)));
        }
        Ok(())
    }
}
