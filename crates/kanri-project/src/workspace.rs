//! The audited workbench over a single project.

use kanri_audit::{AuditEntry, AuditLog, AuditStats};
use kanri_common_core::{Error, Result, Slug, TaskNumber, Timestamp};
use kanri_engine::{self as engine, EpicSummary};
use kanri_entities::{PrdHeader, PrdStatus, TaskHeader, WorkStatus};
use kanri_store::{EntityStore, ProjectConfig};
use tracing::info;

/// File name of the audit ledger inside the `.claude` directory.
const AUDIT_FILE: &str = "audit.md";

/// A project workbench: store, engine, and ledger behind one API.
///
/// Mutating operations validate everything (identifiers, header schema,
/// dependency cycles, conflict overlap) before any write, then record one
/// audit entry whether they succeeded or failed. A ledger write failure is
/// logged and swallowed; the primary operation's result stands.
#[derive(Debug, Clone)]
pub struct Workspace {
    store: EntityStore,
    audit: AuditLog,
}

impl Workspace {
    /// Workbench over an explicit project root.
    pub fn new(config: ProjectConfig) -> Self {
        let audit = AuditLog::new(config.claude_dir().join(AUDIT_FILE));
        Self {
            store: EntityStore::new(config),
            audit,
        }
    }

    /// Walk up from `start` to find an existing project, if any.
    pub fn discover(start: impl AsRef<std::path::Path>) -> Option<Self> {
        ProjectConfig::discover(start).map(Self::new)
    }

    /// The underlying store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The audit ledger.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Record the outcome of a mutating operation and pass it through.
    fn finish<T>(
        &self,
        operation: &'static str,
        details: String,
        context: &[(&str, &str)],
        result: Result<T>,
    ) -> Result<T> {
        let mut entry = match &result {
            Ok(_) => AuditEntry::success(operation, details),
            Err(e) => AuditEntry::failure(operation, details, e.to_string()),
        };
        for (key, value) in context {
            entry = entry.with_context(*key, *value);
        }
        self.audit.record_best_effort(&entry);
        result
    }

    // ===== Mutating operations =====

    /// Create the project layout. Idempotent.
    pub fn init_project(&self) -> Result<()> {
        let result = self.store.init_project();
        if result.is_ok() {
            info!(root = %self.store.config().root().display(), "project initialized");
        }
        self.finish(
            "init_project",
            format!(
                "initialized project layout at {}",
                self.store.config().root().display()
            ),
            &[],
            result,
        )
    }

    /// Create a PRD from a raw human-supplied name. Returns the slug the
    /// PRD was stored under.
    pub fn create_prd(&self, raw_name: &str, body: &str) -> Result<Slug> {
        let result = Slug::from_raw(raw_name).and_then(|slug| {
            let header = PrdHeader::new(slug.as_str());
            self.store.create_prd(&slug, &header, body)?;
            Ok(slug)
        });
        let id = result.as_ref().map(|s| s.to_string()).unwrap_or_default();
        self.finish(
            "create_prd",
            format!("created prd from '{raw_name}'"),
            &[("prd", id.as_str())],
            result,
        )
    }

    /// Move a PRD to a new lifecycle status.
    pub fn update_prd_status(&self, prd: &str, status: PrdStatus) -> Result<()> {
        let result = Slug::validate(prd).and_then(|slug| {
            let (mut header, body) = self.store.read_prd(&slug)?;
            header.status = status;
            header.updated = Timestamp::now();
            self.store.write_prd(&slug, &header, &body)
        });
        self.finish(
            "update_prd_status",
            format!("set prd '{prd}' status to {status}"),
            &[("prd", prd)],
            result,
        )
    }

    /// Delete a PRD.
    pub fn delete_prd(&self, prd: &str) -> Result<()> {
        let result = Slug::validate(prd).and_then(|slug| self.store.delete_prd(&slug));
        self.finish(
            "delete_prd",
            format!("deleted prd '{prd}'"),
            &[("prd", prd)],
            result,
        )
    }

    /// Create an epic, optionally linked to the PRD it decomposes. The
    /// linked PRD must exist.
    pub fn create_epic(&self, raw_name: &str, prd: Option<&str>, body: &str) -> Result<Slug> {
        let result = Slug::from_raw(raw_name).and_then(|slug| {
            let mut header = kanri_entities::EpicHeader::new(slug.as_str());
            if let Some(prd) = prd {
                let prd_slug = Slug::validate(prd)?;
                if !self.store.prd_exists(&prd_slug) {
                    return Err(Error::not_found("prd", prd));
                }
                header = header.with_prd(prd);
            }
            self.store.create_epic(&slug, &header, body)?;
            Ok(slug)
        });
        let id = result.as_ref().map(|s| s.to_string()).unwrap_or_default();
        self.finish(
            "create_epic",
            format!("created epic from '{raw_name}'"),
            &[("epic", id.as_str()), ("prd", prd.unwrap_or(""))],
            result,
        )
    }

    /// Move an epic to a new status.
    ///
    /// Closure eligibility is only ever a recommendation from
    /// [`epic_status`](Self::epic_status); completing an epic goes through
    /// this deliberate call.
    pub fn set_epic_status(&self, epic: &str, status: WorkStatus) -> Result<()> {
        let result = Slug::validate(epic).and_then(|slug| {
            let (mut header, body) = self.store.read_epic(&slug)?;
            header.status = status;
            header.updated = Timestamp::now();
            self.store.write_epic(&slug, &header, &body)
        });
        self.finish(
            "set_epic_status",
            format!("set epic '{epic}' status to {status}"),
            &[("epic", epic)],
            result,
        )
    }

    /// Delete an epic and every task under it.
    pub fn delete_epic(&self, epic: &str) -> Result<()> {
        let result = Slug::validate(epic).and_then(|slug| self.store.delete_epic(&slug));
        self.finish(
            "delete_epic",
            format!("deleted epic '{epic}'"),
            &[("epic", epic)],
            result,
        )
    }

    /// Create a task under an epic, auto-assigning the next task number.
    ///
    /// Edge sets are validated against the epic's current task set before
    /// anything is written.
    pub fn create_task(&self, epic: &str, header: TaskHeader, body: &str) -> Result<TaskNumber> {
        let result = Slug::validate(epic).and_then(|slug| {
            let number = self.store.next_task_number(&slug)?;
            let tasks = self.store.read_all_tasks(&slug)?;
            engine::validate_task_edges(slug.as_str(), number, &header, &tasks)?;
            self.store.create_task(&slug, number, &header, body)?;
            self.sync_epic_header(&slug)?;
            Ok(number)
        });
        let id = result.as_ref().map(|n| n.to_string()).unwrap_or_default();
        self.finish(
            "create_task",
            format!("created task {id} in epic '{epic}'"),
            &[("epic", epic), ("task", id.as_str())],
            result,
        )
    }

    /// Replace a task's header and body wholesale.
    pub fn update_task(
        &self,
        epic: &str,
        task: TaskNumber,
        mut header: TaskHeader,
        body: &str,
    ) -> Result<()> {
        let result = Slug::validate(epic).and_then(|slug| {
            if !self.store.task_exists(&slug, task) {
                return Err(Error::not_found("task", format!("{epic}/{task}")));
            }
            let tasks = self.store.read_all_tasks(&slug)?;
            engine::validate_task_edges(slug.as_str(), task, &header, &tasks)?;
            header.updated = Timestamp::now();
            self.store.write_task(&slug, task, &header, body)?;
            self.sync_epic_header(&slug)?;
            Ok(())
        });
        let id = task.to_string();
        self.finish(
            "update_task",
            format!("updated task {id} in epic '{epic}'"),
            &[("epic", epic), ("task", id.as_str())],
            result,
        )
    }

    /// Move a task to a new status and refresh the epic's derived counters.
    pub fn set_task_status(&self, epic: &str, task: TaskNumber, status: WorkStatus) -> Result<()> {
        let result = Slug::validate(epic).and_then(|slug| {
            let (mut header, body) = self.store.read_task(&slug, task)?;
            header.status = status;
            header.updated = Timestamp::now();
            self.store.write_task(&slug, task, &header, &body)?;
            self.sync_epic_header(&slug)?;
            Ok(())
        });
        let id = task.to_string();
        self.finish(
            "set_task_status",
            format!("set task {id} in epic '{epic}' to {status}"),
            &[("epic", epic), ("task", id.as_str())],
            result,
        )
    }

    /// Delete a task and refresh the epic's derived counters.
    pub fn delete_task(&self, epic: &str, task: TaskNumber) -> Result<()> {
        let result = Slug::validate(epic).and_then(|slug| {
            self.store.delete_task(&slug, task)?;
            self.sync_epic_header(&slug)?;
            Ok(())
        });
        let id = task.to_string();
        self.finish(
            "delete_task",
            format!("deleted task {id} from epic '{epic}'"),
            &[("epic", epic), ("task", id.as_str())],
            result,
        )
    }

    /// Recompute and persist an epic's derived counters from its task set.
    pub fn refresh_epic_header(&self, epic: &str) -> Result<EpicSummary> {
        let result = Slug::validate(epic).and_then(|slug| self.sync_epic_header(&slug));
        self.finish(
            "refresh_epic_header",
            format!("refreshed derived counters for epic '{epic}'"),
            &[("epic", epic)],
            result,
        )
    }

    /// Write the engine's summary back into the epic header. Progress and
    /// task counts are never taken from caller input.
    fn sync_epic_header(&self, epic: &Slug) -> Result<EpicSummary> {
        let tasks = self.store.read_all_tasks(epic)?;
        let summary = engine::summarize(&tasks);

        let (mut header, body) = self.store.read_epic(epic)?;
        header.progress = summary.progress;
        header.tasks_total = summary.tasks_total;
        header.tasks_completed = summary.tasks_completed;
        header.updated = Timestamp::now();
        self.store.write_epic(epic, &header, &body)?;
        Ok(summary)
    }

    // ===== Read operations (not audited) =====

    /// Open tasks whose every dependency is completed, sorted ascending.
    /// Recomputed fresh from disk on every call.
    pub fn next_tasks(&self, epic: &str) -> Result<Vec<TaskNumber>> {
        let slug = Slug::validate(epic)?;
        let tasks = self.store.read_all_tasks(&slug)?;
        Ok(engine::ready_set(&tasks))
    }

    /// The epic's derived summary, including the closure recommendation.
    pub fn epic_status(&self, epic: &str) -> Result<EpicSummary> {
        let slug = Slug::validate(epic)?;
        let tasks = self.store.read_all_tasks(&slug)?;
        Ok(engine::summarize(&tasks))
    }

    /// Tasks currently marked blocked, sorted ascending.
    pub fn blocked_tasks(&self, epic: &str) -> Result<Vec<TaskNumber>> {
        let slug = Slug::validate(epic)?;
        let tasks = self.store.read_all_tasks(&slug)?;
        Ok(engine::categorize(&tasks).blocked)
    }

    /// Dependencies of a task that are not yet completed.
    pub fn unmet_dependencies(&self, epic: &str, task: TaskNumber) -> Result<Vec<String>> {
        let slug = Slug::validate(epic)?;
        let tasks = self.store.read_all_tasks(&slug)?;
        Ok(engine::unmet_dependencies(&tasks, task))
    }

    /// All PRD slugs, sorted.
    pub fn list_prds(&self) -> Result<Vec<Slug>> {
        self.store.list_prds()
    }

    /// All epic slugs, sorted.
    pub fn list_epics(&self) -> Result<Vec<Slug>> {
        self.store.list_epics()
    }

    /// Task numbers in an epic, sorted numerically.
    pub fn list_tasks(&self, epic: &str) -> Result<Vec<TaskNumber>> {
        let slug = Slug::validate(epic)?;
        self.store.list_tasks(&slug)
    }

    /// Ledger statistics.
    pub fn audit_stats(&self) -> Result<AuditStats> {
        self.audit.stats()
    }
}
