//! Per-kind entity header records.

use crate::status::{Effort, PrdStatus, WorkStatus};
use kanri_common_core::{Error, Result, TaskNumber, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The kinds of stored entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Prd,
    Epic,
    Task,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prd => "prd",
            Self::Epic => "epic",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Header of a requirement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdHeader {
    /// Canonical slug, identical to the file name.
    pub name: String,
    pub status: PrdStatus,
    pub created: Timestamp,
    pub updated: Timestamp,
}

impl PrdHeader {
    /// New draft PRD, created and updated now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            name: name.into(),
            status: PrdStatus::Draft,
            created: now,
            updated: now,
        }
    }
}

/// Header of an epic.
///
/// `progress` and the task counters are derived from the epic's task set;
/// the store refreshes them from the engine's summary, never from caller
/// input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicHeader {
    /// Canonical slug, identical to the directory name.
    pub name: String,
    pub status: WorkStatus,
    pub created: Timestamp,
    pub updated: Timestamp,
    /// Derived completion percentage, 0-100.
    #[serde(default)]
    pub progress: u8,
    /// Derived total task count.
    #[serde(default)]
    pub tasks_total: u32,
    /// Derived completed task count.
    #[serde(default)]
    pub tasks_completed: u32,
    /// Slug of the PRD this epic was decomposed from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prd: Option<String>,
}

impl EpicHeader {
    /// New open epic, created and updated now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            name: name.into(),
            status: WorkStatus::Open,
            created: now,
            updated: now,
            progress: 0,
            tasks_total: 0,
            tasks_completed: 0,
            prd: None,
        }
    }

    /// Link this epic to the PRD it came from.
    pub fn with_prd(mut self, prd: impl Into<String>) -> Self {
        self.prd = Some(prd.into());
        self
    }
}

/// Header of a task within an epic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHeader {
    /// Human-readable task name (free text, not a slug).
    pub name: String,
    pub status: WorkStatus,
    pub created: Timestamp,
    pub updated: Timestamp,
    /// Task numbers that must be completed before this one starts.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Task numbers that must not run concurrently with this one.
    #[serde(default)]
    pub conflicts_with: Vec<String>,
    /// Hint that the task can run in parallel with others.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<Effort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl TaskHeader {
    /// New open task, created and updated now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            name: name.into(),
            status: WorkStatus::Open,
            created: now,
            updated: now,
            depends_on: Vec::new(),
            conflicts_with: Vec::new(),
            parallel: false,
            effort: None,
            assignee: None,
        }
    }

    /// Validate edge-set shape for the task identified by `id`.
    ///
    /// Checks that every referenced id parses as a task number and that
    /// `depends_on` and `conflicts_with` do not intersect. Cycle detection
    /// is the engine's job; this is purely local.
    pub fn validate_edges(&self, id: &str) -> Result<()> {
        for referenced in self.depends_on.iter().chain(&self.conflicts_with) {
            TaskNumber::parse(referenced)?;
        }

        let deps: HashSet<&String> = self.depends_on.iter().collect();
        for conflicting in &self.conflicts_with {
            if deps.contains(conflicting) {
                return Err(Error::ConflictOverlap {
                    task: id.to_string(),
                    overlapping: conflicting.clone(),
                });
            }
        }
        Ok(())
    }
}
