//! The on-disk ledger.

use crate::entry::AuditEntry;
use kanri_common_core::Result;
use kanri_common_fs as fs_util;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Fixed header written when the ledger is created or reset.
const LEDGER_HEADER: &str = "\
# Audit Log

Append-only record of every mutating operation for this project.

";

/// How many recent operation names `stats` reports.
const RECENT_OPERATIONS: usize = 10;

/// Append-only audit ledger backed by a single markdown file.
///
/// Appends go through read-then-append-then-atomic-rename of the whole
/// file, so a torn write can never corrupt earlier entries. The file is
/// expected to stay small over one project's lifetime; every query is a
/// full scan.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

/// Aggregate counts over the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_entries: usize,
    pub successes: usize,
    pub failures: usize,
    /// Most recent operation names, newest first.
    pub recent_operations: Vec<String>,
}

impl AuditLog {
    /// Ledger at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, initializing the ledger with its fixed header on
    /// first use.
    pub fn record(&self, entry: &AuditEntry) -> Result<()> {
        let mut content = if self.path.is_file() {
            fs_util::read_to_string(&self.path)?
        } else {
            LEDGER_HEADER.to_string()
        };
        content.push_str(&entry.render());
        content.push('\n');
        fs_util::write_string_atomic(&self.path, &content)
    }

    /// Append an entry; on failure, log and carry on.
    ///
    /// The operation an entry describes must never fail because its audit
    /// record could not be written.
    pub fn record_best_effort(&self, entry: &AuditEntry) {
        if let Err(e) = self.record(entry) {
            warn!(
                operation = %entry.operation,
                error = %e,
                "failed to append audit entry; continuing"
            );
        }
    }

    /// Entries most-recent-first, optionally filtered by operation-name
    /// substring and capped at `limit`.
    pub fn query(&self, operation: Option<&str>, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        if let Some(filter) = operation {
            entries.retain(|e| e.operation.contains(filter));
        }
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Counts and recent operation names, by full scan.
    pub fn stats(&self) -> Result<AuditStats> {
        let entries = self.read_all()?;
        let successes = entries.iter().filter(|e| e.success).count();
        let recent_operations = entries
            .iter()
            .rev()
            .take(RECENT_OPERATIONS)
            .map(|e| e.operation.clone())
            .collect();
        Ok(AuditStats {
            total_entries: entries.len(),
            successes,
            failures: entries.len() - successes,
            recent_operations,
        })
    }

    /// Destroy all entries and reinitialize the header. The only way
    /// entries are ever removed.
    pub fn reset(&self) -> Result<()> {
        fs_util::write_string_atomic(&self.path, LEDGER_HEADER)
    }

    fn read_all(&self) -> Result<Vec<AuditEntry>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let content = fs_util::read_to_string(&self.path)?;
        Ok(AuditEntry::parse_all(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ledger_in(dir: &tempfile::TempDir) -> AuditLog {
        AuditLog::new(dir.path().join("audit.md"))
    }

    #[test]
    fn test_record_initializes_header_once() {
        let dir = tempdir().unwrap();
        let log = ledger_in(&dir);

        log.record(&AuditEntry::success("init_project", "layout created"))
            .unwrap();
        log.record(&AuditEntry::success("create_epic", "created epic"))
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.matches("# Audit Log").count(), 1);
        assert_eq!(content.matches("## [").count(), 2);
    }

    #[test]
    fn test_query_most_recent_first() {
        let dir = tempdir().unwrap();
        let log = ledger_in(&dir);

        for op in ["first", "second", "third"] {
            log.record(&AuditEntry::success(op, "details")).unwrap();
        }

        let entries = log.query(None, None).unwrap();
        let ops: Vec<&str> = entries.iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(ops, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_query_filter_and_limit() {
        let dir = tempdir().unwrap();
        let log = ledger_in(&dir);

        log.record(&AuditEntry::success("create_epic", "x")).unwrap();
        log.record(&AuditEntry::success("create_task", "x")).unwrap();
        log.record(&AuditEntry::success("delete_task", "x")).unwrap();

        let tasks = log.query(Some("task"), None).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|e| e.operation.contains("task")));

        let capped = log.query(None, Some(1)).unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].operation, "delete_task");
    }

    #[test]
    fn test_stats_counts_match_records() {
        let dir = tempdir().unwrap();
        let log = ledger_in(&dir);

        log.record(&AuditEntry::success("create_epic", "x")).unwrap();
        log.record(&AuditEntry::failure("create_task", "x", "boom"))
            .unwrap();
        log.record(&AuditEntry::success("set_task_status", "x"))
            .unwrap();

        let stats = log.stats().unwrap();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.recent_operations[0], "set_task_status");
    }

    #[test]
    fn test_reset_destroys_entries() {
        let dir = tempdir().unwrap();
        let log = ledger_in(&dir);

        log.record(&AuditEntry::success("create_epic", "x")).unwrap();
        log.reset().unwrap();

        assert_eq!(log.stats().unwrap().total_entries, 0);
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("# Audit Log"));
    }

    #[test]
    fn test_stats_on_missing_file() {
        let dir = tempdir().unwrap();
        let log = ledger_in(&dir);
        let stats = log.stats().unwrap();
        assert_eq!(stats.total_entries, 0);
        assert!(stats.recent_operations.is_empty());
    }

    #[test]
    fn test_best_effort_record_swallows_errors() {
        // Point the ledger at a path whose parent is a file, so the write
        // must fail; the call still returns.
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let log = AuditLog::new(blocker.join("audit.md"));
        log.record_best_effort(&AuditEntry::success("create_epic", "x"));
    }
}
