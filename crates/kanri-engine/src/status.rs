//! Status partitioning, ready set, and epic summary.

use crate::TaskSet;
use kanri_common_core::TaskNumber;
use kanri_entities::WorkStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tasks partitioned by status category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBuckets {
    pub completed: Vec<TaskNumber>,
    pub in_progress: Vec<TaskNumber>,
    pub blocked: Vec<TaskNumber>,
    /// The default bucket.
    pub open: Vec<TaskNumber>,
}

/// Partition a task set into status buckets, each sorted by task number.
pub fn categorize(tasks: &TaskSet) -> StatusBuckets {
    let mut buckets = StatusBuckets::default();
    for (number, header) in tasks {
        let bucket = match header.status {
            WorkStatus::Completed => &mut buckets.completed,
            WorkStatus::InProgress => &mut buckets.in_progress,
            WorkStatus::Blocked => &mut buckets.blocked,
            WorkStatus::Open => &mut buckets.open,
        };
        bucket.push(*number);
    }
    buckets.completed.sort();
    buckets.in_progress.sort();
    buckets.blocked.sort();
    buckets.open.sort();
    buckets
}

/// Open tasks whose every dependency is completed, sorted ascending.
///
/// A dependency on a task id that does not exist in the set counts as
/// unmet, so the task never becomes ready until the reference is fixed.
pub fn ready_set(tasks: &TaskSet) -> Vec<TaskNumber> {
    let completed: HashSet<String> = tasks
        .iter()
        .filter(|(_, h)| h.status.is_completed())
        .map(|(n, _)| n.to_string())
        .collect();

    let mut ready: Vec<TaskNumber> = tasks
        .iter()
        .filter(|(_, h)| h.status == WorkStatus::Open)
        .filter(|(_, h)| h.depends_on.iter().all(|dep| completed.contains(dep)))
        .map(|(n, _)| *n)
        .collect();
    ready.sort();
    ready
}

/// Dependencies of `task` that are not yet completed.
pub fn unmet_dependencies(tasks: &TaskSet, task: TaskNumber) -> Vec<String> {
    let completed: HashSet<String> = tasks
        .iter()
        .filter(|(_, h)| h.status.is_completed())
        .map(|(n, _)| n.to_string())
        .collect();

    tasks
        .iter()
        .find(|(n, _)| *n == task)
        .map(|(_, h)| {
            h.depends_on
                .iter()
                .filter(|dep| !completed.contains(*dep))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Derived epic-level status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicSummary {
    /// Completion percentage, 0-100.
    pub progress: u8,
    pub tasks_total: u32,
    pub tasks_completed: u32,
    pub tasks_in_progress: u32,
    pub tasks_blocked: u32,
    pub tasks_open: u32,
    /// True when the epic has at least one task and none outstanding.
    ///
    /// A recommendation only: closing an epic is a deliberate action with
    /// side effects (PRD status updates), so nothing in the engine or the
    /// store acts on this flag.
    pub eligible_for_closure: bool,
}

/// `round(100 * completed / total)`, 0 when the epic has no tasks.
pub fn calculate_progress(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Summarize an epic's task set.
pub fn summarize(tasks: &TaskSet) -> EpicSummary {
    let buckets = categorize(tasks);
    let total = tasks.len() as u32;
    let completed = buckets.completed.len() as u32;

    EpicSummary {
        progress: calculate_progress(completed, total),
        tasks_total: total,
        tasks_completed: completed,
        tasks_in_progress: buckets.in_progress.len() as u32,
        tasks_blocked: buckets.blocked.len() as u32,
        tasks_open: buckets.open.len() as u32,
        eligible_for_closure: total > 0 && completed == total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanri_entities::TaskHeader;
    use test_case::test_case;

    fn task(n: u16, status: WorkStatus, deps: &[&str]) -> (TaskNumber, TaskHeader) {
        let mut header = TaskHeader::new(format!("Task {n}"));
        header.status = status;
        header.depends_on = deps.iter().map(|d| d.to_string()).collect();
        (TaskNumber::new(n).unwrap(), header)
    }

    #[test]
    fn test_categorize_defaults_to_open() {
        let tasks = vec![
            task(1, WorkStatus::Completed, &[]),
            task(2, WorkStatus::Open, &[]),
            task(3, WorkStatus::InProgress, &[]),
            task(4, WorkStatus::Blocked, &[]),
            task(5, WorkStatus::Open, &[]),
        ];
        let buckets = categorize(&tasks);
        assert_eq!(buckets.completed.len(), 1);
        assert_eq!(buckets.in_progress.len(), 1);
        assert_eq!(buckets.blocked.len(), 1);
        assert_eq!(buckets.open.len(), 2);
    }

    #[test]
    fn test_ready_set_gates_on_dependencies() {
        // B depends on A: excluded while A is open, included once A completes.
        let before = vec![task(1, WorkStatus::Open, &[]), task(2, WorkStatus::Open, &["001"])];
        assert_eq!(ready_set(&before), vec![TaskNumber::new(1).unwrap()]);

        let after = vec![
            task(1, WorkStatus::Completed, &[]),
            task(2, WorkStatus::Open, &["001"]),
        ];
        assert_eq!(ready_set(&after), vec![TaskNumber::new(2).unwrap()]);
    }

    #[test]
    fn test_ready_set_excludes_non_open_tasks() {
        let tasks = vec![
            task(1, WorkStatus::Completed, &[]),
            task(2, WorkStatus::InProgress, &[]),
            task(3, WorkStatus::Blocked, &[]),
        ];
        assert!(ready_set(&tasks).is_empty());
    }

    #[test]
    fn test_ready_set_sorted_ascending() {
        let tasks = vec![
            task(10, WorkStatus::Open, &[]),
            task(2, WorkStatus::Open, &[]),
            task(1, WorkStatus::Open, &[]),
        ];
        let ready: Vec<String> = ready_set(&tasks).iter().map(|n| n.to_string()).collect();
        assert_eq!(ready, vec!["001", "002", "010"]);
    }

    #[test]
    fn test_missing_dependency_counts_as_unmet() {
        let tasks = vec![task(1, WorkStatus::Open, &["099"])];
        assert!(ready_set(&tasks).is_empty());
        assert_eq!(
            unmet_dependencies(&tasks, TaskNumber::new(1).unwrap()),
            vec!["099"]
        );
    }

    #[test_case(0, 0, 0; "no tasks")]
    #[test_case(0, 3, 0; "none done")]
    #[test_case(1, 3, 33; "one third")]
    #[test_case(2, 3, 67; "two thirds")]
    #[test_case(3, 3, 100; "all done")]
    fn test_calculate_progress(completed: u32, total: u32, expected: u8) {
        assert_eq!(calculate_progress(completed, total), expected);
    }

    #[test]
    fn test_progress_never_decreases_when_completing_open_task() {
        let mut tasks = vec![
            task(1, WorkStatus::Completed, &[]),
            task(2, WorkStatus::Open, &[]),
            task(3, WorkStatus::Open, &[]),
        ];
        let before = summarize(&tasks).progress;
        tasks[1].1.status = WorkStatus::Completed;
        let after = summarize(&tasks).progress;
        assert!(after >= before);
    }

    #[test]
    fn test_summary_closure_eligibility() {
        // No tasks: not eligible, progress 0.
        let empty: Vec<(TaskNumber, TaskHeader)> = Vec::new();
        let summary = summarize(&empty);
        assert_eq!(summary.progress, 0);
        assert!(!summary.eligible_for_closure);

        // Outstanding work: not eligible.
        let partial = vec![
            task(1, WorkStatus::Completed, &[]),
            task(2, WorkStatus::InProgress, &[]),
        ];
        assert!(!summarize(&partial).eligible_for_closure);

        // All complete: eligible, but that is only a recommendation.
        let done = vec![
            task(1, WorkStatus::Completed, &[]),
            task(2, WorkStatus::Completed, &[]),
        ];
        let summary = summarize(&done);
        assert!(summary.eligible_for_closure);
        assert_eq!(summary.progress, 100);
    }
}
