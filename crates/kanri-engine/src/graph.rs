//! Dependency graph validation.

use crate::TaskSet;
use kanri_common_core::{Error, Result, TaskNumber};
use kanri_entities::TaskHeader;
use std::collections::{HashMap, HashSet};

/// Validate a proposed edge set for `task` against the rest of the epic.
///
/// Runs the local checks (id shape, `depends_on`/`conflicts_with` overlap)
/// and then cycle detection over the whole epic with the proposed edges in
/// place. Intended to run before any write is committed.
pub fn validate_task_edges(
    epic: &str,
    task: TaskNumber,
    header: &TaskHeader,
    tasks: &TaskSet,
) -> Result<()> {
    header.validate_edges(&task.to_string())?;
    check_acyclic(epic, task, &header.depends_on, tasks)
}

/// Reject a proposed `depends_on` set for `task` if it would create a cycle.
///
/// Depth-first reachability from each proposed dependency back to `task`,
/// with a visited set shared across roots so each node and edge is
/// examined once: O(V+E) per check. The error names the full cycle path.
pub fn check_acyclic(
    epic: &str,
    task: TaskNumber,
    proposed_deps: &[String],
    tasks: &TaskSet,
) -> Result<()> {
    let task_id = task.to_string();

    // Adjacency with the candidate's edges replaced by the proposal.
    let mut adjacency: HashMap<String, &[String]> = tasks
        .iter()
        .map(|(n, h)| (n.to_string(), h.depends_on.as_slice()))
        .collect();
    adjacency.insert(task_id.clone(), proposed_deps);

    let mut visited = HashSet::new();
    for dep in proposed_deps {
        let mut path = Vec::new();
        if reaches(&adjacency, dep, &task_id, &mut visited, &mut path) {
            let mut cycle = vec![task_id.clone()];
            cycle.extend(path);
            return Err(Error::CircularDependency {
                epic: epic.to_string(),
                task: task_id,
                cycle,
            });
        }
    }
    Ok(())
}

/// DFS from `node` looking for `target`; on success `path` holds the route
/// from `node` to `target` inclusive.
fn reaches(
    adjacency: &HashMap<String, &[String]>,
    node: &str,
    target: &str,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> bool {
    if node == target {
        path.push(node.to_string());
        return true;
    }
    if !visited.insert(node.to_string()) {
        return false;
    }
    path.push(node.to_string());
    if let Some(deps) = adjacency.get(node) {
        for dep in deps.iter() {
            if reaches(adjacency, dep, target, visited, path) {
                return true;
            }
        }
    }
    path.pop();
    false
}
