//! Dependency and status engine.
//!
//! Pure computations over an epic's task set: status partitioning, the
//! ready set, cycle and conflict validation, and the epic-level summary.
//! Everything is recomputed fresh from the caller's snapshot on every
//! query; the engine holds no state and performs no I/O.

pub mod graph;
pub mod status;

pub use graph::{check_acyclic, validate_task_edges};
pub use status::{
    calculate_progress, categorize, ready_set, summarize, unmet_dependencies, EpicSummary,
    StatusBuckets,
};

use kanri_common_core::TaskNumber;
use kanri_entities::TaskHeader;

/// An epic's task set, as the engine consumes it.
pub type TaskSet = [(TaskNumber, TaskHeader)];
