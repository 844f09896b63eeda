//! Project workbench.
//!
//! [`Workspace`] is the seam a conversational or CLI surface would call:
//! it ties the store, the dependency engine, and the audit ledger together.
//! Every mutating operation validates fully before the first byte is
//! persisted and produces exactly one audit entry, success or failure.
//! Read operations recompute from disk on every call and are not audited.

pub mod catalog;
pub mod workspace;

pub use catalog::default_registry;
pub use workspace::Workspace;

pub use kanri_engine::EpicSummary;
