//! File-backed entity store.
//!
//! Entities live under `<project-root>/.claude/`:
//!
//! ```text
//! .claude/
//!   prds/<slug>.md
//!   epics/<slug>/epic.md
//!   epics/<slug>/<NNN>.md
//!   memory_bank.md
//! ```
//!
//! The directory names are part of the compatibility surface. Every read
//! loads fresh from disk; there is no cache to invalidate.

pub mod config;
pub mod store;

pub use config::ProjectConfig;
pub use store::EntityStore;
