//! Typed entity headers for Kanri.
//!
//! The metadata codec hands loosely-shaped headers to this crate's concrete
//! per-kind record types; nothing past this boundary works with an untyped
//! map.

pub mod header;
pub mod status;

pub use header::{EntityKind, EpicHeader, PrdHeader, TaskHeader};
pub use status::{Effort, PrdStatus, WorkStatus};
