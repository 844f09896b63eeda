//! Append-only audit ledger.
//!
//! Every mutating operation against the store produces exactly one entry,
//! success or failure. Entries are only ever appended; `reset` is the one
//! operation that removes them. Recording is best-effort from the primary
//! operation's point of view: a ledger write failure is logged to the
//! diagnostic stream, never propagated.

pub mod entry;
pub mod ledger;

pub use entry::AuditEntry;
pub use ledger::{AuditLog, AuditStats};
