//! Error types for Kanri.
//!
//! Every variant carries the entity kind and identifier involved plus a
//! concrete remedy, so callers can surface the message unmodified.

use thiserror::Error;

/// The main error type for Kanri operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested entity does not exist on disk.
    #[error("{kind} '{id}' not found; run a list operation to see available {kind}s, or create it first")]
    NotFound {
        /// Entity kind ("prd", "epic", "task").
        kind: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Creation targeted an identifier that is already in use.
    #[error("{kind} '{id}' already exists; choose a different name or update the existing {kind}")]
    AlreadyExists {
        /// Entity kind.
        kind: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// A metadata header failed schema validation.
    #[error("{kind} '{id}' has an invalid header field '{field}': {reason}; fix the field and retry")]
    SchemaViolation {
        /// Entity kind.
        kind: &'static str,
        /// Entity identifier.
        id: String,
        /// The offending header field.
        field: String,
        /// Why the field was rejected.
        reason: String,
    },

    /// A dependency edit would create a cycle within an epic.
    #[error("task '{task}' in epic '{epic}' would create a dependency cycle: {}; remove one of the edges", cycle.join(" -> "))]
    CircularDependency {
        /// Epic the tasks belong to.
        epic: String,
        /// Task whose dependencies were being modified.
        task: String,
        /// The cycle path, starting and ending at `task`.
        cycle: Vec<String>,
    },

    /// A task lists the same id in `depends_on` and `conflicts_with`.
    #[error("task '{task}' lists '{overlapping}' in both depends_on and conflicts_with; a task cannot both require and exclude the same dependency")]
    ConflictOverlap {
        /// Task being validated.
        task: String,
        /// The id present in both edge sets.
        overlapping: String,
    },

    /// A tool name was registered twice.
    #[error("tool '{name}' is already registered; deprecate the existing tool or pick a new name")]
    DuplicateRegistration {
        /// Tool name.
        name: String,
    },

    /// A tool descriptor is missing a required field or malformed.
    #[error("tool '{name}' has an invalid descriptor: {field} — {reason}")]
    InvalidDescriptor {
        /// Tool name.
        name: String,
        /// The missing or malformed field.
        field: &'static str,
        /// Why the field was rejected.
        reason: String,
    },

    /// A human-supplied name could not be turned into a valid slug.
    #[error("invalid identifier '{input}': {reason}; use 3-50 lowercase alphanumeric characters separated by single hyphens")]
    InvalidIdentifier {
        /// The raw input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// I/O failure. Surfaced as-is; retry policy belongs to the caller.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a `NotFound` error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an `AlreadyExists` error.
    pub fn already_exists(kind: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    /// Create a `SchemaViolation` error.
    pub fn schema(
        kind: &'static str,
        id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            kind,
            id: id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an `Io` error from a path and source.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias using Kanri's Error.
pub type Result<T> = std::result::Result<T, Error>;
