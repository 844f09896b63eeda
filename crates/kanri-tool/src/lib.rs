//! Operation descriptor catalog.
//!
//! Every operation the project surface exposes is described by a
//! [`ToolDescriptor`] and registered in a [`ToolRegistry`] at startup. The
//! registry acts as a validation gate: a descriptor missing its required
//! fields is rejected before the operation can ever be offered. The
//! registry is process-local and read-only after startup; `deprecate` is
//! the only post-registration mutation.

pub mod descriptor;
pub mod registry;

pub use descriptor::ToolDescriptor;
pub use registry::ToolRegistry;

// Re-export the JSON value type descriptors use for their input shape.
pub use serde_json::Value as JsonValue;
