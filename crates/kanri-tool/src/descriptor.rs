//! Tool descriptor type.

use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Describes one registered operation.
///
/// A descriptor is complete when it carries a category, a description, an
/// input shape, a version, and at least one documentation reference; the
/// registry enforces completeness at registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Grouping key for listings and generated docs.
    pub category: String,
    /// What the operation does, one or two sentences.
    pub description: String,
    /// Declared input shape (a JSON schema fragment). `Null` means the
    /// shape was never declared, which the registry rejects.
    #[serde(default)]
    pub input_shape: JsonValue,
    /// External documentation URLs, `scheme://host/segment/segment`.
    #[serde(default)]
    pub doc_references: Vec<String>,
    /// Worked invocation examples.
    #[serde(default)]
    pub usage_examples: Vec<String>,
    /// Semantic version of the operation's contract.
    pub version: Option<Version>,
    /// Deprecated operations are hidden from category listings but still
    /// resolvable by direct lookup.
    #[serde(default)]
    pub deprecated: bool,
    /// Name of the operation that supersedes this one, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl ToolDescriptor {
    /// A descriptor with the given category and description; the remaining
    /// required fields are filled in with the `with_*` builders.
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            input_shape: JsonValue::Null,
            doc_references: Vec::new(),
            usage_examples: Vec::new(),
            version: None,
            deprecated: false,
            replacement: None,
        }
    }

    /// Set the declared input shape.
    pub fn with_input_shape(mut self, shape: JsonValue) -> Self {
        self.input_shape = shape;
        self
    }

    /// Add a documentation reference.
    pub fn with_doc_reference(mut self, reference: impl Into<String>) -> Self {
        self.doc_references.push(reference.into());
        self
    }

    /// Add a usage example.
    pub fn with_usage_example(mut self, example: impl Into<String>) -> Self {
        self.usage_examples.push(example.into());
        self
    }

    /// Set the contract version.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_fields() {
        let descriptor = ToolDescriptor::new("planning", "Creates an epic")
            .with_input_shape(serde_json::json!({"type": "object"}))
            .with_doc_reference("https://docs.example.com/guides/epics")
            .with_usage_example("create_epic checkout-flow")
            .with_version(Version::new(1, 0, 0));

        assert_eq!(descriptor.category, "planning");
        assert_eq!(descriptor.doc_references.len(), 1);
        assert_eq!(descriptor.usage_examples.len(), 1);
        assert_eq!(descriptor.version, Some(Version::new(1, 0, 0)));
        assert!(!descriptor.deprecated);
    }

    #[test]
    fn test_serde_roundtrip() {
        let descriptor = ToolDescriptor::new("planning", "Creates an epic")
            .with_version(Version::new(2, 1, 3));
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: ToolDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
