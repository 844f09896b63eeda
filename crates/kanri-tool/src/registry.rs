//! The tool registry and its validation gate.

use crate::descriptor::ToolDescriptor;
use kanri_common_core::{Error, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::warn;
use url::Url;

/// Process-local catalog of operation descriptors.
///
/// Populated once at startup; after that the only mutation is
/// [`deprecate`](ToolRegistry::deprecate).
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under `name`.
    ///
    /// Rejects duplicate names and incomplete descriptors; a complete
    /// descriptor has a category, description, input shape, version, and
    /// at least one well-formed documentation reference.
    pub fn register(&mut self, name: impl Into<String>, descriptor: ToolDescriptor) -> Result<()> {
        let name = name.into();
        if self.tools.contains_key(&name) {
            return Err(Error::DuplicateRegistration { name });
        }
        validate_descriptor(&name, &descriptor)?;
        self.tools.insert(name, descriptor);
        Ok(())
    }

    /// Direct lookup by name. Returns deprecated tools too.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools, deprecated included.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Mark a tool deprecated, optionally pointing at its successor. The
    /// descriptor stays resolvable by direct lookup.
    pub fn deprecate(&mut self, name: &str, replacement: Option<String>) -> Result<()> {
        let descriptor = self
            .tools
            .get_mut(name)
            .ok_or_else(|| Error::not_found("tool", name))?;
        descriptor.deprecated = true;
        descriptor.replacement = replacement;
        Ok(())
    }

    /// Tools in a category, alphabetical by name. Deprecated tools are
    /// excluded unless `include_deprecated` is set.
    pub fn list_category(
        &self,
        category: &str,
        include_deprecated: bool,
    ) -> Vec<(&str, &ToolDescriptor)> {
        self.tools
            .iter()
            .filter(|(_, d)| d.category == category)
            .filter(|(_, d)| include_deprecated || !d.deprecated)
            .map(|(name, d)| (name.as_str(), d))
            .collect()
    }

    /// All categories in use, sorted and deduplicated.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.tools.values().map(|d| d.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Render the catalog as markdown, grouped by category, alphabetical
    /// within each group. Deprecated tools appear with a notice and their
    /// replacement pointer.
    pub fn generate_docs(&self) -> String {
        let mut out = String::from("# Tool Catalog\n");
        for category in self.categories() {
            let _ = write!(out, "\n## {category}\n");
            for (name, descriptor) in self.list_category(category, true) {
                let version = descriptor
                    .version
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                let _ = write!(out, "\n### {name} (v{version})\n");
                if descriptor.deprecated {
                    match &descriptor.replacement {
                        Some(replacement) => {
                            let _ = write!(out, "\n**Deprecated**: use `{replacement}` instead.\n");
                        }
                        None => out.push_str("\n**Deprecated**.\n"),
                    }
                }
                let _ = write!(out, "\n{}\n", descriptor.description);
                if !descriptor.doc_references.is_empty() {
                    out.push_str("\nReferences:\n");
                    for reference in &descriptor.doc_references {
                        let _ = writeln!(out, "- {reference}");
                    }
                }
                if !descriptor.usage_examples.is_empty() {
                    out.push_str("\nExamples:\n");
                    for example in &descriptor.usage_examples {
                        let _ = writeln!(out, "- `{example}`");
                    }
                }
            }
        }
        out
    }
}

/// Reject incomplete or malformed descriptors, naming the offending field.
fn validate_descriptor(name: &str, descriptor: &ToolDescriptor) -> Result<()> {
    let invalid = |field: &'static str, reason: &str| Error::InvalidDescriptor {
        name: name.to_string(),
        field,
        reason: reason.to_string(),
    };

    if descriptor.category.trim().is_empty() {
        return Err(invalid("category", "must not be empty"));
    }
    if descriptor.description.trim().is_empty() {
        return Err(invalid("description", "must not be empty"));
    }
    if descriptor.input_shape.is_null() {
        return Err(invalid("input shape", "must be declared"));
    }
    if descriptor.version.is_none() {
        return Err(invalid("version", "must carry a semantic version"));
    }
    if descriptor.doc_references.is_empty() {
        return Err(invalid(
            "doc references",
            "at least one documentation reference is required",
        ));
    }
    for reference in &descriptor.doc_references {
        let url = Url::parse(reference).map_err(|e| {
            invalid("doc references", &format!("'{reference}' is not a URL: {e}"))
        })?;
        if url.host_str().is_none() {
            return Err(invalid(
                "doc references",
                &format!("'{reference}' has no host"),
            ));
        }
        let segments = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).count())
            .unwrap_or(0);
        if segments < 2 {
            warn!(
                tool = name,
                reference, "documentation reference has fewer than two path segments"
            );
        }
    }
    Ok(())
}
