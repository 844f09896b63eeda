//! Audit entry type and its ledger rendering.

use kanri_common_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One audited operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation ran.
    pub timestamp: Timestamp,
    /// Operation name ("create_epic", "set_task_status", ...).
    pub operation: String,
    /// Human-readable description of what happened.
    pub details: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Structured context (entity ids, field values). Sorted for a
    /// deterministic rendering.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Error message, only present when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// A successful operation, timestamped now.
    pub fn success(operation: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            timestamp: Timestamp::now(),
            operation: operation.into(),
            details: details.into(),
            success: true,
            context: BTreeMap::new(),
            error: None,
        }
    }

    /// A failed operation, timestamped now.
    pub fn failure(
        operation: impl Into<String>,
        details: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Timestamp::now(),
            operation: operation.into(),
            details: details.into(),
            success: false,
            context: BTreeMap::new(),
            error: Some(error.into()),
        }
    }

    /// Attach a context key-value pair.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Render as a ledger block.
    ///
    /// ```text
    /// ## [<RFC3339>] <✅|❌> Operation: <name>
    /// **Details**: <text>
    /// **Context**:
    /// - key: value
    /// **Error**: <text>
    /// ---
    /// ```
    ///
    /// The format is line-oriented, so every caller-supplied string is
    /// flattened to a single line first. Otherwise a crafted entity name
    /// carrying a `## [...]` line would parse back as an extra entry.
    pub fn render(&self) -> String {
        let mark = if self.success { "✅" } else { "❌" };
        let mut out = format!(
            "## [{}] {} Operation: {}\n**Details**: {}\n",
            self.timestamp.to_rfc3339(),
            mark,
            flatten(&self.operation),
            flatten(&self.details)
        );
        if !self.context.is_empty() {
            out.push_str("**Context**:\n");
            for (key, value) in &self.context {
                out.push_str(&format!("- {}: {}\n", flatten(key), flatten(value)));
            }
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("**Error**: {}\n", flatten(error)));
        }
        out.push_str("---\n");
        out
    }

    /// Parse the entries out of ledger content, oldest first.
    ///
    /// Lines that do not fit the format are skipped rather than failing the
    /// whole scan; the ledger is written by us but hand edits happen.
    pub fn parse_all(content: &str) -> Vec<AuditEntry> {
        let mut entries = Vec::new();
        let mut current: Option<AuditEntry> = None;
        let mut in_context = false;

        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("## [") {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                in_context = false;
                current = parse_heading(rest);
                continue;
            }
            if line == "---" {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                in_context = false;
                continue;
            }
            let Some(entry) = current.as_mut() else {
                continue;
            };
            if let Some(details) = line.strip_prefix("**Details**: ") {
                entry.details = details.to_string();
                in_context = false;
            } else if line == "**Context**:" {
                in_context = true;
            } else if let Some(error) = line.strip_prefix("**Error**: ") {
                entry.error = Some(error.to_string());
                in_context = false;
            } else if in_context {
                if let Some(pair) = line.strip_prefix("- ") {
                    if let Some((key, value)) = pair.split_once(": ") {
                        entry.context.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }
        if let Some(entry) = current.take() {
            entries.push(entry);
        }
        entries
    }
}

/// Collapse line breaks to single spaces so a value can never span ledger
/// lines or fake a heading.
fn flatten(s: &str) -> String {
    if !s.contains(['\n', '\r']) {
        return s.to_string();
    }
    s.split(['\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `<RFC3339>] <✅|❌> Operation: <name>` (the heading minus its
/// `## [` prefix).
fn parse_heading(rest: &str) -> Option<AuditEntry> {
    let (timestamp_str, tail) = rest.split_once("] ")?;
    let timestamp = Timestamp::parse(timestamp_str)?;
    let (mark, operation) = tail.split_once(" Operation: ")?;
    Some(AuditEntry {
        timestamp,
        operation: operation.trim().to_string(),
        details: String::new(),
        success: mark.trim() == "✅",
        context: BTreeMap::new(),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_success_entry() {
        let entry = AuditEntry::success("create_epic", "created epic checkout-flow")
            .with_context("epic", "checkout-flow");
        let rendered = entry.render();
        assert!(rendered.starts_with("## ["));
        assert!(rendered.contains("✅ Operation: create_epic"));
        assert!(rendered.contains("**Details**: created epic checkout-flow"));
        assert!(rendered.contains("- epic: checkout-flow"));
        assert!(!rendered.contains("**Error**"));
        assert!(rendered.ends_with("---\n"));
    }

    #[test]
    fn test_render_failure_entry() {
        let entry = AuditEntry::failure("create_task", "rejected", "dependency cycle");
        let rendered = entry.render();
        assert!(rendered.contains("❌ Operation: create_task"));
        assert!(rendered.contains("**Error**: dependency cycle"));
    }

    #[test]
    fn test_render_parse_roundtrip() {
        let entries = vec![
            AuditEntry::success("init_project", "layout created"),
            AuditEntry::success("create_epic", "created epic checkout-flow")
                .with_context("epic", "checkout-flow")
                .with_context("prd", "payment-redesign"),
            AuditEntry::failure("set_task_status", "rejected", "task not found")
                .with_context("task", "007"),
        ];
        let content: String = entries.iter().map(|e| e.render() + "\n").collect();
        let parsed = AuditEntry::parse_all(&content);
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_render_flattens_multiline_values() {
        // A value carrying its own heading line must not parse back as a
        // second entry.
        let entry = AuditEntry::failure(
            "create_prd",
            "created prd from 'pay\n## [2026-01-01T00:00:00+00:00] ✅ Operation: fake\nment'",
            "invalid identifier\nsecond line",
        )
        .with_context("prd", "a\nb");

        let rendered = entry.render();
        let parsed = AuditEntry::parse_all(&rendered);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].operation, "create_prd");
        assert!(parsed[0].details.contains("Operation: fake"));
        assert_eq!(parsed[0].error.as_deref(), Some("invalid identifier second line"));
        assert_eq!(parsed[0].context["prd"], "a b");
    }

    #[test]
    fn test_parse_skips_garbage() {
        let content = "# Audit Log\n\nsome prose\n\n## [not-a-timestamp] ✅ Operation: x\n---\n";
        assert!(AuditEntry::parse_all(content).is_empty());
    }
}
