//! Descriptor catalog for the workbench's operation surface.

use kanri_common_core::Result;
use kanri_tool::{ToolDescriptor, ToolRegistry};
use semver::Version;
use serde_json::json;

const DOCS_BASE: &str = "https://docs.kanri.dev/operations";

fn describe(category: &str, description: &str, name: &str, input: serde_json::Value) -> ToolDescriptor {
    ToolDescriptor::new(category, description)
        .with_input_shape(input)
        .with_doc_reference(format!("{DOCS_BASE}/{name}"))
        .with_version(Version::new(1, 0, 0))
}

/// Build the registry describing every [`Workspace`](crate::Workspace)
/// operation. Intended to run once at startup.
pub fn default_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    let slug = json!({"type": "string", "pattern": "^[a-z0-9]+(-[a-z0-9]+)*$"});
    let task = json!({"type": "string", "pattern": "^[0-9]{3}$"});
    let status = json!({"type": "string", "enum": ["open", "in-progress", "completed", "blocked"]});

    registry.register(
        "init_project",
        describe(
            "project",
            "Create the project layout under .claude; safe to repeat.",
            "init_project",
            json!({"type": "object", "properties": {}}),
        )
        .with_usage_example("init_project"),
    )?;

    registry.register(
        "create_prd",
        describe(
            "planning",
            "Create a requirement document from a raw name; the name is sanitized into a slug.",
            "create_prd",
            json!({"type": "object", "properties": {"name": {"type": "string"}, "body": {"type": "string"}}, "required": ["name"]}),
        )
        .with_usage_example("create_prd \"Payment Redesign\""),
    )?;

    registry.register(
        "update_prd_status",
        describe(
            "planning",
            "Move a requirement document through its lifecycle.",
            "update_prd_status",
            json!({"type": "object", "properties": {"prd": slug.clone(), "status": {"type": "string", "enum": ["draft", "review", "approved", "implemented"]}}, "required": ["prd", "status"]}),
        ),
    )?;

    registry.register(
        "delete_prd",
        describe(
            "planning",
            "Delete a requirement document.",
            "delete_prd",
            json!({"type": "object", "properties": {"prd": slug.clone()}, "required": ["prd"]}),
        ),
    )?;

    registry.register(
        "create_epic",
        describe(
            "planning",
            "Create an epic, optionally linked to the requirement document it decomposes.",
            "create_epic",
            json!({"type": "object", "properties": {"name": {"type": "string"}, "prd": slug.clone(), "body": {"type": "string"}}, "required": ["name"]}),
        )
        .with_usage_example("create_epic \"Checkout Flow\" --prd payment-redesign"),
    )?;

    registry.register(
        "set_epic_status",
        describe(
            "planning",
            "Move an epic to a new status; closing an epic is always this deliberate call.",
            "set_epic_status",
            json!({"type": "object", "properties": {"epic": slug.clone(), "status": status.clone()}, "required": ["epic", "status"]}),
        ),
    )?;

    registry.register(
        "delete_epic",
        describe(
            "planning",
            "Delete an epic and every task under it.",
            "delete_epic",
            json!({"type": "object", "properties": {"epic": slug.clone()}, "required": ["epic"]}),
        ),
    )?;

    registry.register(
        "create_task",
        describe(
            "planning",
            "Create a task under an epic; the next free task number is assigned automatically and edges are validated before any write.",
            "create_task",
            json!({"type": "object", "properties": {"epic": slug.clone(), "name": {"type": "string"}, "depends_on": {"type": "array", "items": task.clone()}, "conflicts_with": {"type": "array", "items": task.clone()}}, "required": ["epic", "name"]}),
        )
        .with_usage_example("create_task checkout-flow \"Payment API\" --depends-on 001"),
    )?;

    registry.register(
        "update_task",
        describe(
            "planning",
            "Replace a task's header and body wholesale, re-validating its edges.",
            "update_task",
            json!({"type": "object", "properties": {"epic": slug.clone(), "task": task.clone()}, "required": ["epic", "task"]}),
        ),
    )?;

    registry.register(
        "set_task_status",
        describe(
            "planning",
            "Move a task to a new status and refresh the epic's derived counters.",
            "set_task_status",
            json!({"type": "object", "properties": {"epic": slug.clone(), "task": task.clone(), "status": status}, "required": ["epic", "task", "status"]}),
        ),
    )?;

    registry.register(
        "delete_task",
        describe(
            "planning",
            "Delete a task and refresh the epic's derived counters.",
            "delete_task",
            json!({"type": "object", "properties": {"epic": slug.clone(), "task": task}, "required": ["epic", "task"]}),
        ),
    )?;

    registry.register(
        "next_tasks",
        describe(
            "query",
            "Open tasks whose every dependency is completed, recomputed fresh on each call.",
            "next_tasks",
            json!({"type": "object", "properties": {"epic": slug.clone()}, "required": ["epic"]}),
        )
        .with_usage_example("next_tasks checkout-flow"),
    )?;

    registry.register(
        "epic_status",
        describe(
            "query",
            "Derived epic summary: progress, task counts, and the closure recommendation.",
            "epic_status",
            json!({"type": "object", "properties": {"epic": slug.clone()}, "required": ["epic"]}),
        ),
    )?;

    registry.register(
        "blocked_tasks",
        describe(
            "query",
            "Tasks currently marked blocked in an epic.",
            "blocked_tasks",
            json!({"type": "object", "properties": {"epic": slug}, "required": ["epic"]}),
        ),
    )?;

    Ok(registry)
}
