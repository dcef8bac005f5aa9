//! GitHub-flavored markdown renderer.
//!
//! One section per entry with a property table; an index of links to the
//! sections precedes them.

use crate::model::{InterfaceEntry, PropertyEntry, TagValue, Tags};
use crate::render::Renderer;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, entries: &[InterfaceEntry]) -> String {
        let mut output = String::new();
        if entries.is_empty() {
            return output;
        }

        output.push_str("## Index\n\n");
        for entry in entries {
            output.push_str(&format!("* [{}](#{})\n", entry.name(), github_slug(entry.name())));
        }
        output.push('\n');

        for entry in entries {
            output.push_str(&render_entry(entry));
            output.push('\n');
        }
        output
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_entry(entry: &InterfaceEntry) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", entry.name()));
    lines.push(format!(
        "_{}_ in `{}`\n",
        entry.doc.type_name,
        entry.file_name()
    ));

    if !entry.doc.documentation.is_empty() {
        lines.push(entry.doc.documentation.clone());
        lines.push(String::new());
    }

    if let Some(ref extends) = entry.extends {
        let names: Vec<String> = extends.iter().map(|e| format!("`{}`", e)).collect();
        lines.push(format!("**Extends:** {}\n", names.join(", ")));
    }

    if !entry.doc.tags.is_empty() {
        lines.push("#### Tags\n".to_string());
        for (name, value) in &entry.doc.tags {
            lines.push(format!("* {}", render_tag(name, value)));
        }
        lines.push(String::new());
    }

    if !entry.properties.is_empty() {
        lines.push("#### Properties\n".to_string());
        lines.push("| Name | Type | Optional | Description |".to_string());
        lines.push("|------|------|----------|-------------|".to_string());
        for prop in &entry.properties {
            lines.push(render_property_row(prop));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn render_tag(name: &str, value: &TagValue) -> String {
    match value {
        TagValue::Text(text) => format!("`@{}` {}", name, text),
        TagValue::Flag(_) => format!("`@{}`", name),
    }
}

fn render_property_row(prop: &PropertyEntry) -> String {
    let mut description = prop.doc.documentation.replace('\n', " ");
    let notes = property_notes(&prop.doc.tags);
    if !notes.is_empty() {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&notes.join(" "));
    }
    format!(
        "| `{}` | `{}` | {} | {} |",
        prop.name(),
        escape_cell(&prop.doc.type_name),
        if prop.optional { "yes" } else { "no" },
        escape_cell(&description)
    )
}

/// Short annotations for the flag tags.
fn property_notes(tags: &Tags) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(TagValue::Text(default)) = tags.get("default") {
        notes.push(format!("Default: `{}`.", default));
    }
    match tags.get("deprecated") {
        Some(TagValue::Text(reason)) => notes.push(format!("**Deprecated:** {}.", reason)),
        Some(TagValue::Flag(_)) => notes.push("**Deprecated.**".to_string()),
        None => {}
    }
    if tags.contains_key("internal") {
        notes.push("_Internal._".to_string());
    }
    notes
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// GitHub heading anchor: lowercase, keep alphanumerics, spaces and
/// hyphens, then turn spaces into hyphens.
fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}
