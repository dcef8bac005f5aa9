//! JSDoc comment parser.
//!
//! Splits a `/** ... */` body into the free description text and its block
//! tags. A tag starts a line with `@name`; its text runs until the next tag
//! line.

use super::JsDocTag;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z_][\w-]*)(?:\s+(.*))?$").unwrap());

/// A parsed doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsDoc {
    /// Text before the first tag, trimmed.
    pub description: String,
    pub tags: Vec<JsDocTag>,
    /// Whole comment with the `*` gutters removed, tags included.
    pub raw: String,
}

/// Parse the body of a doc comment (text between `/**` and `*/`).
pub fn parse(body: &str) -> JsDoc {
    let lines: Vec<String> = body.lines().map(strip_gutter).collect();

    let mut description: Vec<&str> = Vec::new();
    let mut tags: Vec<(String, Vec<String>)> = Vec::new();

    for line in &lines {
        let trimmed = line.trim();
        if let Some(caps) = RE_TAG_LINE.captures(trimmed) {
            let text = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
            tags.push((caps[1].to_string(), vec![text]));
        } else if let Some((_, text)) = tags.last_mut() {
            text.push(trimmed.to_string());
        } else {
            description.push(line.as_str());
        }
    }

    JsDoc {
        description: description.join("\n").trim().to_string(),
        tags: tags
            .into_iter()
            .map(|(name, text)| JsDocTag {
                name,
                text: text.join("\n").trim().to_string(),
            })
            .collect(),
        raw: lines.join("\n").trim().to_string(),
    }
}

/// Remove leading whitespace and one `*` gutter (plus one following space).
fn strip_gutter(line: &str) -> String {
    let s = line.trim_start();
    let s = match s.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => s,
    };
    s.trim_end().to_string()
}
