//! Format-agnostic data model for extracted documentation.
//!
//! Field names serialize in camelCase (`fileName`) so the JSON output can be
//! consumed directly by web tooling.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value of a single `@tag` directive.
///
/// Tags written without text (`@deprecated`) become `Flag(true)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Flag(bool),
}

impl TagValue {
    /// Coerce raw tag text: empty text means the tag is a bare marker.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            TagValue::Flag(true)
        } else {
            TagValue::Text(text.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            TagValue::Flag(_) => None,
        }
    }
}

/// Tag name → value, in order of first appearance in the doc comment.
pub type Tags = IndexMap<String, TagValue>;

/// Tags mirrored onto [`PropertyEntry`] as top-level fields.
pub const FLAG_TAGS: &[&str] = &["default", "deprecated", "internal"];

/// Base record shared by every entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    pub name: String,
    /// Path relative to the extraction root.
    pub file_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Doc comment text with tag directives removed.
    pub documentation: String,
    pub tags: Tags,
}

/// A member of an interface, class or variable type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    #[serde(flatten)]
    pub doc: DocEntry,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TagValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<TagValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<TagValue>,
}

impl PropertyEntry {
    pub fn new(doc: DocEntry, optional: bool) -> Self {
        let mut entry = PropertyEntry {
            doc,
            optional,
            ..Default::default()
        };
        entry.mirror_flag_tags();
        entry
    }

    pub fn name(&self) -> &str {
        &self.doc.name
    }

    /// Copy `default`/`deprecated`/`internal` from `tags` onto the entry.
    fn mirror_flag_tags(&mut self) {
        for flag in FLAG_TAGS {
            let value = self.doc.tags.get(*flag).cloned();
            match *flag {
                "default" => self.default = value,
                "deprecated" => self.deprecated = value,
                _ => self.internal = value,
            }
        }
    }
}

/// A top-level entry: interface, class or variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceEntry {
    #[serde(flatten)]
    pub doc: DocEntry,
    /// Heritage type names exactly as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,
    /// Sorted by name.
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

impl InterfaceEntry {
    pub fn name(&self) -> &str {
        &self.doc.name
    }

    pub fn file_name(&self) -> &str {
        &self.doc.file_name
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyEntry> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_tags(tags: &[(&str, TagValue)]) -> DocEntry {
        DocEntry {
            name: "disabled".to_string(),
            file_name: "a.ts".to_string(),
            type_name: "boolean".to_string(),
            documentation: "prevent interaction".to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn empty_tag_text_is_flag() {
        assert_eq!(TagValue::from_text("  "), TagValue::Flag(true));
        assert_eq!(
            TagValue::from_text(" 0.5.0 "),
            TagValue::Text("0.5.0".to_string())
        );
    }

    #[test]
    fn property_mirrors_flag_tags() {
        let entry = PropertyEntry::new(
            doc_with_tags(&[
                ("default", TagValue::Text("false".to_string())),
                ("internal", TagValue::Flag(true)),
                ("since", TagValue::Text("1.0".to_string())),
            ]),
            true,
        );
        assert_eq!(entry.default, Some(TagValue::Text("false".to_string())));
        assert_eq!(entry.internal, Some(TagValue::Flag(true)));
        assert_eq!(entry.deprecated, None);
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_flags() {
        let entry = PropertyEntry::new(doc_with_tags(&[("internal", TagValue::Flag(true))]), false);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["fileName"], "a.ts");
        assert_eq!(json["type"], "boolean");
        assert_eq!(json["tags"]["internal"], true);
        assert_eq!(json["internal"], true);
        assert!(json.get("default").is_none());
        assert!(json.get("deprecated").is_none());
    }

    #[test]
    fn interface_without_heritage_omits_extends() {
        let entry = InterfaceEntry {
            doc: doc_with_tags(&[]),
            extends: None,
            properties: Vec::new(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("extends").is_none());
        assert_eq!(json["properties"], serde_json::json!([]));
    }
}
