//! Tag normalization.
//!
//! Produces the `tags` map of an entry and its documentation text with the
//! tag directives taken out. See [`TagStrategy`] for the available modes.

use crate::config::TagStrategy;
use crate::model::{TagValue, Tags, FLAG_TAGS};
use crate::program::{JsDocTag, ProgramModel, SymbolId};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `@name value` where the value is one whitespace-free token on the same line.
static RE_TAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\n\s*)?@([\w-]+)(?:[ \t]+([^\s@]\S*))?").unwrap());

/// `@name value` where the value runs up to the next `@`.
static RE_TAG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\n\s*)?@([\w-]+)(?:[ \t]+([^\s@][^@]*))?").unwrap());

/// A directive left inside description text, starting a word.
static RE_INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s+)@([A-Za-z_][\w-]*)(?:[ \t]+([^\s@]\S*))?").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub documentation: String,
    pub tags: Tags,
}

pub fn normalize<P: ProgramModel + ?Sized>(
    program: &P,
    symbol: SymbolId,
    strategy: TagStrategy,
) -> Normalized {
    match strategy {
        TagStrategy::Structured => structured(
            &program.documentation_comment(symbol),
            &program.jsdoc_tags(symbol),
        ),
        TagStrategy::StripToken => strip(&program.raw_doc_comment(symbol), &RE_TAG_TOKEN),
        TagStrategy::StripRun => strip(&program.raw_doc_comment(symbol), &RE_TAG_RUN),
    }
}

/// Every tag in the list is recorded; a repeated name keeps its last value.
pub fn from_tag_list(tags: &[JsDocTag]) -> Tags {
    let mut map = Tags::new();
    for tag in tags {
        map.insert(tag.name.clone(), TagValue::from_text(&tag.text));
    }
    map
}

/// Tags from the parsed list. Flag directives the description still embeds
/// inline are stripped afterwards; they never override a listed tag. Any
/// other `@word` is left in the prose.
pub fn structured(documentation: &str, tags: &[JsDocTag]) -> Normalized {
    let mut map = from_tag_list(tags);
    let mut inline = Tags::new();
    let stripped = RE_INLINE_TAG.replace_all(documentation, |caps: &Captures| {
        let name = &caps[1];
        if !FLAG_TAGS.contains(&name) {
            return caps[0].to_string();
        }
        let value = caps
            .get(2)
            .map(|m| TagValue::from_text(m.as_str()))
            .unwrap_or(TagValue::Flag(true));
        inline.insert(name.to_string(), value);
        String::new()
    });
    if inline.is_empty() {
        return Normalized {
            documentation: documentation.to_string(),
            tags: map,
        };
    }
    let documentation = stripped.trim().to_string();
    for (name, value) in inline {
        map.entry(name).or_insert(value);
    }
    Normalized { documentation, tags: map }
}

/// Scan `text` with `re`: recognised flag tags are recorded, every match
/// is removed from the text.
pub fn strip(text: &str, re: &Regex) -> Normalized {
    let mut tags = Tags::new();
    for caps in re.captures_iter(text) {
        let name = &caps[1];
        if !FLAG_TAGS.contains(&name) {
            continue;
        }
        let value = caps
            .get(2)
            .map(|m| TagValue::from_text(m.as_str()))
            .unwrap_or(TagValue::Flag(true));
        tags.insert(name.to_string(), value);
    }
    Normalized {
        documentation: re.replace_all(text, "").trim().to_string(),
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, text: &str) -> JsDocTag {
        JsDocTag {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    fn text(value: &str) -> TagValue {
        TagValue::Text(value.to_string())
    }

    #[test]
    fn structured_records_every_tag() {
        let out = structured(
            "Does things.",
            &[
                tag("default", "\"gilad\""),
                tag("deprecated", ""),
                tag("since", "0.5.0"),
                tag("customFlag", "Cool Dude"),
            ],
        );
        assert_eq!(out.documentation, "Does things.");
        assert_eq!(out.tags["default"], text("\"gilad\""));
        assert_eq!(out.tags["deprecated"], TagValue::Flag(true));
        assert_eq!(out.tags["since"], text("0.5.0"));
        assert_eq!(out.tags["customFlag"], text("Cool Dude"));
    }

    #[test]
    fn repeated_tag_keeps_last_value() {
        let tags = from_tag_list(&[tag("since", "0.1"), tag("since", "0.2")]);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["since"], text("0.2"));
    }

    #[test]
    fn structured_strips_inline_directives() {
        let out = structured("Prevents interaction @default false", &[tag("since", "1.0")]);
        assert_eq!(out.documentation, "Prevents interaction");
        assert_eq!(out.tags["default"], text("false"));
        assert_eq!(out.tags["since"], text("1.0"));
    }

    #[test]
    fn structured_leaves_email_addresses() {
        let out = structured("Ask someone@example.com", &[]);
        assert_eq!(out.documentation, "Ask someone@example.com");
        assert!(out.tags.is_empty());
    }

    #[test]
    fn strip_token_takes_one_word() {
        let out = strip(
            "This one has a default value.\n@default \"gilad\"\n@deprecated\n@since 0.5.0",
            &RE_TAG_TOKEN,
        );
        assert_eq!(out.documentation, "This one has a default value.");
        assert_eq!(out.tags["default"], text("\"gilad\""));
        assert_eq!(out.tags["deprecated"], TagValue::Flag(true));
        assert!(!out.tags.contains_key("since"));
    }

    #[test]
    fn structured_keeps_unknown_inline_mentions() {
        let out = structured("Use the @Component decorator for views.", &[]);
        assert_eq!(out.documentation, "Use the @Component decorator for views.");
        assert!(out.tags.is_empty());

        let out = structured("Use the @Component decorator. @internal", &[]);
        assert_eq!(out.documentation, "Use the @Component decorator.");
        assert_eq!(out.tags["internal"], TagValue::Flag(true));
    }

    #[test]
    fn valueless_tag_does_not_take_next_line() {
        for re in [&*RE_TAG_TOKEN, &*RE_TAG_RUN] {
            let out = strip("Old.\n @deprecated\n @since 0.5.0", re);
            assert_eq!(out.documentation, "Old.");
            assert_eq!(out.tags["deprecated"], TagValue::Flag(true));
            assert_eq!(out.tags.len(), 1);
        }
    }

    #[test]
    fn strip_run_takes_text_up_to_next_tag() {
        let out = strip(
            "Old field.\n@deprecated use value instead\n@internal",
            &RE_TAG_RUN,
        );
        assert_eq!(out.documentation, "Old field.");
        assert_eq!(out.tags["deprecated"], text("use value instead"));
        assert_eq!(out.tags["internal"], TagValue::Flag(true));
    }

    #[test]
    fn strip_token_leaves_rest_of_multiword_value() {
        let out = strip("Old field.\n@deprecated use value instead", &RE_TAG_TOKEN);
        assert_eq!(out.tags["deprecated"], text("use"));
        assert!(!out.documentation.contains('@'));
    }
}
