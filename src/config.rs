//! Extraction options.
//!
//! Options arrive as a [`PartialOptions`] (every field optional, as read from
//! a JSON config file or assembled from CLI flags) and are resolved once into
//! an immutable [`DocumentationOptions`] by [`DocumentationOptions::from_partial`].

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// An exclusion pattern tested against entry names or file paths.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches when the value contains the text.
    Literal(String),
    /// Matches when the expression finds a match anywhere in the value.
    Regex(Regex),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    pub fn regex(expr: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(expr)?))
    }

    /// Parse `/body/flags` as a regular expression, anything else as a literal.
    ///
    /// Flags `i`, `m`, `s`, `x` become inline flags; `g`, `u`, `y` are accepted
    /// and ignored.
    pub fn parse(text: &str) -> Result<Self, regex::Error> {
        if let Some((body, flags)) = split_regex_literal(text) {
            let inline: String = flags.chars().filter(|c| "imsx".contains(*c)).collect();
            let expr = if inline.is_empty() {
                body.to_string()
            } else {
                format!("(?{}){}", inline, body)
            };
            return Pattern::regex(&expr);
        }
        Ok(Pattern::literal(text))
    }

    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Pattern::Literal(text) => value.contains(text.as_str()),
            Pattern::Regex(re) => re.is_match(value),
        }
    }
}

fn split_regex_literal(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if body.is_empty() || !flags.chars().all(|c| "gimsuxy".contains(c)) {
        return None;
    }
    Some((body, flags))
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(text) => write!(f, "{}", text),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl FromStr for Pattern {
    type Err = regex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Pattern::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// How `@tag` directives are turned into the `tags` map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagStrategy {
    /// Use the program model's parsed tag list; every tag name is kept.
    #[default]
    Structured,
    /// Scan the raw comment; a tag value is the next whitespace-free token.
    StripToken,
    /// Scan the raw comment; a tag value runs up to the next `@` or the end.
    StripRun,
}

/// Options as supplied by the caller; unset fields take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialOptions {
    pub exclude_names: Option<Vec<Pattern>>,
    pub exclude_paths: Option<Vec<Pattern>>,
    pub include_definition_files: Option<bool>,
    /// Legacy inverse spelling of `include_definition_files`.
    pub ignore_definitions: Option<bool>,
    pub include_basic_type_properties: Option<bool>,
    pub include_classes: Option<bool>,
    pub tag_strategy: Option<TagStrategy>,
    pub root_dir: Option<PathBuf>,
}

impl PartialOptions {
    /// Layer `other` on top of `self`: pattern lists are concatenated,
    /// scalar fields set in `other` win.
    pub fn merge(self, other: PartialOptions) -> PartialOptions {
        PartialOptions {
            exclude_names: concat_patterns(self.exclude_names, other.exclude_names),
            exclude_paths: concat_patterns(self.exclude_paths, other.exclude_paths),
            include_definition_files: other
                .include_definition_files
                .or(self.include_definition_files),
            ignore_definitions: other.ignore_definitions.or(self.ignore_definitions),
            include_basic_type_properties: other
                .include_basic_type_properties
                .or(self.include_basic_type_properties),
            include_classes: other.include_classes.or(self.include_classes),
            tag_strategy: other.tag_strategy.or(self.tag_strategy),
            root_dir: other.root_dir.or(self.root_dir),
        }
    }
}

fn concat_patterns(a: Option<Vec<Pattern>>, b: Option<Vec<Pattern>>) -> Option<Vec<Pattern>> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.into_iter().chain(b).flatten().collect()),
    }
}

/// Resolved, read-only extraction options.
#[derive(Debug, Clone)]
pub struct DocumentationOptions {
    /// Patterns tested against every entry name (top-level and member).
    pub exclude_names: Vec<Pattern>,
    /// Patterns tested against each file path.
    pub exclude_paths: Vec<Pattern>,
    /// Walk `.d.ts` files too. Off by default: declaration files tend to
    /// drown the output in library symbols.
    pub include_definition_files: bool,
    /// Expand the built-in members of primitive-typed variables.
    pub include_basic_type_properties: bool,
    /// Emit entries for class declarations.
    pub include_classes: bool,
    pub tag_strategy: TagStrategy,
    /// `fileName` of every entry is relative to this directory.
    pub root_dir: PathBuf,
}

impl DocumentationOptions {
    /// Apply defaults to a partial option set.
    pub fn from_partial(partial: PartialOptions) -> Self {
        let include_definition_files = partial
            .include_definition_files
            .or(partial.ignore_definitions.map(|ignore| !ignore))
            .unwrap_or(false);
        let root_dir = partial.root_dir.unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        });

        DocumentationOptions {
            exclude_names: partial.exclude_names.unwrap_or_default(),
            exclude_paths: partial.exclude_paths.unwrap_or_default(),
            include_definition_files,
            include_basic_type_properties: partial.include_basic_type_properties.unwrap_or(false),
            include_classes: partial.include_classes.unwrap_or(true),
            tag_strategy: partial.tag_strategy.unwrap_or_default(),
            root_dir,
        }
    }
}

impl Default for DocumentationOptions {
    fn default() -> Self {
        DocumentationOptions::from_partial(PartialOptions::default())
    }
}

/// Options for building a program model from files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Leave the bundled `lib.d.ts` out of the program.
    pub no_lib: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_delimited_text_is_regex() {
        let p = Pattern::parse("/ed$/").unwrap();
        assert!(matches!(p, Pattern::Regex(_)));
        assert!(p.is_match("disabled"));
        assert!(p.is_match("lastEdited"));
        assert!(!p.is_match("fancy"));
    }

    #[test]
    fn regex_flags_become_inline() {
        let p = Pattern::parse("/^iinterface$/i").unwrap();
        assert!(p.is_match("IInterface"));
    }

    #[test]
    fn plain_text_is_literal_substring() {
        let p = Pattern::parse("node_modules/").unwrap();
        assert!(matches!(p, Pattern::Literal(_)));
        assert!(p.is_match("node_modules/@types/react/index.d.ts"));
        assert!(!p.is_match("src/index.ts"));
    }

    #[test]
    fn path_with_slashes_stays_literal() {
        // trailing segment is not a valid flag set
        let p = Pattern::parse("/src/fixtures").unwrap();
        assert!(matches!(p, Pattern::Literal(_)));
    }

    #[test]
    fn defaults_applied() {
        let opts = DocumentationOptions::from_partial(PartialOptions {
            root_dir: Some(PathBuf::from("/tmp")),
            ..Default::default()
        });
        assert!(opts.exclude_names.is_empty());
        assert!(opts.exclude_paths.is_empty());
        assert!(!opts.include_definition_files);
        assert!(!opts.include_basic_type_properties);
        assert!(opts.include_classes);
        assert_eq!(opts.tag_strategy, TagStrategy::Structured);
        assert_eq!(opts.root_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn legacy_ignore_definitions_is_inverse() {
        let partial: PartialOptions =
            serde_json::from_str(r#"{ "ignoreDefinitions": false }"#).unwrap();
        assert!(DocumentationOptions::from_partial(partial).include_definition_files);

        let partial: PartialOptions = serde_json::from_str(
            r#"{ "ignoreDefinitions": false, "includeDefinitionFiles": false }"#,
        )
        .unwrap();
        assert!(!DocumentationOptions::from_partial(partial).include_definition_files);
    }

    #[test]
    fn deserializes_patterns_and_strategy() {
        let partial: PartialOptions = serde_json::from_str(
            r#"{ "excludeNames": ["value", "/ed$/"], "tagStrategy": "stripRun" }"#,
        )
        .unwrap();
        let names = partial.exclude_names.unwrap();
        assert!(matches!(names[0], Pattern::Literal(_)));
        assert!(matches!(names[1], Pattern::Regex(_)));
        assert_eq!(partial.tag_strategy, Some(TagStrategy::StripRun));
    }

    #[test]
    fn merge_concatenates_patterns_and_overrides_flags() {
        let base = PartialOptions {
            exclude_names: Some(vec![Pattern::literal("a")]),
            include_classes: Some(false),
            ..Default::default()
        };
        let cli = PartialOptions {
            exclude_names: Some(vec![Pattern::literal("b")]),
            include_classes: Some(true),
            ..Default::default()
        };
        let merged = base.merge(cli);
        assert_eq!(merged.exclude_names.unwrap().len(), 2);
        assert_eq!(merged.include_classes, Some(true));
        assert_eq!(merged.exclude_paths.map(|p| p.len()), None);
    }
}
