//! Name and path exclusion.
//!
//! A value is excluded as soon as one pattern matches it; patterns never
//! have to match together.

use crate::config::{DocumentationOptions, Pattern};
use crate::model::{InterfaceEntry, PropertyEntry};

/// True if any pattern matches `value`.
pub fn matches_any(value: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(value))
}

#[derive(Debug, Clone, Copy)]
pub struct Filter<'a> {
    names: &'a [Pattern],
    paths: &'a [Pattern],
}

impl<'a> Filter<'a> {
    pub fn new(options: &'a DocumentationOptions) -> Self {
        Filter {
            names: &options.exclude_names,
            paths: &options.exclude_paths,
        }
    }

    pub fn excludes_name(&self, name: &str) -> bool {
        matches_any(name, self.names)
    }

    pub fn excludes_path(&self, file_name: &str) -> bool {
        matches_any(file_name, self.paths)
    }

    /// Top-level entries are checked against both lists.
    pub fn accepts_entry(&self, entry: &InterfaceEntry) -> bool {
        !self.excludes_name(entry.name()) && !self.excludes_path(entry.file_name())
    }

    /// Members are checked by name only.
    pub fn accepts_member(&self, entry: &PropertyEntry) -> bool {
        !self.excludes_name(entry.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialOptions;
    use crate::model::DocEntry;

    fn options(names: &[&str], paths: &[&str]) -> DocumentationOptions {
        let parse = |list: &[&str]| {
            list.iter()
                .map(|s| Pattern::parse(s).unwrap())
                .collect::<Vec<_>>()
        };
        DocumentationOptions::from_partial(PartialOptions {
            exclude_names: Some(parse(names)),
            exclude_paths: Some(parse(paths)),
            ..Default::default()
        })
    }

    fn entry(name: &str, file_name: &str) -> InterfaceEntry {
        InterfaceEntry {
            doc: DocEntry {
                name: name.to_string(),
                file_name: file_name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn any_pattern_excludes() {
        let opts = options(&["value", "/ed$/"], &[]);
        let filter = Filter::new(&opts);
        assert!(filter.excludes_name("value"));
        assert!(filter.excludes_name("disabled"));
        assert!(filter.excludes_name("lastEdited"));
        assert!(!filter.excludes_name("fancy"));
    }

    #[test]
    fn empty_lists_accept_everything() {
        let opts = options(&[], &[]);
        let filter = Filter::new(&opts);
        assert!(filter.accepts_entry(&entry("IInterface", "interface.ts")));
    }

    #[test]
    fn path_applies_to_entries_not_members() {
        let opts = options(&[], &["/.*\\.ts$/"]);
        let filter = Filter::new(&opts);
        assert!(!filter.accepts_entry(&entry("IInterface", "tests/fixtures/interface.ts")));

        let member = PropertyEntry::new(
            DocEntry {
                name: "value".to_string(),
                file_name: "tests/fixtures/interface.ts".to_string(),
                ..Default::default()
            },
            false,
        );
        assert!(filter.accepts_member(&member));
    }
}
