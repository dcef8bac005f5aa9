//! Symbol to entry conversion.

use super::filter::Filter;
use super::tags;
use crate::config::DocumentationOptions;
use crate::model::{DocEntry, InterfaceEntry, PropertyEntry};
use crate::program::{ProgramModel, SymbolId, TypeFormat};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_BASIC_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(boolean|number|string|RegExp)(\[\])?$").unwrap());

/// String and numeric literal types render starting with a quote or digit.
static RE_LITERAL_TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^("|\d)"#).unwrap());

/// Primitive, primitive array and literal type strings. Variables of these
/// types only get their built-in members with `include_basic_type_properties`.
pub fn is_basic_type(type_name: &str) -> bool {
    RE_BASIC_TYPE.is_match(type_name) || RE_LITERAL_TYPE.is_match(type_name)
}

const FULLY_QUALIFIED: TypeFormat = TypeFormat {
    fully_qualified: true,
};

pub struct Serializer<'a, P: ProgramModel + ?Sized> {
    program: &'a P,
    options: &'a DocumentationOptions,
    filter: Filter<'a>,
}

impl<'a, P: ProgramModel + ?Sized> Serializer<'a, P> {
    pub fn new(program: &'a P, options: &'a DocumentationOptions, filter: Filter<'a>) -> Self {
        Serializer {
            program,
            options,
            filter,
        }
    }

    pub fn serialize_symbol(&self, symbol: SymbolId, file_name: &str) -> DocEntry {
        let ty = self.program.type_of_symbol(symbol);
        let normalized = tags::normalize(self.program, symbol, self.options.tag_strategy);
        DocEntry {
            name: self.program.symbol_name(symbol).to_string(),
            file_name: file_name.to_string(),
            type_name: self.program.type_to_string(ty, FULLY_QUALIFIED),
            documentation: normalized.documentation,
            tags: normalized.tags,
        }
    }

    pub fn serialize_property(&self, symbol: SymbolId, file_name: &str) -> PropertyEntry {
        PropertyEntry::new(
            self.serialize_symbol(symbol, file_name),
            self.program.is_optional(symbol),
        )
    }

    pub fn serialize_interface(&self, symbol: SymbolId, file_name: &str) -> InterfaceEntry {
        self.serialize_declared(symbol, file_name, "interface")
    }

    pub fn serialize_class(&self, symbol: SymbolId, file_name: &str) -> InterfaceEntry {
        self.serialize_declared(symbol, file_name, "class")
    }

    fn serialize_declared(&self, symbol: SymbolId, file_name: &str, kind: &str) -> InterfaceEntry {
        let mut doc = self.serialize_symbol(symbol, file_name);
        doc.type_name = kind.to_string();
        InterfaceEntry {
            doc,
            extends: self.program.heritage_clause(symbol),
            properties: self.properties(self.program.members(symbol), file_name),
        }
    }

    pub fn serialize_variable(&self, symbol: SymbolId, file_name: &str) -> InterfaceEntry {
        let doc = self.serialize_symbol(symbol, file_name);
        let expand =
            self.options.include_basic_type_properties || !is_basic_type(&doc.type_name);
        debug!(
            name = %doc.name,
            type_name = %doc.type_name,
            expand,
            "variable properties"
        );
        let properties = if expand {
            let ty = self.program.type_of_symbol(symbol);
            self.properties(self.program.properties_of_type(ty), file_name)
        } else {
            Vec::new()
        };
        InterfaceEntry {
            doc,
            extends: None,
            properties,
        }
    }

    /// Value-declared symbols only, sorted by name, then member-filtered.
    fn properties(&self, symbols: Vec<SymbolId>, file_name: &str) -> Vec<PropertyEntry> {
        let mut symbols: Vec<SymbolId> = symbols
            .into_iter()
            .filter(|&s| self.program.has_value_declaration(s))
            .collect();
        symbols.sort_by(|&a, &b| {
            self.program
                .symbol_name(a)
                .cmp(self.program.symbol_name(b))
        });
        symbols
            .into_iter()
            .map(|s| self.serialize_property(s, file_name))
            .filter(|entry| self.filter.accepts_member(entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerOptions;
    use crate::program::{SourceProgram, Statement};

    #[test]
    fn basic_types() {
        for basic in [
            "string",
            "number[]",
            "boolean",
            "RegExp",
            "\"foo.ts\"",
            "100",
        ] {
            assert!(is_basic_type(basic), "{basic}");
        }
        for complex in ["{ BLUE: string; }", "Date", "IInterface", "string | Date", "any"] {
            assert!(!is_basic_type(complex), "{complex}");
        }
        // suffix match
        assert!(is_basic_type("(x: number) => string"));
        assert!(is_basic_type("Date | string"));
    }

    fn first_symbol(program: &SourceProgram) -> SymbolId {
        let file = program.source_files().last().unwrap();
        let node = match &file.statements[0] {
            Statement::Interface(decl) | Statement::Class(decl) => decl.node,
            Statement::Variable(decls) => decls[0].node,
            other => panic!("unexpected statement {other:?}"),
        };
        program.symbol_at_location(node).unwrap()
    }

    #[test]
    fn interface_members_sorted_and_typed() {
        let program = SourceProgram::from_sources(
            [(
                "a.ts",
                "/** Thing */\ninterface Thing extends Base {\n  zeta: string;\n  alpha?: number;\n  [key: string]: any;\n}",
            )],
            &CompilerOptions::default(),
        );
        let options = DocumentationOptions::default();
        let serializer = Serializer::new(&program, &options, Filter::new(&options));
        let entry = serializer.serialize_interface(first_symbol(&program), "a.ts");

        assert_eq!(entry.doc.type_name, "interface");
        assert_eq!(entry.doc.documentation, "Thing");
        assert_eq!(entry.extends, Some(vec!["Base".to_string()]));
        let names: Vec<_> = entry.properties.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert!(entry.properties[0].optional);
        assert_eq!(entry.properties[0].doc.type_name, "number");
    }

    #[test]
    fn basic_variable_gate() {
        let program = SourceProgram::from_sources(
            [("a.ts", "const name = \"x\";")],
            &CompilerOptions::default(),
        );
        let off = DocumentationOptions::default();
        let entry = Serializer::new(&program, &off, Filter::new(&off))
            .serialize_variable(first_symbol(&program), "a.ts");
        assert_eq!(entry.doc.type_name, "\"x\"");
        assert!(entry.properties.is_empty());
        assert!(entry.extends.is_none());

        let on = DocumentationOptions {
            include_basic_type_properties: true,
            ..Default::default()
        };
        let entry = Serializer::new(&program, &on, Filter::new(&on))
            .serialize_variable(first_symbol(&program), "a.ts");
        assert!(entry.property("charAt").is_some());
    }
}
