//! Program model: resolved source files plus the symbol and type queries the
//! extraction pipeline runs against.
//!
//! [`ProgramModel`] is the only seam between extraction and the front end.
//! [`SourceProgram`] is the bundled implementation, a declaration-level
//! TypeScript binder built from files on disk or from in-memory sources.

pub mod binder;
pub mod jsdoc;
pub mod lexer;
pub mod parser;

pub use binder::SourceProgram;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identity of a resolved, de-duplicated named declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) usize);

/// A declaration name node inside a [`SourceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One `@name text` directive from a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsDocTag {
    pub name: String,
    /// Tag text, trimmed; empty for a bare `@name`.
    pub text: String,
}

/// Options for [`ProgramModel::type_to_string`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeFormat {
    /// Prefix types declared inside namespaces with their namespace path.
    pub fully_qualified: bool,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: PathBuf,
    pub statements: Vec<Statement>,
}

impl SourceFile {
    /// `.d.ts` files only declare types.
    pub fn is_declaration_file(&self) -> bool {
        is_declaration_path(&self.file_name)
    }
}

pub(crate) fn is_declaration_path(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".d.ts")
}

/// Top-level statement categories the walker dispatches on.
#[derive(Debug, Clone)]
pub enum Statement {
    Interface(Declaration),
    /// One declaration per bound name.
    Variable(Vec<Declaration>),
    Class(Declaration),
    /// Body of a `namespace`, `module` or `declare global` block.
    Namespace(Vec<Statement>),
    Other,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    /// Node of the declared name; resolve with [`ProgramModel::symbol_at_location`].
    pub node: NodeId,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Symbol and type resolution service.
pub trait ProgramModel {
    /// Resolved source files, in program order.
    fn source_files(&self) -> &[SourceFile];

    fn symbol_at_location(&self, node: NodeId) -> Option<SymbolId>;

    fn symbol_name(&self, symbol: SymbolId) -> &str;

    fn type_of_symbol(&self, symbol: SymbolId) -> TypeId;

    fn type_to_string(&self, ty: TypeId, format: TypeFormat) -> String;

    /// Apparent properties of a type, inherited ones included.
    fn properties_of_type(&self, ty: TypeId) -> Vec<SymbolId>;

    /// Members declared by an interface or class (instance side only).
    fn members(&self, symbol: SymbolId) -> Vec<SymbolId>;

    /// Types listed by the first heritage clause of the first declaration,
    /// as written.
    fn heritage_clause(&self, symbol: SymbolId) -> Option<Vec<String>>;

    /// Doc comment text without tag directives.
    fn documentation_comment(&self, symbol: SymbolId) -> String;

    fn jsdoc_tags(&self, symbol: SymbolId) -> Vec<JsDocTag>;

    /// Doc comment text with its tag directives inline.
    fn raw_doc_comment(&self, symbol: SymbolId) -> String {
        let mut raw = self.documentation_comment(symbol);
        for tag in self.jsdoc_tags(symbol) {
            if !raw.is_empty() {
                raw.push('\n');
            }
            raw.push('@');
            raw.push_str(&tag.name);
            if !tag.text.is_empty() {
                raw.push(' ');
                raw.push_str(&tag.text);
            }
        }
        raw
    }

    fn is_optional(&self, symbol: SymbolId) -> bool;

    /// False for type-only merge artifacts and signature members.
    fn has_value_declaration(&self, symbol: SymbolId) -> bool;
}
