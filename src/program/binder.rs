//! Binder and checker for [`SourceProgram`].
//!
//! Parsed files are bound in program order into scopes (the global scope for
//! script files and the bundled library, one scope per module file, one per
//! namespace), merging repeated interface and namespace declarations. Types
//! are recorded as written and resolved lazily, so a declaration may refer to
//! one that appears later in the program.

use super::jsdoc::{self, JsDoc};
use super::lexer::{self, Token, TokenKind};
use super::parser::{
    self, BindingKind, Expr, InterfaceDecl, Member, MemberKind, NamespaceDecl, Stmt, TypeNode,
    VariableDecl,
};
use super::{
    Declaration, JsDocTag, NodeId, ProgramError, ProgramModel, SourceFile, Statement, SymbolId,
    TypeFormat, TypeId,
};
use crate::config::CompilerOptions;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name under which the bundled library appears in the program.
pub const LIB_FILE_NAME: &str = "lib.d.ts";
const LIB_SOURCE: &str = include_str!("lib.d.ts");

/// Keyword types rendered as themselves.
const KEYWORD_TYPES: &[&str] = &[
    "string", "number", "boolean", "undefined", "null", "never", "unknown", "object", "symbol",
    "bigint", "this",
];

/// Keywords that keep a space before a following `(` or `<`.
const SPACED_KEYWORDS: &[&str] = &["new", "typeof", "keyof", "extends", "is", "in", "as"];

type ScopeId = usize;
const GLOBAL: ScopeId = 0;

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    /// Namespace path prepended to fully qualified type names.
    qualifier: Vec<String>,
    types: IndexMap<String, SymbolId>,
    values: IndexMap<String, SymbolId>,
    namespaces: IndexMap<String, ScopeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolKind {
    Interface,
    Class,
    Variable,
    /// Property, method or accessor.
    Member,
    /// Index, call or construct signature, or a constructor.
    Signature,
}

#[derive(Debug)]
struct SymbolData {
    name: String,
    kind: SymbolKind,
    scope: ScopeId,
    ty: TypeId,
    docs: Vec<JsDoc>,
    optional: bool,
    declarations: usize,
    members: IndexMap<String, SymbolId>,
    /// First heritage clause of the first declaration.
    heritage: Option<Vec<Vec<Token>>>,
    /// `extends` targets of every declaration.
    bases: Vec<Vec<Token>>,
}

#[derive(Debug, Clone)]
enum TypeData {
    Any,
    Void,
    Keyword(String),
    Literal {
        text: String,
        apparent: &'static str,
    },
    /// A type as written, resolved on demand.
    Reference {
        tokens: Vec<Token>,
        scope: ScopeId,
    },
    Object(Vec<SymbolId>),
    Array(TypeId),
    Union(Vec<TypeId>),
    Function {
        params: Vec<Token>,
        ret: TypeId,
        scope: ScopeId,
    },
    /// Constructor side of a class.
    Class(SymbolId),
}

/// Declaration-level TypeScript program.
#[derive(Debug)]
pub struct SourceProgram {
    files: Vec<SourceFile>,
    nodes: Vec<SymbolId>,
    symbols: Vec<SymbolData>,
    types: Vec<TypeData>,
    scopes: Vec<Scope>,
}

impl SourceProgram {
    /// Read and bind `paths` in order, after the bundled library unless
    /// `no_lib` is set.
    pub fn from_files<P: AsRef<Path>>(
        paths: &[P],
        options: &CompilerOptions,
    ) -> Result<Self, ProgramError> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path).map_err(|source| ProgramError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            sources.push((path.to_path_buf(), text));
        }
        Ok(Self::from_sources(sources, options))
    }

    /// Bind in-memory sources, given as `(file name, text)` pairs.
    pub fn from_sources<P, S, I>(sources: I, options: &CompilerOptions) -> Self
    where
        P: Into<PathBuf>,
        S: AsRef<str>,
        I: IntoIterator<Item = (P, S)>,
    {
        let mut program = SourceProgram {
            files: Vec::new(),
            nodes: Vec::new(),
            symbols: Vec::new(),
            types: Vec::new(),
            scopes: vec![Scope::default()],
        };
        if !options.no_lib {
            program.add_source(PathBuf::from(LIB_FILE_NAME), LIB_SOURCE);
        }
        for (path, text) in sources {
            program.add_source(path.into(), text.as_ref());
        }
        program
    }

    fn add_source(&mut self, file_name: PathBuf, text: &str) {
        let module = parser::parse(lexer::tokenize(text));
        let scope = if module.is_module {
            self.new_scope(GLOBAL, Vec::new())
        } else {
            GLOBAL
        };
        let statements = self.bind_statements(&module.statements, scope);
        debug!(
            file = %file_name.display(),
            statements = statements.len(),
            module = module.is_module,
            "bound source file"
        );
        self.files.push(SourceFile {
            file_name,
            statements,
        });
    }

    // -- Binding ------------------------------------------------------------

    fn new_scope(&mut self, parent: ScopeId, qualifier: Vec<String>) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            qualifier,
            ..Default::default()
        });
        self.scopes.len() - 1
    }

    fn alloc(&mut self, data: TypeData) -> TypeId {
        self.types.push(data);
        TypeId(self.types.len() - 1)
    }

    fn new_symbol(&mut self, name: &str, kind: SymbolKind, scope: ScopeId, ty: TypeId) -> SymbolId {
        self.symbols.push(SymbolData {
            name: name.to_string(),
            kind,
            scope,
            ty,
            docs: Vec::new(),
            optional: false,
            declarations: 0,
            members: IndexMap::new(),
            heritage: None,
            bases: Vec::new(),
        });
        SymbolId(self.symbols.len() - 1)
    }

    fn add_doc(&mut self, symbol: SymbolId, doc: Option<&String>) {
        let data = &mut self.symbols[symbol.0];
        data.declarations += 1;
        if let Some(doc) = doc {
            data.docs.push(jsdoc::parse(doc));
        }
    }

    fn declaration(&mut self, symbol: SymbolId, name: &str) -> Declaration {
        self.nodes.push(symbol);
        Declaration {
            node: NodeId(self.nodes.len() - 1),
            name: name.to_string(),
        }
    }

    fn bind_statements(&mut self, statements: &[Stmt], scope: ScopeId) -> Vec<Statement> {
        statements
            .iter()
            .map(|stmt| self.bind_statement(stmt, scope))
            .collect()
    }

    fn bind_statement(&mut self, stmt: &Stmt, scope: ScopeId) -> Statement {
        match stmt {
            Stmt::Interface(decl) => {
                let symbol = self.declare_interface(decl, scope, SymbolKind::Interface);
                Statement::Interface(self.declaration(symbol, &decl.name))
            }
            Stmt::Class(decl) => {
                let symbol = self.declare_interface(decl, scope, SymbolKind::Class);
                Statement::Class(self.declaration(symbol, &decl.name))
            }
            Stmt::Variable(stmt) => Statement::Variable(
                stmt.declarations
                    .iter()
                    .map(|decl| {
                        let symbol = self.declare_variable(decl, stmt.kind, scope);
                        self.declaration(symbol, &decl.name)
                    })
                    .collect(),
            ),
            Stmt::Namespace(ns) => {
                let inner = self.declare_namespace(ns, scope);
                Statement::Namespace(self.bind_statements(&ns.body, inner))
            }
            Stmt::Other => Statement::Other,
        }
    }

    fn declare_namespace(&mut self, ns: &NamespaceDecl, scope: ScopeId) -> ScopeId {
        if ns.path == ["global"] {
            return GLOBAL;
        }
        let mut current = scope;
        for segment in &ns.path {
            if let Some(&existing) = self.scopes[current].namespaces.get(segment) {
                current = existing;
                continue;
            }
            let qualifier = if segment.starts_with(['"', '\'']) {
                Vec::new()
            } else {
                let mut q = self.scopes[current].qualifier.clone();
                q.push(segment.clone());
                q
            };
            let inner = self.new_scope(current, qualifier);
            self.scopes[current].namespaces.insert(segment.clone(), inner);
            current = inner;
        }
        current
    }

    /// Declare an interface or class, merging with an earlier declaration
    /// of the same name in this scope.
    fn declare_interface(
        &mut self,
        decl: &InterfaceDecl,
        scope: ScopeId,
        kind: SymbolKind,
    ) -> SymbolId {
        let existing = self.scopes[scope]
            .types
            .get(&decl.name)
            .copied()
            .filter(|id| matches!(self.symbols[id.0].kind, SymbolKind::Interface | SymbolKind::Class));

        let symbol = match existing {
            Some(id) => id,
            None => {
                let ty = self.alloc(TypeData::Reference {
                    tokens: vec![Token::new(TokenKind::Ident, decl.name.as_str())],
                    scope,
                });
                let id = self.new_symbol(&decl.name, kind, scope, ty);
                self.scopes[scope].types.insert(decl.name.clone(), id);
                id
            }
        };

        if kind == SymbolKind::Class {
            let ty = self.alloc(TypeData::Class(symbol));
            let data = &mut self.symbols[symbol.0];
            data.kind = SymbolKind::Class;
            data.ty = ty;
            self.scopes[scope].values.insert(decl.name.clone(), symbol);
        }

        let first = self.symbols[symbol.0].declarations == 0;
        self.add_doc(symbol, decl.doc.as_ref());
        let data = &mut self.symbols[symbol.0];
        if first {
            data.heritage = decl.heritage.first().map(|clause| clause.types.clone());
        }
        for clause in decl.heritage.iter().filter(|c| !c.implements) {
            data.bases.extend(clause.types.iter().cloned());
        }

        for member in decl.members.iter().filter(|m| !m.is_static) {
            let id = self.declare_member(member, scope);
            self.symbols[symbol.0]
                .members
                .entry(member.name.clone())
                .or_insert(id);
        }
        symbol
    }

    fn declare_member(&mut self, member: &Member, scope: ScopeId) -> SymbolId {
        let (kind, ty) = match &member.kind {
            MemberKind::Property { annotation, init } => (
                SymbolKind::Member,
                self.annotated_type(annotation.as_ref(), init.as_ref(), true, scope),
            ),
            MemberKind::Method {
                params,
                ret,
                returns_value,
            } => {
                let ret = match ret {
                    Some(node) => self.type_from_node(node, scope),
                    None if *returns_value => self.alloc(TypeData::Any),
                    None => self.alloc(TypeData::Void),
                };
                let ty = self.alloc(TypeData::Function {
                    params: params.clone(),
                    ret,
                    scope,
                });
                (SymbolKind::Member, ty)
            }
            MemberKind::Accessor(annotation) => (
                SymbolKind::Member,
                self.annotated_type(annotation.as_ref(), None, true, scope),
            ),
            MemberKind::Index | MemberKind::Call | MemberKind::Construct | MemberKind::Constructor => {
                (SymbolKind::Signature, self.alloc(TypeData::Any))
            }
        };
        let id = self.new_symbol(&member.name, kind, scope, ty);
        self.symbols[id.0].optional = member.optional;
        self.add_doc(id, member.doc.as_ref());
        id
    }

    fn declare_variable(&mut self, decl: &VariableDecl, kind: BindingKind, scope: ScopeId) -> SymbolId {
        if let Some(&id) = self.scopes[scope].values.get(&decl.name) {
            if self.symbols[id.0].kind == SymbolKind::Variable {
                self.add_doc(id, decl.doc.as_ref());
                return id;
            }
        }
        let widen = kind != BindingKind::Const;
        let ty = self.annotated_type(decl.annotation.as_ref(), decl.init.as_ref(), widen, scope);
        let id = self.new_symbol(&decl.name, SymbolKind::Variable, scope, ty);
        self.add_doc(id, decl.doc.as_ref());
        self.scopes[scope].values.insert(decl.name.clone(), id);
        id
    }

    // -- Types --------------------------------------------------------------

    /// Declared type if annotated, else the initializer's type.
    fn annotated_type(
        &mut self,
        annotation: Option<&TypeNode>,
        init: Option<&Expr>,
        widen: bool,
        scope: ScopeId,
    ) -> TypeId {
        match (annotation, init) {
            (Some(node), _) => self.type_from_node(node, scope),
            (None, Some(expr)) => self.type_from_expr(expr, widen, scope),
            (None, None) => self.alloc(TypeData::Any),
        }
    }

    fn type_from_node(&mut self, node: &TypeNode, scope: ScopeId) -> TypeId {
        match node {
            TypeNode::Literal(members) => {
                let ids = members
                    .iter()
                    .map(|member| self.declare_member(member, scope))
                    .collect();
                self.alloc(TypeData::Object(ids))
            }
            TypeNode::Written(tokens) => self.type_from_tokens(tokens, scope),
        }
    }

    fn type_from_tokens(&mut self, tokens: &[Token], scope: ScopeId) -> TypeId {
        let tokens = strip_parens(tokens);
        let reference = |tokens: &[Token]| TypeData::Reference {
            tokens: tokens.to_vec(),
            scope,
        };

        let data = match tokens {
            [] => TypeData::Any,
            [tok] => match tok.kind {
                TokenKind::Ident => match tok.text.as_str() {
                    "any" => TypeData::Any,
                    "void" => TypeData::Void,
                    "true" | "false" => TypeData::Literal {
                        text: tok.text.clone(),
                        apparent: "Boolean",
                    },
                    k if KEYWORD_TYPES.contains(&k) => TypeData::Keyword(k.to_string()),
                    _ => reference(tokens),
                },
                TokenKind::Str => TypeData::Literal {
                    text: quote(&parser::unquote(&tok.text)),
                    apparent: "String",
                },
                TokenKind::Number => TypeData::Literal {
                    text: tok.text.clone(),
                    apparent: "Number",
                },
                _ => reference(tokens),
            },
            [minus, number] if minus.is("-") && number.kind == TokenKind::Number => {
                TypeData::Literal {
                    text: format!("-{}", number.text),
                    apparent: "Number",
                }
            }
            _ if has_top_level(tokens, &["|", "&", "=>", "?", "extends"]) => reference(tokens),
            [rest @ .., open, close] if open.is("[") && close.is("]") && !rest.is_empty() => {
                let element = self.type_from_tokens(rest, scope);
                TypeData::Array(element)
            }
            [array, open, inner @ .., close]
                if array.is("Array") && open.is("<") && close.is(">") && !inner.is_empty() =>
            {
                let element = self.type_from_tokens(inner, scope);
                TypeData::Array(element)
            }
            _ => reference(tokens),
        };
        self.alloc(data)
    }

    /// Type of an initializer. `widen` turns literal types into their
    /// primitive (`let`, `var`, object literal members).
    fn type_from_expr(&mut self, expr: &Expr, widen: bool, scope: ScopeId) -> TypeId {
        let data = match expr {
            Expr::Str(_) | Expr::Template if widen => TypeData::Keyword("string".to_string()),
            Expr::Template => TypeData::Keyword("string".to_string()),
            Expr::Str(text) => TypeData::Literal {
                text: quote(text),
                apparent: "String",
            },
            Expr::Number(_) if widen => TypeData::Keyword("number".to_string()),
            Expr::Number(text) => TypeData::Literal {
                text: text.clone(),
                apparent: "Number",
            },
            Expr::Bool(_) if widen => TypeData::Keyword("boolean".to_string()),
            Expr::Bool(value) => TypeData::Literal {
                text: value.to_string(),
                apparent: "Boolean",
            },
            Expr::Regex => TypeData::Reference {
                tokens: vec![Token::new(TokenKind::Ident, "RegExp")],
                scope,
            },
            Expr::Object(members) => {
                let ids = members
                    .iter()
                    .filter(|m| matches!(m.kind, MemberKind::Property { .. } | MemberKind::Method { .. } | MemberKind::Accessor(_)))
                    .map(|member| self.declare_member(member, scope))
                    .collect();
                TypeData::Object(ids)
            }
            Expr::Array(elements) => {
                let element = self.array_element_type(elements, scope);
                TypeData::Array(element)
            }
            Expr::New(callee) if !callee.is_empty() => TypeData::Reference {
                tokens: callee.clone(),
                scope,
            },
            Expr::Function { params, ret } => {
                let ret = match ret {
                    Some(node) => self.type_from_node(node, scope),
                    None => self.alloc(TypeData::Any),
                };
                TypeData::Function {
                    params: params.clone(),
                    ret,
                    scope,
                }
            }
            Expr::Cast(node) => return self.type_from_node(node, scope),
            Expr::New(_) | Expr::Other => TypeData::Any,
        };
        self.alloc(data)
    }

    fn array_element_type(&mut self, elements: &[Expr], scope: ScopeId) -> TypeId {
        let mut parts: Vec<(String, TypeId)> = Vec::new();
        for element in elements {
            let ty = self.type_from_expr(element, true, scope);
            let rendered = self.render_type(ty, TypeFormat::default());
            if !parts.iter().any(|(r, _)| *r == rendered) {
                parts.push((rendered, ty));
            }
        }
        match parts.len() {
            0 => self.alloc(TypeData::Any),
            1 => parts[0].1,
            _ => {
                let ids = parts.into_iter().map(|(_, ty)| ty).collect();
                self.alloc(TypeData::Union(ids))
            }
        }
    }

    // -- Resolution ---------------------------------------------------------

    fn scope_chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(&self.scopes[scope]), |s| s.parent.map(|p| &self.scopes[p]))
    }

    fn resolve_type(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scope_chain(scope).find_map(|s| s.types.get(name).copied())
    }

    fn resolve_namespace(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.scope_chain(scope).find_map(|s| s.namespaces.get(name).copied())
    }

    /// Interface or class named by a type reference such as `NS.Name<T>`.
    fn reference_target(&self, tokens: &[Token], scope: ScopeId) -> Option<SymbolId> {
        let end = tokens.iter().position(|t| t.is("<")).unwrap_or(tokens.len());
        let path = &tokens[..end];
        if path.is_empty() || path.len() % 2 == 0 {
            return None;
        }
        let mut names = Vec::new();
        for (i, tok) in path.iter().enumerate() {
            let ok = if i % 2 == 0 { tok.is_ident() } else { tok.is(".") };
            if !ok {
                return None;
            }
            if i % 2 == 0 {
                names.push(tok.text.as_str());
            }
        }
        if end < tokens.len() && !tokens.last().is_some_and(|t| t.is(">")) {
            return None;
        }

        let (last, qualifier) = names.split_last()?;
        let Some((head, rest)) = qualifier.split_first() else {
            return self.resolve_type(scope, last);
        };
        let mut ns = self.resolve_namespace(scope, head)?;
        for segment in rest {
            ns = *self.scopes[ns].namespaces.get(*segment)?;
        }
        self.scopes[ns].types.get(*last).copied()
    }

    fn lib_interface(&self, name: &str) -> Option<SymbolId> {
        self.scopes[GLOBAL].types.get(name).copied()
    }

    /// Declared and inherited members, derived declarations first.
    fn all_members(&self, symbol: SymbolId) -> Vec<SymbolId> {
        let mut members = IndexMap::new();
        let mut visited = Vec::new();
        self.collect_members(symbol, &mut members, &mut visited);
        members.into_values().collect()
    }

    fn collect_members(
        &self,
        symbol: SymbolId,
        members: &mut IndexMap<String, SymbolId>,
        visited: &mut Vec<SymbolId>,
    ) {
        if visited.contains(&symbol) {
            return;
        }
        visited.push(symbol);
        let data = &self.symbols[symbol.0];
        for (name, &id) in &data.members {
            members.entry(name.clone()).or_insert(id);
        }
        for base in &data.bases {
            if let Some(target) = self.reference_target(base, data.scope) {
                self.collect_members(target, members, visited);
            }
        }
    }

    fn apparent_members(&self, interface: &str) -> Vec<SymbolId> {
        self.lib_interface(interface)
            .map(|id| self.all_members(id))
            .unwrap_or_default()
    }

    // -- Rendering ----------------------------------------------------------

    fn render_type(&self, ty: TypeId, format: TypeFormat) -> String {
        match &self.types[ty.0] {
            TypeData::Any => "any".to_string(),
            TypeData::Void => "void".to_string(),
            TypeData::Keyword(k) => k.clone(),
            TypeData::Literal { text, .. } => text.clone(),
            TypeData::Reference { tokens, scope } => self.render_written(tokens, *scope, format),
            TypeData::Object(members) if members.is_empty() => "{}".to_string(),
            TypeData::Object(members) => {
                let fields: Vec<String> = members
                    .iter()
                    .map(|&id| {
                        let data = &self.symbols[id.0];
                        format!(
                            "{}{}: {};",
                            data.name,
                            if data.optional { "?" } else { "" },
                            self.render_type(data.ty, format)
                        )
                    })
                    .collect();
                format!("{{ {} }}", fields.join(" "))
            }
            TypeData::Array(element) => {
                let inner = self.render_type(*element, format);
                match self.types[element.0] {
                    TypeData::Union(_) | TypeData::Function { .. } => format!("({})[]", inner),
                    _ => format!("{}[]", inner),
                }
            }
            TypeData::Union(parts) => parts
                .iter()
                .map(|&part| self.render_type(part, format))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeData::Function { params, ret, scope } => format!(
                "{} => {}",
                self.render_written(params, *scope, format),
                self.render_type(*ret, format)
            ),
            TypeData::Class(symbol) => format!("typeof {}", self.qualified_name(*symbol, format)),
        }
    }

    fn qualified_name(&self, symbol: SymbolId, format: TypeFormat) -> String {
        let data = &self.symbols[symbol.0];
        let qualifier = &self.scopes[data.scope].qualifier;
        if format.fully_qualified && !qualifier.is_empty() {
            format!("{}.{}", qualifier.join("."), data.name)
        } else {
            data.name.clone()
        }
    }

    /// Render written tokens, qualifying reference heads that resolve to
    /// namespace members when `fully_qualified` is set.
    fn render_written(&self, tokens: &[Token], scope: ScopeId, format: TypeFormat) -> String {
        render_tokens(tokens, |i, tok| {
            if !format.fully_qualified || !is_reference_head(tokens, i) {
                return None;
            }
            if tokens.get(i + 1).is_some_and(|t| t.is(".")) {
                let ns = self.resolve_namespace(scope, &tok.text)?;
                let qualifier = &self.scopes[ns].qualifier;
                return (qualifier.len() > 1).then(|| qualifier.join("."));
            }
            let target = self.resolve_type(scope, &tok.text)?;
            let qualifier = &self.scopes[self.symbols[target.0].scope].qualifier;
            (!qualifier.is_empty()).then(|| format!("{}.{}", qualifier.join("."), tok.text))
        })
    }
}

impl ProgramModel for SourceProgram {
    fn source_files(&self) -> &[SourceFile] {
        &self.files
    }

    fn symbol_at_location(&self, node: NodeId) -> Option<SymbolId> {
        self.nodes.get(node.0).copied()
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbols[symbol.0].name
    }

    fn type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        self.symbols[symbol.0].ty
    }

    fn type_to_string(&self, ty: TypeId, format: TypeFormat) -> String {
        self.render_type(ty, format)
    }

    fn properties_of_type(&self, ty: TypeId) -> Vec<SymbolId> {
        match &self.types[ty.0] {
            TypeData::Keyword(k) => match k.as_str() {
                "string" => self.apparent_members("String"),
                "number" => self.apparent_members("Number"),
                "boolean" => self.apparent_members("Boolean"),
                _ => Vec::new(),
            },
            TypeData::Literal { apparent, .. } => self.apparent_members(apparent),
            TypeData::Reference { tokens, scope } => self
                .reference_target(tokens, *scope)
                .map(|target| self.all_members(target))
                .unwrap_or_default(),
            TypeData::Object(members) => members.clone(),
            TypeData::Array(_) => self.apparent_members("Array"),
            TypeData::Function { .. } => self.apparent_members("Function"),
            TypeData::Any | TypeData::Void | TypeData::Union(_) | TypeData::Class(_) => Vec::new(),
        }
    }

    fn members(&self, symbol: SymbolId) -> Vec<SymbolId> {
        self.symbols[symbol.0].members.values().copied().collect()
    }

    fn heritage_clause(&self, symbol: SymbolId) -> Option<Vec<String>> {
        let heritage = self.symbols[symbol.0].heritage.as_ref()?;
        Some(
            heritage
                .iter()
                .map(|tokens| render_tokens(tokens, |_, _| None))
                .collect(),
        )
    }

    fn documentation_comment(&self, symbol: SymbolId) -> String {
        join_docs(&self.symbols[symbol.0].docs, |doc| &doc.description)
    }

    fn jsdoc_tags(&self, symbol: SymbolId) -> Vec<JsDocTag> {
        self.symbols[symbol.0]
            .docs
            .iter()
            .flat_map(|doc| doc.tags.iter().cloned())
            .collect()
    }

    fn raw_doc_comment(&self, symbol: SymbolId) -> String {
        join_docs(&self.symbols[symbol.0].docs, |doc| &doc.raw)
    }

    fn is_optional(&self, symbol: SymbolId) -> bool {
        self.symbols[symbol.0].optional
    }

    fn has_value_declaration(&self, symbol: SymbolId) -> bool {
        matches!(
            self.symbols[symbol.0].kind,
            SymbolKind::Class | SymbolKind::Variable | SymbolKind::Member
        )
    }
}

fn join_docs(docs: &[JsDoc], part: impl Fn(&JsDoc) -> &String) -> String {
    docs.iter()
        .map(part)
        .filter(|text| !text.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text)
}

/// Drop parentheses that wrap the whole token list.
fn strip_parens(tokens: &[Token]) -> &[Token] {
    let mut tokens = tokens;
    while tokens.len() >= 2 && tokens[0].is("(") && tokens[tokens.len() - 1].is(")") {
        let mut depth = 0usize;
        let mut closes_at_end = true;
        for (i, tok) in tokens.iter().enumerate() {
            if tok.is("(") {
                depth += 1;
            } else if tok.is(")") {
                depth -= 1;
                if depth == 0 && i != tokens.len() - 1 {
                    closes_at_end = false;
                    break;
                }
            }
        }
        if !closes_at_end {
            break;
        }
        tokens = &tokens[1..tokens.len() - 1];
    }
    tokens
}

/// Does any of `ops` occur outside brackets?
fn has_top_level(tokens: &[Token], ops: &[&str]) -> bool {
    let mut depth = 0usize;
    for tok in tokens {
        if tok.kind != TokenKind::Punct && !tok.is_ident() {
            continue;
        }
        match tok.text.as_str() {
            "(" | "[" | "{" | "<" if tok.kind == TokenKind::Punct => depth += 1,
            ")" | "]" | "}" | ">" if tok.kind == TokenKind::Punct => {
                depth = depth.saturating_sub(1)
            }
            text if depth == 0 && ops.contains(&text) => return true,
            _ => {}
        }
    }
    false
}

/// An identifier that starts a type reference (not a member access tail or
/// an object key).
fn is_reference_head(tokens: &[Token], i: usize) -> bool {
    let tok = &tokens[i];
    if !tok.is_ident() {
        return false;
    }
    let after_dot = i > 0 && tokens[i - 1].is(".");
    let key = tokens
        .get(i + 1)
        .is_some_and(|next| next.is(":") || next.is("?"));
    !after_dot && !key
}

/// Join tokens back into source-like text. `replace` may substitute the
/// text of an identifier.
pub(crate) fn render_tokens(
    tokens: &[Token],
    mut replace: impl FnMut(usize, &Token) -> Option<String>,
) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for (i, tok) in tokens.iter().enumerate() {
        if prev.is_some_and(|p| needs_space(p, tok)) {
            out.push(' ');
        }
        match tok.kind {
            TokenKind::Str => out.push_str(&quote(&parser::unquote(&tok.text))),
            TokenKind::Ident => match replace(i, tok) {
                Some(text) => out.push_str(&text),
                None => out.push_str(&tok.text),
            },
            _ => out.push_str(&tok.text),
        }
        prev = Some(tok);
    }
    out
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    let p = prev.text.as_str();
    let n = next.text.as_str();
    let prev_punct = prev.kind == TokenKind::Punct;
    let next_punct = next.kind == TokenKind::Punct;

    if prev_punct && matches!(p, "." | "(" | "[" | "<" | "...") {
        return false;
    }
    if prev_punct && p == "{" && next_punct && n == "}" {
        return false;
    }
    if prev_punct && p == "-" && next.kind == TokenKind::Number {
        return false;
    }
    if next_punct && matches!(n, "." | "," | ";" | ":" | ")" | "]" | ">" | "?" | "!") {
        return false;
    }
    if next_punct && matches!(n, "(" | "[" | "<") {
        let after_name = prev.is_ident() && !SPACED_KEYWORDS.contains(&p);
        let after_close = prev_punct && matches!(p, ")" | "]" | ">");
        return !(after_name || after_close);
    }
    true
}
