//! Declaration-level TypeScript parser.
//!
//! Only the shapes documentation cares about are parsed in detail:
//! interfaces, classes, variable statements and namespaces, with their
//! members, type annotations and simple initializers. Every other statement
//! is skipped with balanced brackets and automatic semicolon insertion.

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Default)]
pub struct Module {
    pub statements: Vec<Stmt>,
    /// The file has a top-level `import` or `export` and so its own scope.
    pub is_module: bool,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Interface(InterfaceDecl),
    Class(InterfaceDecl),
    Variable(VariableStmt),
    Namespace(NamespaceDecl),
    Other,
}

/// Interface or class declaration.
#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: String,
    pub doc: Option<String>,
    pub heritage: Vec<HeritageClause>,
    pub members: Vec<Member>,
}

/// `extends A, B` or `implements C`, types as written.
#[derive(Debug, Clone)]
pub struct HeritageClause {
    pub implements: bool,
    pub types: Vec<Vec<Token>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone)]
pub struct VariableStmt {
    pub kind: BindingKind,
    pub declarations: Vec<VariableDecl>,
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub doc: Option<String>,
    pub annotation: Option<TypeNode>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    /// `A.B.C` yields three segments; `declare module "x"` one quoted segment.
    pub path: Vec<String>,
    pub doc: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub doc: Option<String>,
    pub optional: bool,
    pub is_static: bool,
    pub kind: MemberKind,
}

#[derive(Debug, Clone)]
pub enum MemberKind {
    Property {
        annotation: Option<TypeNode>,
        init: Option<Expr>,
    },
    Method {
        params: Vec<Token>,
        ret: Option<TypeNode>,
        returns_value: bool,
    },
    Accessor(Option<TypeNode>),
    Index,
    Call,
    Construct,
    Constructor,
}

#[derive(Debug, Clone)]
pub enum TypeNode {
    /// Any type other than a bare object literal, kept as written.
    Written(Vec<Token>),
    /// `{ a: string; b?: number }`
    Literal(Vec<Member>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// String literal, quotes removed.
    Str(String),
    Template,
    Number(String),
    Bool(bool),
    Regex,
    Object(Vec<Member>),
    Array(Vec<Expr>),
    /// `new Callee(...)`, callee tokens as written.
    New(Vec<Token>),
    Function {
        params: Vec<Token>,
        ret: Option<TypeNode>,
    },
    /// `expr as T`
    Cast(TypeNode),
    Other,
}

/// Tokens after which a line break does not end a statement.
const CONTINUES_AFTER: &[&str] = &[
    "=", ",", ".", "?.", "(", "[", "{", "=>", ":", "?", "|", "&", "+", "-", "*", "/", "%", "<",
    "&&", "||", "??", "!", "~", "...", "extends", "keyof", "typeof", "new", "as", "is", "in",
    "instanceof", "export", "declare", "import", "type", "function", "async", "abstract",
    "class", "interface", "enum", "namespace", "module", "const", "let", "var", "default",
    "readonly", "unique", "infer",
];

/// Tokens that continue the previous line when they start a new one.
const CONTINUES_BEFORE: &[&str] = &[
    ".", "?.", "=>", "|", "&", "&&", "||", "??", ",", "?", ":", "=", "+", "*", "as",
    "satisfies", "extends", "instanceof",
];

const CONTINUES_AFTER_BLOCK: &[&str] = &[
    "else", "catch", "finally", ".", "?.", ",", "?", ":", "=>", "|", "&", "&&", "||", "??", "+",
    "-", "*", "/", "as", "satisfies", ")", "]",
];

const CLASS_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "readonly", "static", "abstract", "declare", "override",
    "async", "accessor",
];

pub fn parse(tokens: Vec<Token>) -> Module {
    let mut parser = Parser {
        tokens,
        pos: 0,
        ns_depth: 0,
        is_module: false,
    };
    let statements = parser.parse_statements();
    Module {
        statements,
        is_module: parser.is_module,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    ns_depth: usize,
    is_module: bool,
}

impl Parser {
    // -- Cursor helpers -----------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn at(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text))
    }

    fn at_offset(&self, offset: usize, text: &str) -> bool {
        self.peek_at(offset).is_some_and(|t| t.is(text))
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.at(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn doc(&self) -> Option<String> {
        self.peek().and_then(|t| t.doc.clone())
    }

    /// A line break before the current token ends the construct that `prev`
    /// belongs to.
    fn asi_break(&self) -> bool {
        let Some(next) = self.peek() else {
            return true;
        };
        if !next.newline_before || self.pos == 0 {
            return false;
        }
        let prev = &self.tokens[self.pos - 1];
        let prev_continues = matches!(prev.kind, TokenKind::Ident | TokenKind::Punct)
            && CONTINUES_AFTER.contains(&prev.text.as_str());
        let next_continues = matches!(next.kind, TokenKind::Ident | TokenKind::Punct)
            && CONTINUES_BEFORE.contains(&next.text.as_str());
        !prev_continues && !next_continues
    }

    // -- Statements ---------------------------------------------------------

    fn parse_statements(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            if self.at("}") {
                if self.ns_depth > 0 {
                    self.bump();
                    break;
                }
                // stray closer at top level
                self.bump();
                continue;
            }
            if self.eat(";") {
                continue;
            }
            statements.push(self.parse_statement());
        }
        statements
    }

    fn parse_statement(&mut self) -> Stmt {
        let doc = self.doc();
        while self.at("@") {
            self.skip_decorator();
        }

        let mut ambient = false;
        loop {
            if self.at("export") {
                if self.ns_depth == 0 {
                    self.is_module = true;
                }
                self.bump();
                self.eat("default");
            } else if self.at("declare") && self.peek_at(1).is_some_and(|t| t.is_ident()) {
                ambient = true;
                self.bump();
            } else if self.at("abstract") && self.at_offset(1, "class") {
                self.bump();
            } else {
                break;
            }
        }

        let Some(tok) = self.peek() else {
            return Stmt::Other;
        };
        let keyword = if tok.is_ident() { tok.text.clone() } else { String::new() };
        let next = self.peek_at(1);
        let next_is_name = next.is_some_and(|t| t.is_ident());
        let next_is_binding = next.is_some_and(|t| t.is_ident() || t.is("{") || t.is("["));
        let next_is_module_name = next.is_some_and(|t| t.is_ident() || t.kind == TokenKind::Str);

        match keyword.as_str() {
            "interface" if next_is_name => Stmt::Interface(self.parse_interface(doc)),
            "class" => self.parse_class(doc),
            "const" if self.at_offset(1, "enum") => {
                self.skip_statement();
                Stmt::Other
            }
            "const" | "let" | "var" if next_is_binding => {
                Stmt::Variable(self.parse_variable_statement(doc))
            }
            "namespace" | "module" if next_is_module_name => self.parse_namespace(doc),
            "global" if ambient && self.at_offset(1, "{") => {
                self.bump();
                self.parse_namespace_body(vec!["global".to_string()], doc)
            }
            "import" => {
                if self.ns_depth == 0 {
                    self.is_module = true;
                }
                self.skip_statement();
                Stmt::Other
            }
            _ => {
                self.skip_statement();
                Stmt::Other
            }
        }
    }

    /// Skip one statement of any kind.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        loop {
            let Some(tok) = self.peek() else {
                return;
            };
            if depth == 0 && tok.is("}") {
                return;
            }
            let Some(tok) = self.bump() else {
                return;
            };
            match tok.text.as_str() {
                "{" | "(" | "[" if tok.kind == TokenKind::Punct => depth += 1,
                ")" | "]" if tok.kind == TokenKind::Punct => depth = depth.saturating_sub(1),
                "}" if tok.kind == TokenKind::Punct => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && !self.block_continues() {
                        self.eat(";");
                        return;
                    }
                }
                ";" if depth == 0 => return,
                _ => {}
            }
            if depth == 0 && self.asi_break() {
                return;
            }
        }
    }

    /// After a closing brace: does the statement go on (`else`, `.then`, ...)?
    fn block_continues(&self) -> bool {
        let Some(next) = self.peek() else {
            return false;
        };
        CONTINUES_AFTER_BLOCK.iter().any(|text| next.is(text))
            || (!next.newline_before && (next.is("(") || next.is("[")))
    }

    fn skip_decorator(&mut self) {
        self.bump(); // @
        self.bump(); // name
        while self.at(".") {
            self.bump();
            self.bump();
        }
        if self.at("(") {
            self.skip_balanced();
        }
    }

    /// Skip a bracketed group starting at the current opener; returns the
    /// tokens consumed, brackets included.
    fn skip_balanced(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            let is_punct = tok.kind == TokenKind::Punct;
            let text = tok.text.clone();
            out.push(tok);
            match text.as_str() {
                "{" | "(" | "[" if is_punct => depth += 1,
                "}" | ")" | "]" if is_punct => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Skip `<...>` type parameters.
    fn skip_type_params(&mut self) {
        if !self.at("<") {
            return;
        }
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            match tok.text.as_str() {
                "<" => depth += 1,
                ">" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                "{" | ";" if depth == 0 => return,
                _ => {}
            }
        }
    }

    fn parse_interface(&mut self, doc: Option<String>) -> InterfaceDecl {
        self.bump(); // interface
        let name = self.bump().map(|t| t.text).unwrap_or_default();
        self.skip_type_params();
        let heritage = self.parse_heritage();
        let members = if self.eat("{") {
            self.parse_members(false)
        } else {
            Vec::new()
        };
        InterfaceDecl {
            name,
            doc,
            heritage,
            members,
        }
    }

    fn parse_class(&mut self, doc: Option<String>) -> Stmt {
        self.bump(); // class
        let name = match self.peek() {
            Some(t) if t.is_ident() && !t.is("extends") && !t.is("implements") => {
                self.bump().map(|t| t.text).unwrap_or_default()
            }
            _ => {
                // anonymous class expression: nothing to document
                self.skip_statement();
                return Stmt::Other;
            }
        };
        self.skip_type_params();
        let heritage = self.parse_heritage();
        let members = if self.eat("{") {
            self.parse_members(false)
        } else {
            Vec::new()
        };
        Stmt::Class(InterfaceDecl {
            name,
            doc,
            heritage,
            members,
        })
    }

    /// `extends A, B<C> implements D` → one clause per keyword.
    fn parse_heritage(&mut self) -> Vec<HeritageClause> {
        let mut clauses = Vec::new();
        while self.at("extends") || self.at("implements") {
            let implements = self.at("implements");
            self.bump();
            let mut clause = Vec::new();
            let mut current = Vec::new();
            let mut depth = 0usize;
            while let Some(tok) = self.peek() {
                if depth == 0 && (tok.is("{") || tok.is("extends") || tok.is("implements")) {
                    break;
                }
                let Some(tok) = self.bump() else { break };
                match tok.text.as_str() {
                    "<" | "(" | "[" => depth += 1,
                    ">" | ")" | "]" => depth = depth.saturating_sub(1),
                    "," if depth == 0 => {
                        clause.push(std::mem::take(&mut current));
                        continue;
                    }
                    _ => {}
                }
                current.push(tok);
            }
            if !current.is_empty() {
                clause.push(current);
            }
            clauses.push(HeritageClause {
                implements,
                types: clause,
            });
        }
        clauses
    }

    fn parse_namespace(&mut self, doc: Option<String>) -> Stmt {
        self.bump(); // namespace | module
        let mut path = Vec::new();
        if let Some(tok) = self.bump() {
            path.push(tok.text);
        }
        while self.at(".") {
            self.bump();
            if let Some(tok) = self.bump() {
                path.push(tok.text);
            }
        }
        if !self.at("{") {
            // `declare module "x";` shorthand
            self.eat(";");
            return Stmt::Other;
        }
        self.parse_namespace_body(path, doc)
    }

    fn parse_namespace_body(&mut self, path: Vec<String>, doc: Option<String>) -> Stmt {
        self.bump(); // {
        self.ns_depth += 1;
        let body = self.parse_statements();
        self.ns_depth -= 1;
        Stmt::Namespace(NamespaceDecl { path, doc, body })
    }

    fn parse_variable_statement(&mut self, doc: Option<String>) -> VariableStmt {
        let kind = match self.bump().map(|t| t.text).as_deref() {
            Some("const") => BindingKind::Const,
            Some("let") => BindingKind::Let,
            _ => BindingKind::Var,
        };
        let mut declarations = Vec::new();
        let mut statement_doc = doc;

        loop {
            let decl_doc = self.doc().or_else(|| statement_doc.take());
            statement_doc = None;

            let destructured = self.at("{") || self.at("[");
            let names = if destructured {
                let mut names = Vec::new();
                self.parse_binding_pattern(&mut names);
                names
            } else if self.peek().is_some_and(|t| t.is_ident()) {
                vec![self.bump().map(|t| t.text).unwrap_or_default()]
            } else {
                self.skip_statement();
                break;
            };
            self.eat("!");

            let annotation = if self.eat(":") {
                Some(self.parse_type())
            } else {
                None
            };
            let init = if self.eat("=") {
                Some(self.parse_expr())
            } else {
                None
            };

            for name in names {
                declarations.push(VariableDecl {
                    name,
                    doc: decl_doc.clone(),
                    annotation: if destructured { None } else { annotation.clone() },
                    init: if destructured { None } else { init.clone() },
                });
            }

            if self.eat(",") {
                continue;
            }
            self.eat(";");
            break;
        }

        VariableStmt { kind, declarations }
    }

    /// Collect the names bound by a `{ a, b: c }` or `[a, , b]` pattern.
    fn parse_binding_pattern(&mut self, names: &mut Vec<String>) {
        let object = self.at("{");
        let close = if object { "}" } else { "]" };
        self.bump();
        while !self.at_eof() && !self.at(close) {
            if self.eat(",") {
                continue;
            }
            self.eat("...");
            if self.at("{") || self.at("[") {
                self.parse_binding_pattern(names);
            } else if object {
                let key = self.bump().map(|t| t.text).unwrap_or_default();
                if self.eat(":") {
                    if self.at("{") || self.at("[") {
                        self.parse_binding_pattern(names);
                    } else if let Some(tok) = self.bump() {
                        names.push(tok.text);
                    }
                } else {
                    names.push(key);
                }
            } else if let Some(tok) = self.bump() {
                if tok.is_ident() {
                    names.push(tok.text);
                }
            }
            if self.eat("=") {
                self.skip_expression();
            }
        }
        self.eat(close);
    }

    // -- Members ------------------------------------------------------------

    /// Parse members up to and including the closing `}`. In an object
    /// literal `name: value` is an initializer rather than an annotation.
    fn parse_members(&mut self, object_literal: bool) -> Vec<Member> {
        let mut members = Vec::new();
        while !self.at_eof() {
            if self.eat("}") {
                break;
            }
            if self.eat(";") || self.eat(",") {
                continue;
            }
            let start = self.pos;
            if let Some(member) = self.parse_member(object_literal) {
                members.push(member);
            }
            if self.pos == start {
                self.bump();
            }
        }
        members
    }

    fn parse_member(&mut self, object_literal: bool) -> Option<Member> {
        let doc = self.doc();
        while self.at("@") {
            self.skip_decorator();
        }
        if self.eat("...") {
            self.skip_expression();
            return None;
        }

        let mut is_static = false;
        while let Some(tok) = self.peek() {
            let modifier = tok.is_ident() && CLASS_MODIFIERS.contains(&tok.text.as_str());
            if !modifier || !self.next_is_member_name() {
                break;
            }
            if tok.is("static") {
                is_static = true;
            }
            self.bump();
        }

        // get/set accessors
        if (self.at("get") || self.at("set")) && self.next_is_member_name() {
            let getter = self.at("get");
            self.bump();
            let name = self.member_name()?;
            let params = if self.at("(") { self.skip_balanced() } else { Vec::new() };
            let ret = if self.eat(":") { Some(self.parse_type()) } else { None };
            if self.at("{") {
                self.skip_balanced();
            }
            let annotation = if getter { ret } else { param_annotation(&params) };
            return Some(Member {
                name,
                doc,
                optional: false,
                is_static,
                kind: MemberKind::Accessor(annotation),
            });
        }

        let tok = self.peek()?.clone();
        let (name, kind) = if tok.is("[") && self.is_index_signature() {
            self.skip_balanced();
            self.eat("?");
            if self.eat(":") {
                self.parse_type();
            }
            ("__index".to_string(), Some(MemberKind::Index))
        } else if tok.is("(") || tok.is("<") {
            self.skip_signature();
            ("__call".to_string(), Some(MemberKind::Call))
        } else if tok.is("new") && (self.at_offset(1, "(") || self.at_offset(1, "<")) {
            self.bump();
            self.skip_signature();
            ("__new".to_string(), Some(MemberKind::Construct))
        } else if tok.is("constructor") && self.at_offset(1, "(") {
            self.bump();
            self.skip_balanced();
            if self.at("{") {
                self.skip_balanced();
            }
            ("__constructor".to_string(), Some(MemberKind::Constructor))
        } else {
            (self.member_name()?, None)
        };

        if let Some(kind) = kind {
            return Some(Member {
                name,
                doc,
                optional: false,
                is_static,
                kind,
            });
        }

        let optional = self.eat("?");
        self.eat("!");

        let kind = if self.at("(") || self.at("<") {
            self.skip_type_params();
            let params = if self.at("(") { self.skip_balanced() } else { Vec::new() };
            let ret = if self.eat(":") { Some(self.parse_type()) } else { None };
            let returns_value = if self.at("{") {
                body_returns_value(&self.skip_balanced())
            } else {
                false
            };
            MemberKind::Method {
                params,
                ret,
                returns_value,
            }
        } else {
            if object_literal {
                let init = if self.eat(":") { Some(self.parse_expr()) } else { None };
                MemberKind::Property {
                    annotation: None,
                    init,
                }
            } else {
                let annotation = if self.eat(":") { Some(self.parse_type()) } else { None };
                let init = if self.eat("=") { Some(self.parse_expr()) } else { None };
                MemberKind::Property { annotation, init }
            }
        };

        Some(Member {
            name,
            doc,
            optional,
            is_static,
            kind,
        })
    }

    /// A modifier keyword is only a modifier when a member name follows it.
    fn next_is_member_name(&self) -> bool {
        self.peek_at(1).is_some_and(|t| {
            matches!(t.kind, TokenKind::Ident | TokenKind::Str | TokenKind::Number) || t.is("[")
        })
    }

    fn member_name(&mut self) -> Option<String> {
        let tok = self.peek()?.clone();
        match tok.kind {
            TokenKind::Ident | TokenKind::Number => {
                self.bump();
                Some(tok.text)
            }
            TokenKind::Str => {
                self.bump();
                Some(unquote(&tok.text))
            }
            TokenKind::Punct if tok.is("[") => {
                // computed name: not addressable by a plain identifier
                self.skip_balanced();
                self.skip_to_member_end();
                None
            }
            _ => None,
        }
    }

    fn skip_to_member_end(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0 && (tok.is(";") || tok.is(",") || tok.is("}")) {
                return;
            }
            let Some(tok) = self.bump() else { break };
            match tok.text.as_str() {
                "{" | "(" | "[" => depth += 1,
                "}" | ")" | "]" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && tok.is("}") {
                        return;
                    }
                }
                _ => {}
            }
            if depth == 0 && self.asi_break() {
                return;
            }
        }
    }

    /// `[key: string]: T` as opposed to a computed name `[Symbol.iterator]`.
    fn is_index_signature(&self) -> bool {
        self.peek_at(1).is_some_and(|t| t.is_ident())
            && (self.at_offset(2, ":") || self.at_offset(2, "in"))
    }

    fn skip_signature(&mut self) {
        self.skip_type_params();
        if self.at("(") {
            self.skip_balanced();
        }
        if self.eat(":") {
            self.parse_type();
        }
    }

    // -- Types --------------------------------------------------------------

    /// Parse a type annotation up to its terminator.
    fn parse_type(&mut self) -> TypeNode {
        if self.at("{") {
            let start = self.pos;
            self.bump();
            let members = self.parse_members(false);
            if self.type_ends_here() {
                return TypeNode::Literal(members);
            }
            self.pos = start;
        }
        TypeNode::Written(self.collect_type_tokens())
    }

    fn type_ends_here(&self) -> bool {
        match self.peek() {
            None => true,
            Some(t) => {
                t.is(";") || t.is(",") || t.is(")") || t.is("]") || t.is("}") || t.is("=")
                    || t.is("{") || self.asi_break()
            }
        }
    }

    fn collect_type_tokens(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0 {
                let ends = tok.is(";")
                    || tok.is(",")
                    || tok.is(")")
                    || tok.is("]")
                    || tok.is("}")
                    || tok.is("=")
                    || (tok.is("{") && !out.is_empty() && !continues_type(out.last()));
                if ends || (!out.is_empty() && self.asi_break()) {
                    break;
                }
            }
            let Some(tok) = self.bump() else { break };
            match tok.text.as_str() {
                "<" | "(" | "[" | "{" if tok.kind == TokenKind::Punct => depth += 1,
                ">" | ")" | "]" | "}" if tok.kind == TokenKind::Punct => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            out.push(tok);
        }
        out
    }

    // -- Expressions --------------------------------------------------------

    /// Parse an initializer. Anything beyond a simple literal shape is
    /// skipped and reported as [`Expr::Other`].
    fn parse_expr(&mut self) -> Expr {
        let start = self.pos;
        let primary = self.parse_primary();
        if self.at("as") || self.at("satisfies") {
            let cast = self.at("as");
            self.bump();
            if self.eat("const") {
                return if self.expr_ends_here() { primary } else { self.rest_is_other() };
            }
            let ty = self.parse_type();
            if !self.expr_ends_here() {
                return self.rest_is_other();
            }
            return if cast { Expr::Cast(ty) } else { primary };
        }
        if self.expr_ends_here() {
            return primary;
        }
        if self.pos == start {
            self.skip_expression();
            return Expr::Other;
        }
        self.rest_is_other()
    }

    fn rest_is_other(&mut self) -> Expr {
        self.skip_expression();
        Expr::Other
    }

    fn expr_ends_here(&self) -> bool {
        match self.peek() {
            None => true,
            Some(t) => {
                t.is(",") || t.is(";") || t.is(")") || t.is("]") || t.is("}") || self.asi_break()
            }
        }
    }

    fn parse_primary(&mut self) -> Expr {
        let Some(tok) = self.peek().cloned() else {
            return Expr::Other;
        };
        match tok.kind {
            TokenKind::Str => {
                self.bump();
                Expr::Str(unquote(&tok.text))
            }
            TokenKind::Template => {
                self.bump();
                Expr::Template
            }
            TokenKind::Number => {
                self.bump();
                Expr::Number(tok.text)
            }
            TokenKind::Regex => {
                self.bump();
                Expr::Regex
            }
            TokenKind::Punct if tok.is("-") && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::Number) => {
                self.bump();
                let number = self.bump().map(|t| t.text).unwrap_or_default();
                Expr::Number(format!("-{}", number))
            }
            TokenKind::Punct if tok.is("{") => {
                self.bump();
                Expr::Object(self.parse_members(true))
            }
            TokenKind::Punct if tok.is("[") => self.parse_array(),
            TokenKind::Punct if tok.is("(") || tok.is("<") => self.parse_arrow_or_other(),
            TokenKind::Ident => match tok.text.as_str() {
                "true" | "false" => {
                    self.bump();
                    Expr::Bool(tok.text == "true")
                }
                "new" => self.parse_new(),
                "function" => {
                    self.bump();
                    if self.peek().is_some_and(|t| t.is_ident()) {
                        self.bump();
                    }
                    self.parse_function_tail()
                }
                "async" if self.peek_at(1).is_some_and(|t| t.is("(") || t.is("function") || t.is_ident()) => {
                    self.bump();
                    if self.eat("function") && self.peek().is_some_and(|t| t.is_ident()) {
                        self.bump();
                    }
                    self.parse_arrow_or_other()
                }
                _ if self.at_offset(1, "=>") => {
                    let param = self.bump().map(|t| vec![t]).unwrap_or_default();
                    self.bump(); // =>
                    self.skip_function_body();
                    let mut params = vec![Token::new(TokenKind::Punct, "(")];
                    params.extend(param);
                    params.push(Token::new(TokenKind::Punct, ")"));
                    Expr::Function { params, ret: None }
                }
                _ => Expr::Other,
            },
            _ => Expr::Other,
        }
    }

    fn parse_array(&mut self) -> Expr {
        self.bump(); // [
        let mut elements = Vec::new();
        while !self.at_eof() && !self.at("]") {
            if self.eat(",") {
                continue;
            }
            let start = self.pos;
            elements.push(self.parse_expr());
            if self.pos == start {
                self.bump();
            }
        }
        self.eat("]");
        Expr::Array(elements)
    }

    fn parse_new(&mut self) -> Expr {
        self.bump(); // new
        let mut callee = Vec::new();
        while let Some(tok) = self.peek() {
            let part = tok.is_ident() || tok.is(".") || (tok.is("<") && !callee.is_empty());
            if !part {
                break;
            }
            if tok.is("<") {
                // type arguments belong to the instance type
                let args = self.collect_angle();
                callee.extend(args);
                break;
            }
            callee.extend(self.bump());
        }
        if self.at("(") {
            self.skip_balanced();
        }
        Expr::New(callee)
    }

    fn collect_angle(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            let text = tok.text.clone();
            out.push(tok);
            match text.as_str() {
                "<" => depth += 1,
                ">" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn parse_arrow_or_other(&mut self) -> Expr {
        let start = self.pos;
        self.skip_type_params();
        if !self.at("(") {
            self.pos = start;
            return Expr::Other;
        }
        let params = self.skip_balanced();
        let ret = if self.at(":") {
            self.bump();
            Some(TypeNode::Written(self.collect_arrow_return()))
        } else {
            None
        };
        if self.eat("=>") {
            self.skip_function_body();
            return Expr::Function { params, ret };
        }
        if self.at("{") {
            // function expression body
            self.skip_balanced();
            return Expr::Function { params, ret };
        }
        // parenthesized expression
        self.pos = start;
        Expr::Other
    }

    /// Return annotation of an arrow function: up to `=>` or a body brace.
    fn collect_arrow_return(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0 && (tok.is("=>") || (tok.is("{") && !out.is_empty())) {
                break;
            }
            let Some(tok) = self.bump() else { break };
            match tok.text.as_str() {
                "<" | "(" | "[" | "{" => depth += 1,
                ">" | ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
            out.push(tok);
        }
        out
    }

    fn parse_function_tail(&mut self) -> Expr {
        self.skip_type_params();
        let params = if self.at("(") { self.skip_balanced() } else { Vec::new() };
        let ret = if self.eat(":") {
            Some(TypeNode::Written(self.collect_arrow_return()))
        } else {
            None
        };
        if self.at("{") {
            self.skip_balanced();
        }
        Expr::Function { params, ret }
    }

    fn skip_function_body(&mut self) {
        if self.at("{") {
            self.skip_balanced();
        } else {
            self.skip_expression();
        }
    }

    /// Skip the rest of an expression up to its terminator.
    fn skip_expression(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0
                && (tok.is(",") || tok.is(";") || tok.is(")") || tok.is("]") || tok.is("}"))
            {
                return;
            }
            let Some(tok) = self.bump() else { break };
            match tok.text.as_str() {
                "{" | "(" | "[" if tok.kind == TokenKind::Punct => depth += 1,
                "}" | ")" | "]" if tok.kind == TokenKind::Punct => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            if depth == 0 && self.asi_break() {
                return;
            }
        }
    }
}

fn continues_type(prev: Option<&Token>) -> bool {
    prev.is_some_and(|t| {
        t.is("|") || t.is("&") || t.is("=>") || t.is(":") || t.is("<") || t.is(",")
            || t.is("keyof") || t.is("typeof") || t.is("extends") || t.is("?")
    })
}

/// Annotation of the single parameter of a setter: `(v: T)` → `T`.
fn param_annotation(params: &[Token]) -> Option<TypeNode> {
    let colon = params.iter().position(|t| t.is(":"))?;
    let end = params.len().saturating_sub(1);
    if colon + 1 >= end {
        return None;
    }
    Some(TypeNode::Written(params[colon + 1..end].to_vec()))
}

/// Does a method body contain `return <value>`?
fn body_returns_value(body: &[Token]) -> bool {
    body.windows(2).any(|pair| {
        pair[0].is("return") && !pair[1].newline_before && !pair[1].is(";") && !pair[1].is("}")
    })
}

pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(q @ ('"' | '\'' | '`')) => {
            let inner = &text[q.len_utf8()..];
            inner.strip_suffix(q).unwrap_or(inner).to_string()
        }
        _ => text.to_string(),
    }
}
