//! Tokenizer for TypeScript declaration scanning.
//!
//! Produces a flat token list; whitespace and ordinary comments are dropped.
//! Each token records whether a line break preceded it (for automatic
//! semicolon insertion) and carries the body of the closest preceding
//! `/** ... */` comment.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    /// Quoted string, quotes included.
    Str,
    /// Template string, backticks included.
    Template,
    Number,
    Regex,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub newline_before: bool,
    /// Body of the JSDoc comment right before this token, without `/**` `*/`.
    pub doc: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            newline_before: false,
            doc: None,
        }
    }

    /// True for an identifier or punctuator with exactly this text.
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Punct) && self.text == text
    }

    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }
}

const PUNCT3: &[&str] = &["...", "===", "!=="];
const PUNCT2: &[&str] = &[
    "=>", "==", "!=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "**",
];

/// Identifiers after which a `/` starts a regular expression.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "in", "of", "new", "delete", "void", "throw", "instanceof",
    "yield", "await",
];

pub fn tokenize(source: &str) -> Vec<Token> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
        tokens: Vec::new(),
        newline: false,
        doc: None,
    };
    lexer.run();
    lexer.tokens
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    newline: bool,
    doc: Option<String>,
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

impl Lexer {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end.min(self.chars.len())].iter().collect()
    }

    fn push(&mut self, kind: TokenKind, text: String) {
        self.tokens.push(Token {
            kind,
            text,
            newline_before: std::mem::take(&mut self.newline),
            doc: self.doc.take(),
        });
    }

    fn run(&mut self) {
        // shebang
        if self.peek(0) == Some('#') && self.peek(1) == Some('!') {
            self.skip_line_comment();
        }

        while let Some(c) = self.peek(0) {
            match c {
                '\n' => {
                    self.newline = true;
                    self.pos += 1;
                }
                c if c.is_whitespace() => self.pos += 1,
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment(),
                '"' | '\'' => self.string(c),
                '`' => self.template(),
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek(1).is_some_and(|d| d.is_ascii_digit()) => self.number(),
                c if is_ident_start(c) => self.ident(),
                '#' if self.peek(1).is_some_and(is_ident_start) => self.ident(),
                '/' if self.regex_allowed() => self.regex_or_punct(),
                _ => self.punct(),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) {
        let start = self.pos + 2;
        let mut end = start;
        while end < self.chars.len() {
            if self.chars[end] == '*' && self.chars.get(end + 1) == Some(&'/') {
                break;
            }
            end += 1;
        }
        let body = self.slice(start, end);
        if body.contains('\n') {
            self.newline = true;
        }
        // `/**/` and `/***/` are not doc comments
        if let Some(doc) = body.strip_prefix('*') {
            if !doc.is_empty() && doc != "*" {
                self.doc = Some(doc.to_string());
            }
        }
        self.pos = (end + 2).min(self.chars.len());
    }

    fn string(&mut self, quote: char) {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            match c {
                '\\' => self.pos += 2,
                '\n' => break,
                c if c == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        let text = self.slice(start, self.pos);
        self.push(TokenKind::Str, text);
    }

    fn template(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let mut depth = 0usize;
        while let Some(c) = self.peek(0) {
            match c {
                '\\' => self.pos += 2,
                '`' if depth == 0 => {
                    self.pos += 1;
                    break;
                }
                '$' if self.peek(1) == Some('{') => {
                    depth += 1;
                    self.pos += 2;
                }
                '{' if depth > 0 => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        let text = self.slice(start, self.pos);
        self.push(TokenKind::Template, text);
    }

    fn number(&mut self) {
        let start = self.pos;
        let hex = self.peek(0) == Some('0') && matches!(self.peek(1), Some('x' | 'X'));
        while let Some(c) = self.peek(0) {
            let exponent_sign = (c == '+' || c == '-')
                && !hex
                && matches!(self.chars.get(self.pos.wrapping_sub(1)), Some('e' | 'E'));
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.slice(start, self.pos);
        self.push(TokenKind::Number, text);
    }

    fn ident(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while self.peek(0).is_some_and(is_ident_part) {
            self.pos += 1;
        }
        let text = self.slice(start, self.pos);
        self.push(TokenKind::Ident, text);
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(t) => match t.kind {
                TokenKind::Punct => !matches!(t.text.as_str(), ")" | "]" | "}"),
                TokenKind::Ident => REGEX_PRECEDING_KEYWORDS.contains(&t.text.as_str()),
                _ => false,
            },
        }
    }

    fn regex_or_punct(&mut self) {
        let start = self.pos;
        let mut end = self.pos + 1;
        let mut in_class = false;
        let mut closed = false;
        while end < self.chars.len() {
            match self.chars[end] {
                '\\' => end += 1,
                '\n' => break,
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    closed = true;
                    break;
                }
                _ => {}
            }
            end += 1;
        }
        if !closed {
            self.punct();
            return;
        }
        self.pos = end + 1;
        while self.peek(0).is_some_and(is_ident_part) {
            self.pos += 1;
        }
        let text = self.slice(start, self.pos);
        self.push(TokenKind::Regex, text);
    }

    fn punct(&mut self) {
        for group in [PUNCT3, PUNCT2] {
            for p in group {
                let len = p.chars().count();
                if self.slice(self.pos, self.pos + len) == *p {
                    // `x ? .5 : 1` is not optional chaining
                    if *p == "?." && self.peek(2).is_some_and(|c| c.is_ascii_digit()) {
                        continue;
                    }
                    self.pos += len;
                    self.push(TokenKind::Punct, p.to_string());
                    return;
                }
            }
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        self.push(TokenKind::Punct, c.to_string());
    }
}
