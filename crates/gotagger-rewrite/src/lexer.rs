//! Go tokenizer
//!
//! Produces the token stream the declaration parser works on. Comments are
//! dropped, and semicolons are inserted at line ends following the Go
//! grammar's rule, so struct field lists come out `;`-terminated just as
//! the compiler sees them.

use gotagger_core::{TaggerError, TaggerResult};

/// Token classes the parser distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Ident,
    Number,
    Rune,
    /// Interpreted string literal `"..."`
    String,
    /// Raw string literal `` `...` ``
    RawString,
    /// Operator or delimiter other than `;`
    Punct,
    /// Explicit `;` or one inserted at a line end
    Semicolon,
    Eof,
}

/// A token and where it sits in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first byte
    pub start: usize,
    /// Byte offset one past the last byte; equals `start` for inserted
    /// semicolons and end of input
    pub end: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based byte column
    pub column: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn is_punct(&self, source: &str, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text(source) == punct
    }

    pub fn is_ident(&self, source: &str, ident: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == ident
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::RawString)
    }
}

const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Keywords after which a line end terminates the statement
const TERMINATING_KEYWORDS: [&str; 4] = ["break", "continue", "fallthrough", "return"];

/// Operators, longest first so the first prefix match is the longest
const OPERATORS: [&str; 47] = [
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&",
    "|", "^", "<", ">", "=", "!", "~", "(", ")", "[", "]", "{", "}", ",", ".", ":",
];

/// Tokenize a Go source file
///
/// The returned stream always ends with a [`TokenKind::Eof`] token.
pub fn tokenize(file_name: &str, source: &str) -> TaggerResult<Vec<Token>> {
    Lexer::new(file_name, source).run()
}

/// Error message carrying the `file:line:column` position
pub(crate) fn position_error(file_name: &str, line: usize, column: usize, msg: &str) -> TaggerError {
    TaggerError::TargetParseError(format!("{file_name}:{line}:{column}: {msg}"))
}

struct Lexer<'a> {
    file_name: &'a str,
    source: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(file_name: &'a str, source: &'a str) -> Self {
        let pos = if source.starts_with('\u{feff}') { 3 } else { 0 };
        Self {
            file_name,
            source,
            pos,
            line: 1,
            line_start: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> TaggerResult<Vec<Token>> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                '\n' => {
                    self.insert_semicolon();
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => {
                    self.insert_semicolon();
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '/' if self.peek_at(1) == Some('*') => self.block_comment(start)?,
                '"' => self.interpreted_string(start)?,
                '`' => self.raw_string(start)?,
                '\'' => self.rune(start)?,
                ';' => {
                    self.bump();
                    self.push(TokenKind::Semicolon, start);
                }
                c if c.is_ascii_digit() => self.number(start),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number(start),
                c if c == '_' || c.is_alphabetic() => {
                    while self
                        .peek()
                        .is_some_and(|c| c == '_' || c.is_alphanumeric())
                    {
                        self.bump();
                    }
                    self.push(TokenKind::Ident, start);
                }
                c => {
                    let rest = &self.source[self.pos..];
                    let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
                        return Err(self.error_at(start, &format!("invalid character {c:?}")));
                    };
                    self.pos += op.len();
                    self.push(TokenKind::Punct, start);
                }
            }
        }

        self.insert_semicolon();
        let eof = self.pos;
        self.push(TokenKind::Eof, eof);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn column_of(&self, offset: usize) -> usize {
        offset.saturating_sub(self.line_start) + 1
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let (line, column) = self.position_of(start);
        self.tokens.push(Token {
            kind,
            start,
            end: self.pos,
            line,
            column,
        });
    }

    /// Line and column of an offset at or after the current line start, or
    /// on an earlier line for tokens spanning newlines
    fn position_of(&self, offset: usize) -> (usize, usize) {
        if offset >= self.line_start {
            return (self.line, self.column_of(offset));
        }
        let before = &self.source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, offset - line_start + 1)
    }

    fn error_at(&self, offset: usize, msg: &str) -> TaggerError {
        let (line, column) = self.position_of(offset);
        position_error(self.file_name, line, column, msg)
    }

    /// Insert a `;` if the last token allows the statement to end here
    ///
    /// A token that did not end a statement at its own line end never does
    /// later, so only the last token needs checking.
    fn insert_semicolon(&mut self) {
        let Some(last) = self.tokens.last() else {
            return;
        };

        let text = last.text(self.source);
        let terminates = match last.kind {
            TokenKind::Ident => {
                !KEYWORDS.contains(&text) || TERMINATING_KEYWORDS.contains(&text)
            }
            TokenKind::Number | TokenKind::Rune | TokenKind::String | TokenKind::RawString => true,
            TokenKind::Punct => matches!(text, ")" | "]" | "}" | "++" | "--"),
            TokenKind::Semicolon | TokenKind::Eof => false,
        };
        if terminates {
            let at = self.pos;
            self.tokens.push(Token {
                kind: TokenKind::Semicolon,
                start: at,
                end: at,
                line: self.line,
                column: self.column_of(at),
            });
        }
    }

    fn block_comment(&mut self, start: usize) -> TaggerResult<()> {
        self.bump();
        self.bump();
        let mut spans_lines = false;
        loop {
            match self.peek() {
                None => return Err(self.error_at(start, "comment not terminated")),
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    break;
                }
                Some('\n') => {
                    if !spans_lines {
                        // a multi-line comment acts like a newline
                        self.insert_semicolon();
                        spans_lines = true;
                    }
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        Ok(())
    }

    fn interpreted_string(&mut self, start: usize) -> TaggerResult<()> {
        self.bump();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, "string literal not terminated")),
                Some('\n') => return Err(self.error_at(start, "newline in string literal")),
                Some('\\') => {
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('"') => break,
                Some(_) => {}
            }
        }
        self.push(TokenKind::String, start);
        Ok(())
    }

    fn raw_string(&mut self, start: usize) -> TaggerResult<()> {
        self.bump();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, "raw string literal not terminated")),
                Some('`') => break,
                Some(_) => {}
            }
        }
        self.push(TokenKind::RawString, start);
        Ok(())
    }

    fn rune(&mut self, start: usize) -> TaggerResult<()> {
        self.bump();
        let mut empty = true;
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error_at(start, "rune literal not terminated")),
                Some('\\') => {
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('\'') if empty => return Err(self.error_at(start, "empty rune literal")),
                Some('\'') => break,
                Some(_) => {}
            }
            empty = false;
        }
        self.push(TokenKind::Rune, start);
        Ok(())
    }

    fn number(&mut self, start: usize) {
        let rest = &self.source[start..];
        let hex = rest.starts_with("0x") || rest.starts_with("0X");
        let exponent: &[char] = if hex { &['p', 'P'] } else { &['e', 'E', 'p', 'P'] };

        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let accept = c == '_'
                || c == '.'
                || c.is_ascii_alphanumeric()
                || ((c == '+' || c == '-') && exponent.contains(&prev));
            if !accept {
                break;
            }
            prev = c;
            self.bump();
        }
        self.push(TokenKind::Number, start);
    }
}
