//! Declaration-level Go parser
//!
//! Recovers just enough structure from a generated file to rewrite struct
//! tags: the package clause, bracket nesting, and every `type` spec whose
//! type is a struct, with byte spans for each direct field's type end and tag
//! literal. Statement and expression syntax is not checked.

use gotagger_core::{TaggerError, TaggerResult};

use crate::lexer::{Token, TokenKind, position_error, tokenize};

/// A parsed Go source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    /// Struct type declarations in source order, including those declared
    /// inside function bodies
    pub structs: Vec<StructDecl>,
}

/// `type Name struct { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub line: usize,
    /// Byte offsets of the body's `{` and `}`
    pub open: usize,
    pub close: usize,
    /// Direct fields only; fields of nested anonymous structs are part of
    /// their enclosing field's type
    pub fields: Vec<FieldDecl>,
}

/// One field declaration line: `A, B Type "tag"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Declared names; empty for an embedded field
    pub names: Vec<String>,
    /// Byte offset of the first name, or of the type when embedded
    pub start: usize,
    /// Byte offset just past the last name; equals `start` when embedded
    pub names_end: usize,
    pub type_start: usize,
    /// Byte offset just past the field type
    pub type_end: usize,
    pub tag: Option<TagLiteral>,
    pub line: usize,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// A field tag as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLiteral {
    pub start: usize,
    pub end: usize,
    /// Backquoted rather than double-quoted
    pub raw: bool,
    /// Literal content with quotes removed and escapes decoded; `None` when
    /// the escapes spell bytes that are not UTF-8
    pub value: Option<String>,
}

/// Parse a Go source file
pub fn parse_file(file_name: &str, source: &str) -> TaggerResult<SourceFile> {
    let tokens = tokenize(file_name, source)?;
    let parser = Parser {
        file_name,
        source,
        tokens: &tokens,
    };
    parser.check_brackets()?;
    let package = parser.package_clause()?;
    let structs = parser.struct_decls()?;
    Ok(SourceFile { package, structs })
}

struct Parser<'a> {
    file_name: &'a str,
    source: &'a str,
    tokens: &'a [Token],
}

impl Parser<'_> {
    fn token(&self, i: usize) -> &Token {
        // the stream always ends with Eof
        &self.tokens[i.min(self.tokens.len() - 1)]
    }

    fn text(&self, i: usize) -> &str {
        self.token(i).text(self.source)
    }

    fn error(&self, token: &Token, msg: &str) -> TaggerError {
        position_error(self.file_name, token.line, token.column, msg)
    }

    fn check_brackets(&self) -> TaggerResult<()> {
        let mut open: Vec<&Token> = Vec::new();
        for token in self.tokens.iter().filter(|t| t.kind == TokenKind::Punct) {
            let closer = match token.text(self.source) {
                "(" | "[" | "{" => {
                    open.push(token);
                    continue;
                }
                ")" => "(",
                "]" => "[",
                "}" => "{",
                _ => continue,
            };
            match open.pop() {
                Some(opener) if opener.text(self.source) == closer => {}
                _ => {
                    return Err(self.error(
                        token,
                        &format!("unexpected '{}'", token.text(self.source)),
                    ));
                }
            }
        }
        match open.pop() {
            Some(opener) => Err(self.error(
                opener,
                &format!("'{}' is never closed", opener.text(self.source)),
            )),
            None => Ok(()),
        }
    }

    fn package_clause(&self) -> TaggerResult<String> {
        if !self.token(0).is_ident(self.source, "package") {
            return Err(self.error(self.token(0), "expected 'package' clause"));
        }
        let name = self.token(1);
        if name.kind != TokenKind::Ident {
            return Err(self.error(name, "expected package name"));
        }
        if self.token(2).kind != TokenKind::Semicolon {
            return Err(self.error(self.token(2), "expected ';' after package clause"));
        }
        Ok(self.text(1).to_string())
    }

    fn struct_decls(&self) -> TaggerResult<Vec<StructDecl>> {
        let mut structs = Vec::new();
        let mut i = 3;
        while self.token(i).kind != TokenKind::Eof {
            if !self.token(i).is_ident(self.source, "type") {
                i += 1;
                continue;
            }
            let next = self.token(i + 1);
            if next.kind == TokenKind::Ident {
                i = self.type_spec(i + 1, &mut structs)?;
            } else if next.is_punct(self.source, "(") {
                i = self.type_group(i + 2, &mut structs)?;
            } else {
                // `x.(type)` in a type switch
                i += 1;
            }
        }
        Ok(structs)
    }

    /// Parse `( spec; spec; ... )` starting after the `(`
    fn type_group(&self, mut i: usize, structs: &mut Vec<StructDecl>) -> TaggerResult<usize> {
        loop {
            let token = self.token(i);
            match token.kind {
                TokenKind::Semicolon => i += 1,
                TokenKind::Punct if token.is_punct(self.source, ")") => return Ok(i + 1),
                TokenKind::Ident => i = self.type_spec(i, structs)?,
                _ => return Err(self.error(token, "expected type name")),
            }
        }
    }

    /// Parse one spec starting at its name; returns the index just past it
    fn type_spec(&self, i: usize, structs: &mut Vec<StructDecl>) -> TaggerResult<usize> {
        let name = self.token(i);
        let mut j = i + 1;
        if self.token(j).is_punct(self.source, "[") && self.is_type_parameter_list(j) {
            j = self.matching(j) + 1;
        }
        if self.token(j).is_punct(self.source, "=") {
            j += 1;
        }

        if self.token(j).is_ident(self.source, "struct")
            && self.token(j + 1).is_punct(self.source, "{")
        {
            let close = self.matching(j + 1);
            let fields = self.field_decls(j + 2, close)?;
            structs.push(StructDecl {
                name: name.text(self.source).to_string(),
                line: name.line,
                open: self.token(j + 1).start,
                close: self.token(close).start,
                fields,
            });
            return Ok(close + 1);
        }
        Ok(self.skip_type(j))
    }

    /// Whether `name[...]` opens type parameters rather than an array length
    fn is_type_parameter_list(&self, open: usize) -> bool {
        let first = self.token(open + 1);
        let second = self.token(open + 2);
        first.kind == TokenKind::Ident
            && (second.kind == TokenKind::Ident
                || second.is_punct(self.source, ",")
                || second.is_punct(self.source, "~")
                || (second.is_punct(self.source, "*")
                    && self.token(open + 3).kind == TokenKind::Ident))
    }

    /// Index of the bracket closing the one at `open`
    fn matching(&self, open: usize) -> usize {
        let mut depth = 0usize;
        let mut i = open;
        loop {
            let token = self.token(i);
            if token.kind == TokenKind::Eof {
                return i;
            }
            if token.kind == TokenKind::Punct {
                match token.text(self.source) {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return i;
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }
    }

    /// Skip a non-struct type up to the `;` or `)` ending its spec
    fn skip_type(&self, mut i: usize) -> usize {
        loop {
            let token = self.token(i);
            match token.kind {
                TokenKind::Eof | TokenKind::Semicolon => return i,
                TokenKind::Punct => match token.text(self.source) {
                    "(" | "[" | "{" => i = self.matching(i) + 1,
                    ")" => return i,
                    _ => i += 1,
                },
                _ => i += 1,
            }
        }
    }

    /// Field declarations between `start` and the closing brace at `close`
    fn field_decls(&self, start: usize, close: usize) -> TaggerResult<Vec<FieldDecl>> {
        let mut fields = Vec::new();
        let mut i = start;
        while i < close {
            if self.token(i).kind == TokenKind::Semicolon {
                i += 1;
                continue;
            }
            let decl_start = i;
            while i < close && self.token(i).kind != TokenKind::Semicolon {
                if self.token(i).kind == TokenKind::Punct
                    && matches!(self.text(i), "(" | "[" | "{")
                {
                    i = self.matching(i);
                }
                i += 1;
            }
            fields.push(self.field_decl(decl_start, i.min(close))?);
        }
        Ok(fields)
    }

    /// One field declaration spanning tokens `start..end`
    fn field_decl(&self, start: usize, end: usize) -> TaggerResult<FieldDecl> {
        let mut type_last = end - 1;
        let tag = match self.token(type_last) {
            token if token.is_string() && type_last > start => {
                type_last -= 1;
                Some(self.tag_literal(token)?)
            }
            _ => None,
        };

        let names = self.field_names(start, type_last);
        // names are separated by commas: `A , B , C Type`
        let type_first = match names.len() {
            0 => start,
            n => start + 2 * n - 1,
        };
        let names_end = match names.len() {
            0 => self.token(start).start,
            _ => self.token(type_first - 1).end,
        };
        Ok(FieldDecl {
            names,
            start: self.token(start).start,
            names_end,
            type_start: self.token(type_first).start,
            type_end: self.token(type_last).end,
            tag,
            line: self.token(start).line,
        })
    }

    /// Names of a field whose type tokens run from `start` to `type_last`
    fn field_names(&self, start: usize, type_last: usize) -> Vec<String> {
        let first = self.token(start);
        if first.kind != TokenKind::Ident || start == type_last {
            return Vec::new();
        }

        let second = self.token(start + 1);
        if second.is_punct(self.source, ".") {
            // pkg.Type
            return Vec::new();
        }
        if second.is_punct(self.source, "[") && self.matching(start + 1) == type_last {
            // Generic[Arg]
            return Vec::new();
        }

        let mut names = vec![first.text(self.source).to_string()];
        let mut i = start + 1;
        while self.token(i).is_punct(self.source, ",") && i < type_last {
            names.push(self.text(i + 1).to_string());
            i += 2;
        }
        names
    }

    fn tag_literal(&self, token: &Token) -> TaggerResult<TagLiteral> {
        let text = token.text(self.source);
        let inner = &text[1..text.len() - 1];
        let (raw, value) = match token.kind {
            TokenKind::RawString => (true, Some(inner.replace('\r', ""))),
            _ => {
                let bytes = unquote(inner)
                    .map_err(|msg| self.error(token, &format!("invalid tag: {msg}")))?;
                (false, String::from_utf8(bytes).ok())
            }
        };
        Ok(TagLiteral {
            start: token.start,
            end: token.end,
            raw,
            value,
        })
    }
}

/// Decode the escapes of an interpreted string body
///
/// `\x` and octal escapes name single bytes, so the result need not be
/// UTF-8.
pub(crate) fn unquote(body: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let escape = chars.next().ok_or("unterminated escape sequence")?;
        let simple = match escape {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            continue;
        }

        match escape {
            'x' => bytes.push(numeric(&mut chars, 2, 16, escape)? as u8),
            '0'..='7' => {
                let rest = numeric(&mut chars, 2, 8, escape)?;
                let value = escape.to_digit(8).unwrap_or_default() * 64 + rest;
                let byte = u8::try_from(value).map_err(|_| "octal escape out of range")?;
                bytes.push(byte);
            }
            'u' | 'U' => {
                let count = if escape == 'u' { 4 } else { 8 };
                let value = numeric(&mut chars, count, 16, escape)?;
                let c = char::from_u32(value).ok_or(format!("invalid code point {value:#x}"))?;
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            other => return Err(format!("unknown escape sequence '\\{other}'")),
        }
    }

    Ok(bytes)
}

fn numeric(
    chars: &mut std::str::Chars<'_>,
    count: usize,
    radix: u32,
    escape: char,
) -> Result<u32, String> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or(format!("malformed '\\{escape}' escape"))?;
        value = value * radix + digit;
    }
    Ok(value)
}

#[cfg(test)]
#[path = "parser/parser_tests.rs"]
mod parser_tests;
