//! Struct tag literals: parsing, merging and serialization
//!
//! A tag literal is the content of a Go struct tag, for example
//! `json:"name,omitempty" bson:"-"`. Every `namespace:"value,opt,..."` token
//! becomes an [`AnnotationEntry`]; an [`AnnotationSet`] keeps the entries in
//! order and unique by namespace.
//!
//! # Examples
//!
//! ```
//! use gotagger_core::AnnotationSet;
//!
//! let existing = AnnotationSet::parse(r#"json:"id""#).unwrap();
//! let computed = AnnotationSet::parse(r#"json:"uid,omitempty" db:"user_id""#).unwrap();
//!
//! let merged = existing.merge(&computed);
//!
//! assert_eq!(merged.to_string(), r#"json:"id,omitempty" db:"user_id""#);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TaggerError, TaggerResult};

/// A single `namespace:"value,options..."` tag entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEntry {
    namespace: String,
    value: String,
    options: Vec<String>,
}

impl AnnotationEntry {
    /// Create an entry with no options
    pub fn new(namespace: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            value: value.into(),
            options: Vec::new(),
        }
    }

    /// Add an option, ignoring duplicates
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.push_option(option.into());
        self
    }

    /// Build an entry from the unquoted content of a tag value
    fn from_content(namespace: &str, content: &str) -> Self {
        let mut parts = content.split(',');
        let value = parts.next().unwrap_or_default();
        let mut entry = Self::new(namespace, value);
        for option in parts {
            entry.push_option(option.to_string());
        }
        entry
    }

    fn push_option(&mut self, option: String) {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Fill an empty value or an empty option list from `fallback`
    fn backfill(&mut self, fallback: &AnnotationEntry) {
        if self.value.is_empty() {
            self.value = fallback.value.clone();
        }
        if self.options.is_empty() {
            self.options = fallback.options.clone();
        }
    }

    /// The unquoted tag value: primary value followed by the options
    fn content(&self) -> String {
        let mut content = self.value.clone();
        for option in &self.options {
            content.push(',');
            content.push_str(option);
        }
        content
    }
}

impl fmt::Display for AnnotationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"{}\"", self.namespace, quote_value(&self.content()))
    }
}

/// Ordered set of tag entries, unique by namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    entries: Vec<AnnotationEntry>,
}

impl AnnotationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw tag literal
    ///
    /// Empty or whitespace-only input yields an empty set. As with Go's
    /// `reflect.StructTag`, an entry may follow the closing quote of the
    /// previous one directly. Fails on any token that is not
    /// `namespace:"..."` and on repeated namespaces.
    pub fn parse(raw: &str) -> TaggerResult<Self> {
        let mut parser = TagParser { raw, pos: 0 };
        let mut set = Self::new();

        loop {
            parser.skip_whitespace();
            if parser.at_end() {
                return Ok(set);
            }

            let start = parser.pos;
            let namespace = parser.namespace().map_err(|r| parse_error(raw, start, &r))?;
            let content = parser.quoted().map_err(|r| parse_error(raw, parser.pos, &r))?;

            if set.contains(namespace) {
                return Err(parse_error(
                    raw,
                    start,
                    &format!("duplicate namespace '{namespace}'"),
                ));
            }
            set.entries
                .push(AnnotationEntry::from_content(namespace, &content));
        }
    }

    /// Insert or replace the entry for its namespace
    ///
    /// A replaced entry keeps its position. Returns the previous entry.
    pub fn set(&mut self, entry: AnnotationEntry) -> Option<AnnotationEntry> {
        match self
            .entries
            .iter_mut()
            .find(|e| e.namespace == entry.namespace)
        {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, namespace: &str) -> Option<&AnnotationEntry> {
        self.entries.iter().find(|e| e.namespace == namespace)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.get(namespace).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `fallback` into this set, this set being authoritative
    ///
    /// For a namespace present in both, this set's value and options win;
    /// only an empty value or an empty option list is filled from
    /// `fallback`. Namespaces only present in `fallback` are appended after
    /// all of this set's entries, in `fallback` order.
    pub fn merge(&self, fallback: &AnnotationSet) -> AnnotationSet {
        let mut merged = self.clone();
        for entry in &fallback.entries {
            match merged
                .entries
                .iter_mut()
                .find(|e| e.namespace == entry.namespace)
            {
                Some(existing) => existing.backfill(entry),
                None => merged.entries.push(entry.clone()),
            }
        }
        merged
    }
}

impl fmt::Display for AnnotationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl FromStr for AnnotationSet {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromIterator<AnnotationEntry> for AnnotationSet {
    /// Later entries replace earlier ones with the same namespace
    fn from_iter<I: IntoIterator<Item = AnnotationEntry>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.set(entry);
        }
        set
    }
}

impl Serialize for AnnotationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnnotationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|e| serde::de::Error::custom(e.message().to_string()))
    }
}

fn parse_error(raw: &str, offset: usize, reason: &str) -> TaggerError {
    TaggerError::AnnotationParseError(format!(
        "malformed tag `{raw}` at offset {offset}: {reason}"
    ))
}

/// Quote a tag value the way Go's `%q` verb would, minus the surrounding quotes
fn quote_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

struct TagParser<'a> {
    raw: &'a str,
    pos: usize,
}

impl<'a> TagParser<'a> {
    fn peek(&self) -> Option<char> {
        self.raw[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.raw.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Read a namespace and consume the colon that follows it
    fn namespace(&mut self) -> Result<&'a str, String> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(':') => break,
                Some(c) if c == '"' || c.is_whitespace() || c.is_control() => {
                    return Err(format!("invalid character {c:?} in namespace"));
                }
                Some(_) => {
                    self.bump();
                }
                None => break,
            }
        }

        let namespace = &self.raw[start..self.pos];
        if namespace.is_empty() {
            return Err("empty namespace".to_string());
        }
        if self.bump() != Some(':') {
            return Err(format!("namespace '{namespace}' is missing a colon"));
        }
        Ok(namespace)
    }

    /// Read a double-quoted Go string and return its unescaped content
    fn quoted(&mut self) -> Result<String, String> {
        if self.bump() != Some('"') {
            return Err("missing opening quote".to_string());
        }

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err("unterminated value".to_string()),
                Some('"') => return Ok(out),
                Some('\n') => return Err("newline in value".to_string()),
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, String> {
        let c = self.bump().ok_or("unterminated escape sequence")?;
        let decoded = match c {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            '\\' | '"' | '\'' => c,
            'x' => self.byte_escape(2, 16)?,
            '0'..='7' => {
                self.pos -= 1;
                self.byte_escape(3, 8)?
            }
            'u' => self.unicode_escape(4)?,
            'U' => self.unicode_escape(8)?,
            other => return Err(format!("invalid escape sequence '\\{other}'")),
        };
        Ok(decoded)
    }

    fn digits(&mut self, count: usize, radix: u32) -> Result<u32, String> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(radix))
                .ok_or("malformed numeric escape")?;
            value = value * radix + digit;
        }
        Ok(value)
    }

    /// `\xHH` and `\NNN` denote single bytes; only ASCII survives as text
    fn byte_escape(&mut self, count: usize, radix: u32) -> Result<char, String> {
        let value = self.digits(count, radix)?;
        if value >= 0x80 {
            return Err(format!("byte escape {value:#04x} is not valid UTF-8"));
        }
        char::from_u32(value).ok_or_else(|| "malformed numeric escape".to_string())
    }

    fn unicode_escape(&mut self, count: usize) -> Result<char, String> {
        let value = self.digits(count, 16)?;
        char::from_u32(value).ok_or_else(|| format!("invalid code point {value:#x}"))
    }
}
