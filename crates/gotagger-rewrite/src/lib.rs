//! gotagger-rewrite - Struct tag rewriting for generated Go files
//!
//! This crate provides:
//! - [`tokenize`], a Go lexer with automatic semicolon insertion
//! - [`parse_file`], a declaration-level parser finding struct types
//! - [`rewrite`] and [`rewrite_source`], which splice computed tags into
//!   the source text and re-align the edited struct bodies

mod align;
mod lexer;
mod parser;
mod rewriter;

pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{FieldDecl, SourceFile, StructDecl, TagLiteral, parse_file};
pub use rewriter::{rewrite, rewrite_source, tag_literal};
