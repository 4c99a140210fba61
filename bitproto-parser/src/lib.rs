//! A nom-based parser for `.bitproto` schema files.
//!
//! This crate is deliberately thin: it turns source text into a borrowed
//! [`ast::ProtoFile`] and nothing more. Name resolution, constant folding,
//! bit-size computation and every other semantic concern live one layer up,
//! in the `bitproto` crate.

pub mod ast;
pub mod lexer;
mod parser;

pub use lexer::Span;

use ast::ProtoFile;

/// A parse error: the byte offset and (line, column) nom stopped at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: u32,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error at line {}, column {}", self.line, self.column)
    }
}

impl std::error::Error for ParseError {}

/// Parses one `.bitproto` source file into a syntax tree.
pub fn parse(source: &str) -> Result<ProtoFile<'_>, ParseError> {
    let span = Span::new(source);
    match parser::parse(span) {
        Ok((remainder, file)) => {
            if !remainder.fragment().trim().is_empty() {
                return Err(ParseError {
                    line: remainder.location_line(),
                    column: remainder.get_utf8_column(),
                });
            }
            Ok(file)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError {
            line: e.input.location_line(),
            column: e.input.get_utf8_column(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError { line: 1, column: 1 }),
    }
}
