//! RiyalScript Parser - source text to AST
//!
//! This crate turns RiyalScript source text into the untyped AST defined
//! in `riyal-core`. It either fully succeeds or fails with a `ParseError`
//! carrying line/column diagnostics; it never partially succeeds.

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use riyal_core::Program;

/// Parse RiyalScript source text into a program AST
pub fn parse(source: &str) -> Result<Program> {
    log::debug!("parsing {} bytes of source", source.len());
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}
