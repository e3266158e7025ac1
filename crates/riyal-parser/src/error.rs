//! Parser error types

use thiserror::Error;

/// Parser error
///
/// Every variant carries the line and column of the failure point so the
/// CLI can render a useful diagnostic.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A character the lexer does not recognize
    #[error("Syntax error at line {line}, column {column}: unexpected character '{found}'")]
    UnexpectedCharacter {
        found: char,
        line: usize,
        column: usize,
    },

    /// A string literal with no closing delimiter
    #[error("Syntax error at line {line}, column {column}: unterminated string literal")]
    UnterminatedString { line: usize, column: usize },

    /// A malformed number literal (e.g. a dangling exponent)
    #[error("Syntax error at line {line}, column {column}: invalid number literal '{literal}'")]
    InvalidNumber {
        literal: String,
        line: usize,
        column: usize,
    },

    /// The parser expected one construct and found another
    #[error("Syntax error at line {line}, column {column}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
