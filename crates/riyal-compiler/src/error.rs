//! Compiler error types

use riyal_parser::ParseError;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug)]
pub enum CompileError {
    /// Syntax error from the parsing stage
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reference to a variable with no declaration in any enclosing scope
    #[error("Undeclared variable \"{0}\"")]
    UndeclaredVariable(String),

    /// Call to a function with no declaration in any enclosing scope
    #[error("Undeclared function \"{0}\"")]
    UndeclaredFunction(String),

    /// A second declaration of a variable in the same scope frame
    #[error("Variable \"{0}\" already declared")]
    VariableRedeclared(String),

    /// A second declaration of a function in the same scope frame
    #[error("Function \"{0}\" already declared")]
    FunctionRedeclared(String),

    /// Call-site argument count does not match the declared parameter count
    #[error("Function \"{name}\" expects {expected} args, got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
