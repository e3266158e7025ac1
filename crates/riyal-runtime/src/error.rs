//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Reference to a variable the environment does not hold
    #[error("Undeclared variable \"{0}\"")]
    UndeclaredVariable(String),

    /// Assignment to a variable that was never declared
    #[error("Assignment to undeclared variable \"{0}\"")]
    AssignmentToUndeclared(String),

    /// Factorial of a negative number
    #[error("Factorial of negative number {0}")]
    NegativeFactorial(f64),

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// An operator applied to values it does not support
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A node kind the minimal evaluator does not execute
    #[error("Unsupported node in run mode: {0}")]
    UnsupportedNode(String),

    /// A market call that was not resolved before evaluation
    #[error("Unresolved market call: market.{function}(\"{symbol}\")")]
    UnresolvedMarketCall { function: String, symbol: String },

    /// A name outside the market function table
    #[error("Unknown market function \"{0}\"")]
    UnknownMarketFunction(String),

    /// Market data fetch or conversion failure
    #[error("Market data error: {0}")]
    MarketData(String),

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization failure while converting quote data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
