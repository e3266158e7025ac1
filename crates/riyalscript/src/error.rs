//! Pipeline error type

use riyal_compiler::CompileError;
use riyal_parser::ParseError;
use riyal_runtime::RuntimeError;
use thiserror::Error;

/// Any failure the pipeline can surface
#[derive(Error, Debug)]
pub enum Error {
    /// Syntax error from the parser
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Semantic error from analysis
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Evaluation or market-data error from `run` mode
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A mode string outside the supported set
    #[error("Unknown output type \"{0}\"")]
    UnknownOutputType(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
