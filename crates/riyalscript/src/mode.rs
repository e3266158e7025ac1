//! Output-stage selection and return shapes

use crate::error::Error;
use riyal_core::Program;
use riyal_runtime::Environment;
use std::fmt;
use std::str::FromStr;

/// Where to stop the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Syntax check only
    Parsed,
    /// Stop after semantic analysis, returning the typed AST
    Analyzed,
    /// Stop after constant folding, returning the optimized AST
    Optimized,
    /// Generate JavaScript source text
    Js,
    /// Evaluate the analyzed program and return its environment
    Run,
}

impl OutputMode {
    /// The mode string as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Parsed => "parsed",
            OutputMode::Analyzed => "analyzed",
            OutputMode::Optimized => "optimized",
            OutputMode::Js => "js",
            OutputMode::Run => "run",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parsed" => Ok(OutputMode::Parsed),
            "analyzed" => Ok(OutputMode::Analyzed),
            "optimized" => Ok(OutputMode::Optimized),
            "js" => Ok(OutputMode::Js),
            "run" => Ok(OutputMode::Run),
            other => Err(Error::UnknownOutputType(other.to_string())),
        }
    }
}

/// What the pipeline hands back, by mode
#[derive(Debug, Clone)]
pub enum CompileOutput {
    /// The `parsed` success sentinel
    Parsed(String),
    /// The AST from `analyzed` or `optimized` mode
    Ast(Program),
    /// The final environment from `run` mode
    Environment(Environment),
    /// Generated JavaScript from `js` mode
    Js(String),
}
