//! Semantic analysis module
//!
//! Scope resolution, arity checking and type inference over the parsed AST.

pub mod analyzer;
pub mod scope;

// Re-export for convenience
pub use analyzer::{AnalysisPolicy, SemanticAnalyzer};
pub use scope::ScopeStack;
