//! RiyalScript Compiler - semantic analysis, optimization and code generation
//!
//! The stages compose left to right over the AST from `riyal-parser`:
//! analyze (scope/arity checks + type inference) → optimize (constant
//! folding) → generate (JavaScript text).

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod optimizer;
pub mod semantic;

// Re-export main types
pub use codegen::CodeGenerator;
pub use compiler::{Compiler, CompilerOptions};
pub use error::{CompileError, Result};
pub use optimizer::ConstantFolder;
pub use semantic::{AnalysisPolicy, SemanticAnalyzer};
