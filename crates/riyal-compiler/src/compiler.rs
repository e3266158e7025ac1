//! Main compiler
//!
//! Bundles the analysis, optimization and code-generation stages behind
//! one configurable interface.

use crate::codegen::CodeGenerator;
use crate::error::Result;
use crate::optimizer::ConstantFolder;
use crate::semantic::{AnalysisPolicy, SemanticAnalyzer};
use riyal_core::Program;

/// Compiler options
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Analysis policy (strict scope/arity checks vs permissive)
    pub policy: AnalysisPolicy,
    /// Enable constant folding optimization
    pub enable_constant_folding: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            policy: AnalysisPolicy::Strict,
            enable_constant_folding: true,
        }
    }
}

/// The RiyalScript compiler
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    /// Create a compiler with default options
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    /// Create a compiler with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// The options this compiler was built with
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Run semantic analysis over a parsed program
    pub fn analyze(&self, program: &Program) -> Result<Program> {
        SemanticAnalyzer::with_policy(self.options.policy).analyze(program)
    }

    /// Run the optimizer; a no-op clone when constant folding is disabled
    pub fn optimize(&self, program: &Program) -> Program {
        if !self.options.enable_constant_folding {
            return program.clone();
        }
        log::debug!("constant folding pass");
        ConstantFolder::new().fold_program(program)
    }

    /// Render a program as JavaScript source text
    pub fn generate(&self, program: &Program) -> String {
        CodeGenerator::new().generate(program)
    }

    /// Full pipeline: source text to JavaScript source text
    pub fn compile_to_js(&self, source: &str) -> Result<String> {
        let program = riyal_parser::parse(source)?;
        let analyzed = self.analyze(&program)?;
        let optimized = self.optimize(&analyzed);
        Ok(self.generate(&optimized))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
