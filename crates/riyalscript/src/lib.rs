//! RiyalScript - a small finance-oriented scripting language
//!
//! This crate is the entry point over the whole pipeline: parse →
//! analyze → (run | optimize → generate). Consumers pick an output stage
//! with [`OutputMode`] and get the matching [`CompileOutput`] back.
//!
//! ```
//! use riyalscript::{compile, CompileOutput, OutputMode};
//!
//! let output = compile("let x = 5 + 3 * 2", OutputMode::Js).unwrap();
//! assert!(matches!(output, CompileOutput::Js(js) if js == "let x = 11;"));
//! ```

pub mod error;
pub mod mode;

pub use error::{Error, Result};
pub use mode::{CompileOutput, OutputMode};

// Re-export the layer crates' main types
pub use riyal_compiler::{AnalysisPolicy, CodeGenerator, Compiler, CompilerOptions, ConstantFolder, SemanticAnalyzer};
pub use riyal_core::{Expression, ExpressionKind, Program, Statement, Value, ValueType};
pub use riyal_runtime::{resolve_market_calls, Environment, Interpreter, MarketFunctions, MarketProvider};

/// The success sentinel returned for `parsed` mode
pub const SYNTAX_OK: &str = "Syntax is ok";

/// Compile source text to the requested output stage with default options
pub fn compile(source: &str, mode: OutputMode) -> Result<CompileOutput> {
    compile_with_options(source, mode, &CompilerOptions::default())
}

/// Compile source text to the requested output stage
///
/// Parsing always happens; later stages run only as far as `mode` asks.
/// `Run` mode hands the analyzed tree to the evaluator without optimizing;
/// market calls are not resolved on this path (see
/// [`compile_and_run`] for the market-aware variant).
pub fn compile_with_options(
    source: &str,
    mode: OutputMode,
    options: &CompilerOptions,
) -> Result<CompileOutput> {
    log::debug!("compile, mode = {}", mode);
    let program = riyal_parser::parse(source)?;
    if mode == OutputMode::Parsed {
        return Ok(CompileOutput::Parsed(SYNTAX_OK.to_string()));
    }

    let compiler = Compiler::with_options(options.clone());
    let analyzed = compiler.analyze(&program)?;
    if mode == OutputMode::Analyzed {
        return Ok(CompileOutput::Ast(analyzed));
    }

    if mode == OutputMode::Run {
        let env = riyal_runtime::interpreter::run(&analyzed)?;
        return Ok(CompileOutput::Environment(env));
    }

    let optimized = compiler.optimize(&analyzed);
    if mode == OutputMode::Optimized {
        return Ok(CompileOutput::Ast(optimized));
    }

    Ok(CompileOutput::Js(compiler.generate(&optimized)))
}

/// Compile and evaluate a program, resolving market calls through the
/// given provider first. This is `Run` mode for programs that talk to the
/// market-data collaborator.
pub async fn compile_and_run(
    source: &str,
    provider: Option<&dyn MarketProvider>,
) -> Result<Environment> {
    let program = riyal_parser::parse(source)?;
    let analyzed = Compiler::new().analyze(&program)?;

    let resolved = match provider {
        Some(provider) => resolve_market_calls(&analyzed, provider).await?,
        None => analyzed,
    };

    Ok(riyal_runtime::interpreter::run(&resolved)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_mode_returns_sentinel() {
        let output = compile("let x = 5", OutputMode::Parsed).unwrap();
        assert!(matches!(output, CompileOutput::Parsed(s) if s == SYNTAX_OK));
    }

    #[test]
    fn test_analyzed_mode_returns_typed_ast() {
        let output = compile("let x = 5", OutputMode::Analyzed).unwrap();
        match output {
            CompileOutput::Ast(program) => match &program.statements[0] {
                Statement::VariableDeclaration { initializer, .. } => {
                    assert_eq!(initializer.inferred_type, Some(ValueType::Number));
                }
                other => panic!("Expected VariableDeclaration, got {:?}", other),
            },
            other => panic!("Expected Ast output, got {:?}", other),
        }
    }

    #[test]
    fn test_optimized_mode_returns_folded_ast() {
        let output = compile("let x = 5 + 3 * 2", OutputMode::Optimized).unwrap();
        match output {
            CompileOutput::Ast(program) => match &program.statements[0] {
                Statement::VariableDeclaration { initializer, .. } => {
                    assert_eq!(
                        initializer.kind,
                        ExpressionKind::NumberLiteral { value: 11.0 }
                    );
                }
                other => panic!("Expected VariableDeclaration, got {:?}", other),
            },
            other => panic!("Expected Ast output, got {:?}", other),
        }
    }

    #[test]
    fn test_js_mode_returns_generated_text() {
        let output = compile("let x = 2 ** 3", OutputMode::Js).unwrap();
        assert!(matches!(output, CompileOutput::Js(js) if js == "let x = 8;"));
    }

    #[test]
    fn test_run_mode_returns_environment() {
        let output = compile("let a = 5 let b = 10 let c = a + b", OutputMode::Run).unwrap();
        match output {
            CompileOutput::Environment(env) => {
                assert_eq!(env.get("c"), Some(&Value::Number(15.0)));
            }
            other => panic!("Expected Environment output, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_stops_every_mode() {
        for mode in [
            OutputMode::Parsed,
            OutputMode::Analyzed,
            OutputMode::Optimized,
            OutputMode::Js,
            OutputMode::Run,
        ] {
            assert!(compile("let x =", mode).is_err());
        }
    }

    #[tokio::test]
    async fn test_compile_and_run_without_provider() {
        let env = compile_and_run("let x = 1 + 1", None).await.unwrap();
        assert_eq!(env.get("x"), Some(&Value::Number(2.0)));
    }

    #[tokio::test]
    async fn test_compile_and_run_with_stub_provider() {
        use async_trait::async_trait;

        struct Fixed;

        #[async_trait]
        impl MarketProvider for Fixed {
            async fn call(
                &self,
                _function: &str,
                _symbol: &str,
            ) -> riyal_runtime::Result<Value> {
                Ok(Value::Number(100.0))
            }
        }

        let env = compile_and_run(
            r#"let price = market.getStockPrice("AAPL") let target = price * 2"#,
            Some(&Fixed),
        )
        .await
        .unwrap();
        assert_eq!(env.get("target"), Some(&Value::Number(200.0)));
    }
}
