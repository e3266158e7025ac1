use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use riyalscript::{compile, CompileOutput, MarketFunctions, OutputMode};

/// RiyalScript compiler
#[derive(Parser, Debug)]
#[command(name = "riyal", version, about, long_about = None)]
struct Cli {
    /// Path to a RiyalScript source file
    file: PathBuf,

    /// Output stage: parsed, analyzed, optimized, js, run
    mode: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read input file {}", cli.file.display()))?;
    let mode: OutputMode = cli.mode.parse()?;

    if mode == OutputMode::Run {
        // Market calls resolve against the real quote API in run mode.
        let provider = MarketFunctions::from_env();
        let env = riyalscript::compile_and_run(&source, Some(&provider)).await?;
        println!("{}", serde_json::to_string_pretty(&env)?);
        return Ok(());
    }

    match compile(&source, mode)? {
        CompileOutput::Parsed(message) => println!("{}", message),
        CompileOutput::Ast(program) => println!("{}", serde_json::to_string_pretty(&program)?),
        CompileOutput::Js(js) => println!("{}", js),
        CompileOutput::Environment(env) => println!("{}", serde_json::to_string_pretty(&env)?),
    }

    Ok(())
}
