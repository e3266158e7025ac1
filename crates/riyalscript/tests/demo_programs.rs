//! End-to-end tests over the sample programs in `demos/`

use riyalscript::{compile, CompileOutput, OutputMode, Value};

fn demo(name: &str) -> String {
    let path = format!(
        "{}/../../demos/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path, e))
}

#[test]
fn test_interest_calculator_compiles_to_js() {
    let source = demo("interest_calculator.riyal");

    let output = compile(&source, OutputMode::Js).unwrap();
    let CompileOutput::Js(js) = output else {
        panic!("Expected Js output");
    };

    assert!(js.contains("function simpleInterest(principal, rate, time)"));
    assert!(js.contains("function compoundInterest(principal, rate, time, frequency)"));
    assert!(js.contains("let principal = 5000;"));
    assert!(js.contains("simpleInterest[principal, annualRate, years]"));
}

#[test]
fn test_market_analysis_generates_awaited_calls() {
    let source = demo("market_analysis.riyal");

    let parsed = compile(&source, OutputMode::Parsed).unwrap();
    assert!(matches!(parsed, CompileOutput::Parsed(_)));

    let CompileOutput::Js(js) = compile(&source, OutputMode::Js).unwrap() else {
        panic!("Expected Js output");
    };
    assert!(js.contains("await marketFunctions.getStockPrice(\"AAPL\")"));
    assert!(js.contains("await marketFunctions.get52WeekHigh(\"AAPL\")"));
    assert!(js.contains("await marketFunctions.isAllTimeHigh(\"AAPL\")"));
}

#[test]
fn test_simple_budget_runs_to_a_final_environment() {
    let source = demo("simple_budget.riyal");

    let CompileOutput::Environment(env) = compile(&source, OutputMode::Run).unwrap() else {
        panic!("Expected Environment output");
    };

    assert_eq!(env.get("expenses"), Some(&Value::Number(3090.0)));
    assert_eq!(env.get("savings"), Some(&Value::Number(1500.0)));
    assert_eq!(env.get("leftover"), Some(&Value::Number(2910.0)));
    assert_eq!(
        env.get("summary"),
        Some(&Value::String("status: within budget".to_string()))
    );
}

#[test]
fn test_demo_compilation_is_deterministic() {
    let source = demo("interest_calculator.riyal");

    let CompileOutput::Js(first) = compile(&source, OutputMode::Js).unwrap() else {
        panic!("Expected Js output");
    };
    let CompileOutput::Js(second) = compile(&source, OutputMode::Js).unwrap() else {
        panic!("Expected Js output");
    };
    assert_eq!(first, second);
}
