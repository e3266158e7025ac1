//! Market-data collaborator
//!
//! The asynchronous function table that `market.*` calls resolve against.
//! The compile pipeline never touches this module; it exists for `run`
//! mode and for consumers of the generated JavaScript.

pub mod cache;
pub mod client;
pub mod functions;

pub use cache::MarketCache;
pub use client::{AllTimeHighReport, MarketDataClient, StockQuote, WeeklyStats};
pub use functions::MarketFunctions;

use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use riyal_core::{Expression, ExpressionKind, Program, Property, Statement, Value, ValueType};
use std::collections::HashMap;

/// Abstraction over the market function table, so tests can substitute a
/// stub for the HTTP-backed implementation.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    /// Call a market function by name with a ticker symbol
    async fn call(&self, function: &str, symbol: &str) -> Result<Value>;
}

/// Await every market call in the program and substitute the fetched value
/// as a literal, leaving everything else untouched. The evaluator runs
/// only after this pre-pass; it never awaits anything itself.
pub async fn resolve_market_calls(
    program: &Program,
    provider: &dyn MarketProvider,
) -> Result<Program> {
    let mut calls = Vec::new();
    for statement in &program.statements {
        collect_statement_calls(statement, &mut calls);
    }

    let mut resolved: HashMap<(String, String), Value> = HashMap::new();
    for (function, symbol) in calls {
        if resolved.contains_key(&(function.clone(), symbol.clone())) {
            continue;
        }
        tracing::debug!("resolving market.{}(\"{}\")", function, symbol);
        let value = provider.call(&function, &symbol).await?;
        resolved.insert((function, symbol), value);
    }

    let statements = program
        .statements
        .iter()
        .map(|stmt| substitute_statement(stmt, &resolved))
        .collect::<Result<Vec<_>>>()?;
    Ok(Program::new(statements))
}

fn collect_statement_calls(statement: &Statement, calls: &mut Vec<(String, String)>) {
    match statement {
        Statement::VariableDeclaration { initializer, .. } => {
            collect_expression_calls(initializer, calls)
        }
        Statement::Assignment { expression, .. } => collect_expression_calls(expression, calls),
        Statement::FunctionDeclaration { body, .. } => {
            body.iter().for_each(|s| collect_statement_calls(s, calls))
        }
        Statement::WhileLoop { condition, body } => {
            collect_expression_calls(condition, calls);
            body.iter().for_each(|s| collect_statement_calls(s, calls));
        }
        Statement::ForLoop { iterable, body, .. } => {
            collect_expression_calls(iterable, calls);
            body.iter().for_each(|s| collect_statement_calls(s, calls));
        }
        Statement::Expression { expression } => collect_expression_calls(expression, calls),
    }
}

fn collect_expression_calls(expression: &Expression, calls: &mut Vec<(String, String)>) {
    match &expression.kind {
        ExpressionKind::MarketCall { function, symbol } => {
            calls.push((function.clone(), symbol.clone()))
        }
        ExpressionKind::Binary { left, right, .. } => {
            collect_expression_calls(left, calls);
            collect_expression_calls(right, calls);
        }
        ExpressionKind::Unary { operand, .. } => collect_expression_calls(operand, calls),
        ExpressionKind::Conditional {
            condition,
            consequent,
            alternate,
        } => {
            collect_expression_calls(condition, calls);
            collect_expression_calls(consequent, calls);
            collect_expression_calls(alternate, calls);
        }
        ExpressionKind::FunctionCall { args, .. } => {
            args.iter().for_each(|a| collect_expression_calls(a, calls))
        }
        ExpressionKind::ArrayLiteral { elements } => elements
            .iter()
            .for_each(|e| collect_expression_calls(e, calls)),
        ExpressionKind::ObjectLiteral { properties } => properties
            .iter()
            .for_each(|p| collect_expression_calls(&p.value, calls)),
        ExpressionKind::Identifier { .. }
        | ExpressionKind::NumberLiteral { .. }
        | ExpressionKind::StringLiteral { .. }
        | ExpressionKind::BooleanLiteral { .. } => {}
    }
}

fn substitute_statement(
    statement: &Statement,
    resolved: &HashMap<(String, String), Value>,
) -> Result<Statement> {
    Ok(match statement {
        Statement::VariableDeclaration { name, initializer } => Statement::VariableDeclaration {
            name: name.clone(),
            initializer: substitute_expression(initializer, resolved)?,
        },
        Statement::Assignment { name, expression } => Statement::Assignment {
            name: name.clone(),
            expression: substitute_expression(expression, resolved)?,
        },
        Statement::FunctionDeclaration { name, params, body } => Statement::FunctionDeclaration {
            name: name.clone(),
            params: params.clone(),
            body: body
                .iter()
                .map(|s| substitute_statement(s, resolved))
                .collect::<Result<Vec<_>>>()?,
        },
        Statement::WhileLoop { condition, body } => Statement::WhileLoop {
            condition: substitute_expression(condition, resolved)?,
            body: body
                .iter()
                .map(|s| substitute_statement(s, resolved))
                .collect::<Result<Vec<_>>>()?,
        },
        Statement::ForLoop {
            variable,
            iterable,
            body,
        } => Statement::ForLoop {
            variable: variable.clone(),
            iterable: substitute_expression(iterable, resolved)?,
            body: body
                .iter()
                .map(|s| substitute_statement(s, resolved))
                .collect::<Result<Vec<_>>>()?,
        },
        Statement::Expression { expression } => Statement::Expression {
            expression: substitute_expression(expression, resolved)?,
        },
    })
}

fn substitute_expression(
    expression: &Expression,
    resolved: &HashMap<(String, String), Value>,
) -> Result<Expression> {
    Ok(match &expression.kind {
        ExpressionKind::MarketCall { function, symbol } => {
            let value = resolved
                .get(&(function.clone(), symbol.clone()))
                .expect("market call collected before substitution");
            value_to_literal(value, function, symbol)?
        }
        ExpressionKind::Binary { op, left, right } => Expression {
            kind: ExpressionKind::Binary {
                op: *op,
                left: Box::new(substitute_expression(left, resolved)?),
                right: Box::new(substitute_expression(right, resolved)?),
            },
            inferred_type: expression.inferred_type,
        },
        ExpressionKind::Unary { op, operand } => Expression {
            kind: ExpressionKind::Unary {
                op: *op,
                operand: Box::new(substitute_expression(operand, resolved)?),
            },
            inferred_type: expression.inferred_type,
        },
        ExpressionKind::Conditional {
            condition,
            consequent,
            alternate,
        } => Expression {
            kind: ExpressionKind::Conditional {
                condition: Box::new(substitute_expression(condition, resolved)?),
                consequent: Box::new(substitute_expression(consequent, resolved)?),
                alternate: Box::new(substitute_expression(alternate, resolved)?),
            },
            inferred_type: expression.inferred_type,
        },
        ExpressionKind::FunctionCall { callee, args } => Expression {
            kind: ExpressionKind::FunctionCall {
                callee: callee.clone(),
                args: args
                    .iter()
                    .map(|a| substitute_expression(a, resolved))
                    .collect::<Result<Vec<_>>>()?,
            },
            inferred_type: expression.inferred_type,
        },
        ExpressionKind::ArrayLiteral { elements } => Expression {
            kind: ExpressionKind::ArrayLiteral {
                elements: elements
                    .iter()
                    .map(|e| substitute_expression(e, resolved))
                    .collect::<Result<Vec<_>>>()?,
            },
            inferred_type: expression.inferred_type,
        },
        ExpressionKind::ObjectLiteral { properties } => Expression {
            kind: ExpressionKind::ObjectLiteral {
                properties: properties
                    .iter()
                    .map(|p| {
                        Ok(Property {
                            key: p.key.clone(),
                            value: substitute_expression(&p.value, resolved)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            },
            inferred_type: expression.inferred_type,
        },
        ExpressionKind::Identifier { .. }
        | ExpressionKind::NumberLiteral { .. }
        | ExpressionKind::StringLiteral { .. }
        | ExpressionKind::BooleanLiteral { .. } => expression.clone(),
    })
}

/// Turn a fetched market value into a literal node. Structured results
/// cannot be spliced into a script; `Null` means the collaborator had no
/// data for the symbol.
fn value_to_literal(value: &Value, function: &str, symbol: &str) -> Result<Expression> {
    match value {
        Value::Number(n) => Ok(Expression::typed(
            ExpressionKind::NumberLiteral { value: *n },
            ValueType::Number,
        )),
        Value::String(s) => Ok(Expression::typed(
            ExpressionKind::StringLiteral { value: s.clone() },
            ValueType::String,
        )),
        Value::Bool(b) => Ok(Expression::typed(
            ExpressionKind::BooleanLiteral { value: *b },
            ValueType::Boolean,
        )),
        Value::Null => Err(RuntimeError::MarketData(format!(
            "no data for symbol \"{}\" from {}",
            symbol, function
        ))),
        Value::Array(_) | Value::Object(_) => Err(RuntimeError::MarketData(format!(
            "{}(\"{}\") returned structured data, which run mode cannot substitute",
            function, symbol
        ))),
    }
}
