//! Semantic analyzer
//!
//! Walks the untyped AST once, resolves identifiers against lexical scope,
//! validates function-call arity, and attaches an inferred type to every
//! expression. The result is a fresh, fully typed tree; the input is never
//! mutated.

use crate::error::{CompileError, Result};
use crate::semantic::scope::ScopeStack;
use riyal_core::ast::{BinaryOperator, UnaryOperator};
use riyal_core::{Expression, ExpressionKind, Program, Property, Statement, ValueType};

/// Analysis policy
///
/// `Strict` is the reference behavior: identifiers must be declared before
/// use, same-frame redeclaration is an error, and call arity must match.
/// `Permissive` accepts unresolved identifiers and calls (they infer `Any`)
/// for partial/incremental tooling; validation is deferred to a later pass
/// or to runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPolicy {
    #[default]
    Strict,
    Permissive,
}

/// Semantic analyzer
pub struct SemanticAnalyzer {
    policy: AnalysisPolicy,
    scopes: ScopeStack,
}

impl SemanticAnalyzer {
    /// Create an analyzer with the strict reference policy
    pub fn new() -> Self {
        Self::with_policy(AnalysisPolicy::Strict)
    }

    /// Create an analyzer with an explicit policy
    pub fn with_policy(policy: AnalysisPolicy) -> Self {
        Self {
            policy,
            scopes: ScopeStack::new(),
        }
    }

    fn strict(&self) -> bool {
        self.policy == AnalysisPolicy::Strict
    }

    /// Analyze a program, producing a typed AST or the first hard error
    pub fn analyze(&mut self, program: &Program) -> Result<Program> {
        log::debug!(
            "analyzing {} top-level statements ({:?})",
            program.statements.len(),
            self.policy
        );
        self.scopes = ScopeStack::new();
        let statements = program
            .statements
            .iter()
            .map(|stmt| self.analyze_statement(stmt))
            .collect::<Result<Vec<_>>>()?;
        Ok(Program::new(statements))
    }

    fn analyze_statement(&mut self, statement: &Statement) -> Result<Statement> {
        match statement {
            Statement::VariableDeclaration { name, initializer } => {
                let initializer = self.analyze_expression(initializer)?;
                let value_type = initializer.inferred_type.unwrap_or(ValueType::Any);
                if self.strict() {
                    if !self.scopes.declare_variable(name, value_type) {
                        return Err(CompileError::VariableRedeclared(name.clone()));
                    }
                } else {
                    self.scopes.rebind_variable(name, value_type);
                }
                Ok(Statement::VariableDeclaration {
                    name: name.clone(),
                    initializer,
                })
            }

            Statement::Assignment { name, expression } => {
                if self.strict() && self.scopes.lookup_variable(name).is_none() {
                    return Err(CompileError::UndeclaredVariable(name.clone()));
                }
                let expression = self.analyze_expression(expression)?;
                Ok(Statement::Assignment {
                    name: name.clone(),
                    expression,
                })
            }

            Statement::FunctionDeclaration { name, params, body } => {
                if self.strict() {
                    if !self.scopes.declare_function(name, params.len()) {
                        return Err(CompileError::FunctionRedeclared(name.clone()));
                    }
                } else {
                    self.scopes.declare_function(name, params.len());
                }

                // Parameters are locals of unknown type inside the body frame.
                self.scopes.push_frame();
                for param in params {
                    self.scopes.rebind_variable(param, ValueType::Any);
                }
                let body = body
                    .iter()
                    .map(|stmt| self.analyze_statement(stmt))
                    .collect::<Result<Vec<_>>>();
                self.scopes.pop_frame();

                Ok(Statement::FunctionDeclaration {
                    name: name.clone(),
                    params: params.clone(),
                    body: body?,
                })
            }

            Statement::WhileLoop { condition, body } => {
                let condition = self.analyze_expression(condition)?;
                let body = body
                    .iter()
                    .map(|stmt| self.analyze_statement(stmt))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Statement::WhileLoop { condition, body })
            }

            Statement::ForLoop {
                variable,
                iterable,
                body,
            } => {
                let iterable = self.analyze_expression(iterable)?;
                // The loop introduces its binding; reuse rebinds silently.
                self.scopes.rebind_variable(variable, ValueType::Any);
                let body = body
                    .iter()
                    .map(|stmt| self.analyze_statement(stmt))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Statement::ForLoop {
                    variable: variable.clone(),
                    iterable,
                    body,
                })
            }

            Statement::Expression { expression } => {
                let expression = self.analyze_expression(expression)?;
                Ok(Statement::Expression { expression })
            }
        }
    }

    fn analyze_expression(&mut self, expression: &Expression) -> Result<Expression> {
        match &expression.kind {
            ExpressionKind::NumberLiteral { value } => Ok(Expression::typed(
                ExpressionKind::NumberLiteral { value: *value },
                ValueType::Number,
            )),

            ExpressionKind::StringLiteral { value } => Ok(Expression::typed(
                ExpressionKind::StringLiteral {
                    value: value.clone(),
                },
                ValueType::String,
            )),

            ExpressionKind::BooleanLiteral { value } => Ok(Expression::typed(
                ExpressionKind::BooleanLiteral { value: *value },
                ValueType::Boolean,
            )),

            ExpressionKind::Identifier { name } => {
                let value_type = match self.scopes.lookup_variable(name) {
                    Some(value_type) => value_type,
                    None if self.strict() => {
                        return Err(CompileError::UndeclaredVariable(name.clone()))
                    }
                    None => ValueType::Any,
                };
                Ok(Expression::typed(
                    ExpressionKind::Identifier { name: name.clone() },
                    value_type,
                ))
            }

            ExpressionKind::ArrayLiteral { elements } => {
                let elements = elements
                    .iter()
                    .map(|element| self.analyze_expression(element))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expression::typed(
                    ExpressionKind::ArrayLiteral { elements },
                    ValueType::Array,
                ))
            }

            ExpressionKind::ObjectLiteral { properties } => {
                let properties = properties
                    .iter()
                    .map(|property| {
                        Ok(Property {
                            key: property.key.clone(),
                            value: self.analyze_expression(&property.value)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expression::typed(
                    ExpressionKind::ObjectLiteral { properties },
                    ValueType::Object,
                ))
            }

            ExpressionKind::Binary { op, left, right } => {
                let left = self.analyze_expression(left)?;
                let right = self.analyze_expression(right)?;
                let value_type = infer_binary_type(
                    *op,
                    left.inferred_type.unwrap_or(ValueType::Any),
                    right.inferred_type.unwrap_or(ValueType::Any),
                );
                Ok(Expression::typed(
                    ExpressionKind::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    value_type,
                ))
            }

            ExpressionKind::Unary { op, operand } => {
                let operand = self.analyze_expression(operand)?;
                let value_type = match op {
                    UnaryOperator::Negate => ValueType::Number,
                    UnaryOperator::Factorial => ValueType::Boolean,
                };
                Ok(Expression::typed(
                    ExpressionKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    value_type,
                ))
            }

            ExpressionKind::FunctionCall { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.analyze_expression(arg))
                    .collect::<Result<Vec<_>>>()?;

                if self.strict() {
                    let arity = self
                        .scopes
                        .lookup_function(callee)
                        .ok_or_else(|| CompileError::UndeclaredFunction(callee.clone()))?;
                    if arity != args.len() {
                        return Err(CompileError::ArityMismatch {
                            name: callee.clone(),
                            expected: arity,
                            actual: args.len(),
                        });
                    }
                }

                Ok(Expression::typed(
                    ExpressionKind::FunctionCall {
                        callee: callee.clone(),
                        args,
                    },
                    ValueType::Any,
                ))
            }

            ExpressionKind::Conditional {
                condition,
                consequent,
                alternate,
            } => {
                let condition = self.analyze_expression(condition)?;
                let consequent = self.analyze_expression(consequent)?;
                let alternate = self.analyze_expression(alternate)?;
                // The inference table defines no rule for conditionals.
                Ok(Expression::typed(
                    ExpressionKind::Conditional {
                        condition: Box::new(condition),
                        consequent: Box::new(consequent),
                        alternate: Box::new(alternate),
                    },
                    ValueType::Any,
                ))
            }

            ExpressionKind::MarketCall { function, symbol } => Ok(Expression::typed(
                ExpressionKind::MarketCall {
                    function: function.clone(),
                    symbol: symbol.clone(),
                },
                ValueType::Any,
            )),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer the result type of a binary operation from its operand types
fn infer_binary_type(op: BinaryOperator, left: ValueType, right: ValueType) -> ValueType {
    if op.is_comparison() || op.is_logical() {
        return ValueType::Boolean;
    }
    match op {
        BinaryOperator::Pow => ValueType::Number,
        BinaryOperator::Add
            if left == ValueType::String || right == ValueType::String =>
        {
            ValueType::String
        }
        _ if left == ValueType::Number && right == ValueType::Number => ValueType::Number,
        _ => ValueType::Any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riyal_parser::parse;

    fn analyze_source(source: &str) -> Result<Program> {
        SemanticAnalyzer::new().analyze(&parse(source).unwrap())
    }

    fn first_initializer(program: &Program) -> &Expression {
        match &program.statements[0] {
            Statement::VariableDeclaration { initializer, .. } => initializer,
            other => panic!("Expected VariableDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_every_expression_is_typed_after_analysis() {
        let program = analyze_source(r#"let x = [1, "two", {a: 1 + 2}]"#).unwrap();

        fn assert_typed(expr: &Expression) {
            assert!(expr.inferred_type.is_some(), "untyped node: {:?}", expr);
            match &expr.kind {
                ExpressionKind::ArrayLiteral { elements } => {
                    elements.iter().for_each(assert_typed)
                }
                ExpressionKind::ObjectLiteral { properties } => {
                    properties.iter().for_each(|p| assert_typed(&p.value))
                }
                ExpressionKind::Binary { left, right, .. } => {
                    assert_typed(left);
                    assert_typed(right);
                }
                _ => {}
            }
        }
        assert_typed(first_initializer(&program));
    }

    #[test]
    fn test_infer_string_concatenation() {
        // "hello" + 5 infers string
        let program = analyze_source(r#"let s = "hello" + 5"#).unwrap();
        assert_eq!(
            first_initializer(&program).inferred_type,
            Some(ValueType::String)
        );
    }

    #[test]
    fn test_infer_boolean_from_comparisons() {
        // 5 > 3 && 2 < 4 infers boolean
        let program = analyze_source("let ok = 5 > 3 && 2 < 4").unwrap();
        assert_eq!(
            first_initializer(&program).inferred_type,
            Some(ValueType::Boolean)
        );
    }

    #[test]
    fn test_infer_number_through_power() {
        // 1000 * (1 + 0.05) ** 10 infers number
        let program = analyze_source("let fv = 1000 * (1 + 0.05) ** 10").unwrap();
        assert_eq!(
            first_initializer(&program).inferred_type,
            Some(ValueType::Number)
        );
    }

    #[test]
    fn test_undeclared_variable_is_an_error() {
        let err = analyze_source("let x = y").unwrap_err();
        match err {
            CompileError::UndeclaredVariable(name) => assert_eq!(name, "y"),
            other => panic!("Expected UndeclaredVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_redeclaration_is_an_error() {
        let err = analyze_source("let x = 1 let x = 2").unwrap_err();
        assert!(matches!(err, CompileError::VariableRedeclared(name) if name == "x"));
    }

    #[test]
    fn test_shadowing_in_function_frame_is_allowed() {
        let source = "let x = 1 func f[y] (y + x) end";
        assert!(analyze_source(source).is_ok());
    }

    #[test]
    fn test_assignment_requires_declaration() {
        let err = analyze_source("x = 5").unwrap_err();
        assert!(matches!(err, CompileError::UndeclaredVariable(name) if name == "x"));
    }

    #[test]
    fn test_arity_mismatch_names_function_and_counts() {
        let err = analyze_source("func add[a, b] (a + b) end let r = add[1]").unwrap_err();
        match err {
            CompileError::ArityMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "add");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
                let message = CompileError::ArityMismatch {
                    name,
                    expected,
                    actual,
                }
                .to_string();
                assert!(message.contains("expects 2 args, got 1"));
            }
            other => panic!("Expected ArityMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_matching_arity_is_accepted() {
        assert!(analyze_source("func add[x, y] (x + y) end let r = add[5, 3]").is_ok());
    }

    #[test]
    fn test_undeclared_function_is_an_error() {
        let err = analyze_source("let r = missing[1]").unwrap_err();
        assert!(matches!(err, CompileError::UndeclaredFunction(name) if name == "missing"));
    }

    #[test]
    fn test_function_parameters_bind_as_any() {
        let program = analyze_source("func twice[n] (n * 2) end").unwrap();
        match &program.statements[0] {
            Statement::FunctionDeclaration { body, .. } => match &body[0] {
                Statement::Expression { expression } => {
                    // n is Any, so n * 2 falls outside the number/number row
                    assert_eq!(expression.inferred_type, Some(ValueType::Any));
                }
                other => panic!("Expected Expression statement, got {:?}", other),
            },
            other => panic!("Expected FunctionDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parameters_do_not_leak_out_of_function() {
        let err = analyze_source("func f[n] (n) end let r = n").unwrap_err();
        assert!(matches!(err, CompileError::UndeclaredVariable(name) if name == "n"));
    }

    #[test]
    fn test_permissive_accepts_unresolved_symbols() {
        let program = parse("let r = unknown[1, 2] + mystery").unwrap();
        let analyzed = SemanticAnalyzer::with_policy(AnalysisPolicy::Permissive)
            .analyze(&program)
            .unwrap();
        assert_eq!(
            first_initializer(&analyzed).inferred_type,
            Some(ValueType::Any)
        );
    }

    #[test]
    fn test_permissive_accepts_redeclaration() {
        let program = parse("let x = 1 let x = 2").unwrap();
        assert!(SemanticAnalyzer::with_policy(AnalysisPolicy::Permissive)
            .analyze(&program)
            .is_ok());
    }

    #[test]
    fn test_for_loop_variable_binds_in_enclosing_frame() {
        let source = "for i in [1, 2] do let a = i end for i in [3] do let b = i end";
        assert!(analyze_source(source).is_ok());
    }

    #[test]
    fn test_market_call_infers_any() {
        let program = analyze_source(r#"let price = market.getStockPrice("AAPL")"#).unwrap();
        assert_eq!(
            first_initializer(&program).inferred_type,
            Some(ValueType::Any)
        );
    }
}
