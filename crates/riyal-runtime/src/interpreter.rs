//! Minimal evaluator behind `run` mode
//!
//! One flat mutable mapping from variable name to runtime value; no nested
//! scoping and no user-function calls. Declarations and assignments write
//! into the mapping; binary/unary/conditional expressions evaluate; every
//! other node kind is a fatal error. This is deliberately not a general
//! interpreter.

use crate::error::{Result, RuntimeError};
use riyal_core::ast::{BinaryOperator, UnaryOperator};
use riyal_core::{Expression, ExpressionKind, Program, Statement, Value};
use serde::Serialize;
use std::collections::HashMap;

/// Flat variable environment
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Environment {
    values: HashMap<String, Value>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a variable up
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Declare a variable, overwriting any previous binding
    pub fn declare(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Assign to an existing variable; undeclared names are a hard error
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::AssignmentToUndeclared(name.to_string())),
        }
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over bindings
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

/// The run-mode interpreter
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    /// Create an interpreter with an empty environment
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Evaluate the program's statements in sequence.
    ///
    /// The first error aborts evaluation; there is no partial-environment
    /// recovery.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for statement in &program.statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    /// The current environment
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Consume the interpreter, returning its environment
    pub fn into_env(self) -> Environment {
        self.env
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::VariableDeclaration { name, initializer } => {
                let value = self.eval_expression(initializer)?;
                self.env.declare(name, value);
                Ok(())
            }

            Statement::Assignment { name, expression } => {
                let value = self.eval_expression(expression)?;
                self.env.assign(name, value)
            }

            Statement::Expression { expression } => {
                self.eval_expression(expression)?;
                Ok(())
            }

            Statement::FunctionDeclaration { .. } => Err(RuntimeError::UnsupportedNode(
                "function declaration".to_string(),
            )),
            Statement::WhileLoop { .. } => {
                Err(RuntimeError::UnsupportedNode("while loop".to_string()))
            }
            Statement::ForLoop { .. } => {
                Err(RuntimeError::UnsupportedNode("for loop".to_string()))
            }
        }
    }

    fn eval_expression(&self, expression: &Expression) -> Result<Value> {
        match &expression.kind {
            ExpressionKind::NumberLiteral { value } => Ok(Value::Number(*value)),
            ExpressionKind::StringLiteral { value } => Ok(Value::String(value.clone())),
            ExpressionKind::BooleanLiteral { value } => Ok(Value::Bool(*value)),

            ExpressionKind::Identifier { name } => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndeclaredVariable(name.clone())),

            ExpressionKind::Binary { op, left, right } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                eval_binary_op(&left, *op, &right)
            }

            ExpressionKind::Unary { op, operand } => {
                let operand = self.eval_expression(operand)?;
                eval_unary_op(*op, &operand)
            }

            ExpressionKind::Conditional {
                condition,
                consequent,
                alternate,
            } => match self.eval_expression(condition)? {
                Value::Bool(true) => self.eval_expression(consequent),
                Value::Bool(false) => self.eval_expression(alternate),
                other => Err(RuntimeError::TypeError(format!(
                    "conditional condition must be a boolean, got {}",
                    other.type_name()
                ))),
            },

            ExpressionKind::MarketCall { function, symbol } => {
                Err(RuntimeError::UnresolvedMarketCall {
                    function: function.clone(),
                    symbol: symbol.clone(),
                })
            }

            ExpressionKind::FunctionCall { .. } => Err(RuntimeError::UnsupportedNode(
                "function call".to_string(),
            )),
            ExpressionKind::ArrayLiteral { .. } => Err(RuntimeError::UnsupportedNode(
                "array literal".to_string(),
            )),
            ExpressionKind::ObjectLiteral { .. } => Err(RuntimeError::UnsupportedNode(
                "object literal".to_string(),
            )),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a program in a fresh environment and return the final bindings
pub fn run(program: &Program) -> Result<Environment> {
    let mut interpreter = Interpreter::new();
    interpreter.run(program)?;
    Ok(interpreter.into_env())
}

fn eval_binary_op(left: &Value, op: BinaryOperator, right: &Value) -> Result<Value> {
    match (left, op, right) {
        // Arithmetic on numbers; division and modulo follow IEEE-754
        (Value::Number(l), BinaryOperator::Add, Value::Number(r)) => Ok(Value::Number(l + r)),
        (Value::Number(l), BinaryOperator::Sub, Value::Number(r)) => Ok(Value::Number(l - r)),
        (Value::Number(l), BinaryOperator::Mul, Value::Number(r)) => Ok(Value::Number(l * r)),
        (Value::Number(l), BinaryOperator::Div, Value::Number(r)) => Ok(Value::Number(l / r)),
        (Value::Number(l), BinaryOperator::Mod, Value::Number(r)) => Ok(Value::Number(l % r)),
        (Value::Number(l), BinaryOperator::Pow, Value::Number(r)) => {
            Ok(Value::Number(l.powf(*r)))
        }

        // String concatenation when either side is a string
        (Value::String(l), BinaryOperator::Add, Value::String(r)) => {
            Ok(Value::String(format!("{}{}", l, r)))
        }
        (Value::String(l), BinaryOperator::Add, Value::Number(r)) => {
            Ok(Value::String(format!("{}{}", l, r)))
        }
        (Value::Number(l), BinaryOperator::Add, Value::String(r)) => {
            Ok(Value::String(format!("{}{}", l, r)))
        }

        // Comparisons on numbers
        (Value::Number(l), BinaryOperator::Gt, Value::Number(r)) => Ok(Value::Bool(l > r)),
        (Value::Number(l), BinaryOperator::Ge, Value::Number(r)) => Ok(Value::Bool(l >= r)),
        (Value::Number(l), BinaryOperator::Lt, Value::Number(r)) => Ok(Value::Bool(l < r)),
        (Value::Number(l), BinaryOperator::Le, Value::Number(r)) => Ok(Value::Bool(l <= r)),

        // Equality on any pair; values of different kinds are unequal
        (l, BinaryOperator::Eq, r) => Ok(Value::Bool(l == r)),
        (l, BinaryOperator::Ne, r) => Ok(Value::Bool(l != r)),

        // Logic on booleans
        (Value::Bool(l), BinaryOperator::And, Value::Bool(r)) => Ok(Value::Bool(*l && *r)),
        (Value::Bool(l), BinaryOperator::Or, Value::Bool(r)) => Ok(Value::Bool(*l || *r)),

        _ => Err(RuntimeError::UnsupportedOperation(format!(
            "cannot apply {} to {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn eval_unary_op(op: UnaryOperator, operand: &Value) -> Result<Value> {
    match (op, operand) {
        (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (UnaryOperator::Factorial, Value::Number(n)) => {
            if *n < 0.0 {
                return Err(RuntimeError::NegativeFactorial(*n));
            }
            let n = n.trunc() as u64;
            let mut result = 1.0f64;
            for i in 2..=n {
                result *= i as f64;
            }
            Ok(Value::Number(result))
        }
        _ => Err(RuntimeError::UnsupportedOperation(format!(
            "cannot apply {} to {}",
            op,
            operand.type_name()
        ))),
    }
}
