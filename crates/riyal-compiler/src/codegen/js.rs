//! JavaScript code generator
//!
//! One textual template per node kind, applied recursively. Operator
//! expressions are always fully parenthesized so precedence survives
//! independently of JavaScript's own rules, and call sites keep the
//! source bracket convention. Both matches below are exhaustive with no
//! wildcard arm: adding a node kind without a template is a compile
//! error, not invalid output.

use riyal_core::{Expression, ExpressionKind, Program, Statement};

/// JavaScript code generator
pub struct CodeGenerator;

impl CodeGenerator {
    /// Create a new code generator
    pub fn new() -> Self {
        Self
    }

    /// Render a program as JavaScript source text
    pub fn generate(&self, program: &Program) -> String {
        program
            .statements
            .iter()
            .map(|stmt| self.generate_statement(stmt))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a single statement
    pub fn generate_statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::VariableDeclaration { name, initializer } => {
                format!("let {} = {};", name, self.generate_expression(initializer))
            }

            Statement::Assignment { name, expression } => {
                format!("{} = {};", name, self.generate_expression(expression))
            }

            Statement::FunctionDeclaration { name, params, body } => {
                let body = body
                    .iter()
                    .map(|stmt| self.generate_statement(stmt))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("function {}({}) {{\n{}\n}}", name, params.join(", "), body)
            }

            Statement::WhileLoop { condition, body } => {
                let body = body
                    .iter()
                    .map(|stmt| self.generate_statement(stmt))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "while ({}) {{\n{}\n}}",
                    self.generate_expression(condition),
                    body
                )
            }

            Statement::ForLoop {
                variable,
                iterable,
                body,
            } => {
                let body = body
                    .iter()
                    .map(|stmt| self.generate_statement(stmt))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "for (let {} of {}) {{\n{}\n}}",
                    variable,
                    self.generate_expression(iterable),
                    body
                )
            }

            Statement::Expression { expression } => {
                format!("{};", self.generate_expression(expression))
            }
        }
    }

    /// Render a single expression
    pub fn generate_expression(&self, expression: &Expression) -> String {
        match &expression.kind {
            ExpressionKind::Identifier { name } => name.clone(),

            ExpressionKind::NumberLiteral { value } => format_number(*value),

            ExpressionKind::StringLiteral { value } => format!("\"{}\"", escape_string(value)),

            ExpressionKind::BooleanLiteral { value } => value.to_string(),

            ExpressionKind::ArrayLiteral { elements } => {
                let elements = elements
                    .iter()
                    .map(|element| self.generate_expression(element))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", elements)
            }

            ExpressionKind::ObjectLiteral { properties } => {
                let properties = properties
                    .iter()
                    .map(|property| {
                        format!(
                            "{}: {}",
                            property.key,
                            self.generate_expression(&property.value)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{}}}", properties)
            }

            ExpressionKind::Binary { op, left, right } => format!(
                "({} {} {})",
                self.generate_expression(left),
                op,
                self.generate_expression(right)
            ),

            ExpressionKind::Unary { op, operand } => {
                format!("({}{})", op, self.generate_expression(operand))
            }

            ExpressionKind::Conditional {
                condition,
                consequent,
                alternate,
            } => format!(
                "({} ? {} : {})",
                self.generate_expression(condition),
                self.generate_expression(consequent),
                self.generate_expression(alternate)
            ),

            ExpressionKind::FunctionCall { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.generate_expression(arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}[{}]", callee, args)
            }

            ExpressionKind::MarketCall { function, symbol } => {
                format!("await marketFunctions.{}(\"{}\")", function, symbol)
            }
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a number the way JavaScript would: no trailing `.0`
fn format_number(value: f64) -> String {
    value.to_string()
}

/// Escape string-literal delimiters and control characters
fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
