//! Constant folding optimizer
//!
//! Pure bottom-up rewrite: children first, then the parent is reconsidered.
//! A binary expression over two number literals or two boolean literals
//! folds to a literal; a negated number literal folds; a conditional whose
//! condition folds to a boolean literal collapses to the taken branch.
//! Everything else passes through unchanged — the optimizer never blocks
//! compilation, so its expression match keeps a wildcard arm (unlike the
//! generator's).

use riyal_core::ast::{BinaryOperator, UnaryOperator};
use riyal_core::{Expression, ExpressionKind, Program, Property, Statement, ValueType};

/// Constant folding optimizer
pub struct ConstantFolder;

impl ConstantFolder {
    /// Create a new constant folder
    pub fn new() -> Self {
        Self
    }

    /// Optimize a whole program
    pub fn fold_program(&self, program: &Program) -> Program {
        Program::new(
            program
                .statements
                .iter()
                .map(|stmt| self.fold_statement(stmt))
                .collect(),
        )
    }

    /// Optimize a single statement
    pub fn fold_statement(&self, statement: &Statement) -> Statement {
        match statement {
            Statement::VariableDeclaration { name, initializer } => {
                Statement::VariableDeclaration {
                    name: name.clone(),
                    initializer: self.fold(initializer),
                }
            }
            Statement::Assignment { name, expression } => Statement::Assignment {
                name: name.clone(),
                expression: self.fold(expression),
            },
            Statement::FunctionDeclaration { name, params, body } => {
                Statement::FunctionDeclaration {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.iter().map(|stmt| self.fold_statement(stmt)).collect(),
                }
            }
            Statement::WhileLoop { condition, body } => Statement::WhileLoop {
                condition: self.fold(condition),
                body: body.iter().map(|stmt| self.fold_statement(stmt)).collect(),
            },
            Statement::ForLoop {
                variable,
                iterable,
                body,
            } => Statement::ForLoop {
                variable: variable.clone(),
                iterable: self.fold(iterable),
                body: body.iter().map(|stmt| self.fold_statement(stmt)).collect(),
            },
            Statement::Expression { expression } => Statement::Expression {
                expression: self.fold(expression),
            },
        }
    }

    /// Optimize an expression by folding constants
    pub fn fold(&self, expression: &Expression) -> Expression {
        match &expression.kind {
            ExpressionKind::Binary { op, left, right } => {
                let left = self.fold(left);
                let right = self.fold(right);

                if let Some(folded) = fold_binary_op(&left.kind, *op, &right.kind) {
                    return folded;
                }

                Expression {
                    kind: ExpressionKind::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    inferred_type: expression.inferred_type,
                }
            }

            ExpressionKind::Unary { op, operand } => {
                let operand = self.fold(operand);

                if let (UnaryOperator::Negate, ExpressionKind::NumberLiteral { value }) =
                    (op, &operand.kind)
                {
                    return Expression::typed(
                        ExpressionKind::NumberLiteral { value: -value },
                        ValueType::Number,
                    );
                }

                Expression {
                    kind: ExpressionKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    inferred_type: expression.inferred_type,
                }
            }

            ExpressionKind::Conditional {
                condition,
                consequent,
                alternate,
            } => {
                let condition = self.fold(condition);

                // A constant condition selects its branch at compile time.
                if let ExpressionKind::BooleanLiteral { value } = condition.kind {
                    return if value {
                        self.fold(consequent)
                    } else {
                        self.fold(alternate)
                    };
                }

                Expression {
                    kind: ExpressionKind::Conditional {
                        condition: Box::new(condition),
                        consequent: Box::new(self.fold(consequent)),
                        alternate: Box::new(self.fold(alternate)),
                    },
                    inferred_type: expression.inferred_type,
                }
            }

            ExpressionKind::FunctionCall { callee, args } => Expression {
                kind: ExpressionKind::FunctionCall {
                    callee: callee.clone(),
                    args: args.iter().map(|arg| self.fold(arg)).collect(),
                },
                inferred_type: expression.inferred_type,
            },

            ExpressionKind::ArrayLiteral { elements } => Expression {
                kind: ExpressionKind::ArrayLiteral {
                    elements: elements.iter().map(|element| self.fold(element)).collect(),
                },
                inferred_type: expression.inferred_type,
            },

            ExpressionKind::ObjectLiteral { properties } => Expression {
                kind: ExpressionKind::ObjectLiteral {
                    properties: properties
                        .iter()
                        .map(|property| Property {
                            key: property.key.clone(),
                            value: self.fold(&property.value),
                        })
                        .collect(),
                },
                inferred_type: expression.inferred_type,
            },

            // Identifiers, literals and market calls pass through unchanged.
            _ => expression.clone(),
        }
    }
}

impl Default for ConstantFolder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold a binary operation over two literal operands of compatible kind
fn fold_binary_op(
    left: &ExpressionKind,
    op: BinaryOperator,
    right: &ExpressionKind,
) -> Option<Expression> {
    match (left, right) {
        (
            ExpressionKind::NumberLiteral { value: l },
            ExpressionKind::NumberLiteral { value: r },
        ) => {
            let number = |value: f64| {
                Expression::typed(ExpressionKind::NumberLiteral { value }, ValueType::Number)
            };
            let boolean = |value: bool| {
                Expression::typed(
                    ExpressionKind::BooleanLiteral { value },
                    ValueType::Boolean,
                )
            };
            match op {
                BinaryOperator::Add => Some(number(l + r)),
                BinaryOperator::Sub => Some(number(l - r)),
                BinaryOperator::Mul => Some(number(l * r)),
                BinaryOperator::Div => Some(number(l / r)),
                BinaryOperator::Mod => Some(number(l % r)),
                BinaryOperator::Pow => Some(number(l.powf(*r))),
                BinaryOperator::Gt => Some(boolean(l > r)),
                BinaryOperator::Ge => Some(boolean(l >= r)),
                BinaryOperator::Lt => Some(boolean(l < r)),
                BinaryOperator::Le => Some(boolean(l <= r)),
                BinaryOperator::Eq => Some(boolean(l == r)),
                BinaryOperator::Ne => Some(boolean(l != r)),
                // Logical operators over numbers are left for the runtime.
                BinaryOperator::And | BinaryOperator::Or => None,
            }
        }

        (
            ExpressionKind::BooleanLiteral { value: l },
            ExpressionKind::BooleanLiteral { value: r },
        ) => {
            let boolean = |value: bool| {
                Expression::typed(
                    ExpressionKind::BooleanLiteral { value },
                    ValueType::Boolean,
                )
            };
            match op {
                BinaryOperator::And => Some(boolean(*l && *r)),
                BinaryOperator::Or => Some(boolean(*l || *r)),
                BinaryOperator::Eq => Some(boolean(l == r)),
                BinaryOperator::Ne => Some(boolean(l != r)),
                _ => None,
            }
        }

        _ => None,
    }
}
