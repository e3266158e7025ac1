//! AST definitions for RiyalScript
//!
//! The parser produces these nodes untyped (`inferred_type` is `None`);
//! the semantic analyzer rebuilds the tree with an inferred type on every
//! expression.

pub mod expression;
pub mod operator;
pub mod statement;

pub use expression::{Expression, ExpressionKind, Property};
pub use operator::{BinaryOperator, UnaryOperator};
pub use statement::{Program, Statement};
