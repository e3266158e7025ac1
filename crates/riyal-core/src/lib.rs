//! RiyalScript Core - AST and value types for the RiyalScript compiler
//!
//! This crate provides the fundamental types shared across the pipeline:
//! - AST (Abstract Syntax Tree) definitions
//! - Operator enums
//! - The inferred-type tag attached to expressions during analysis
//! - Runtime value types

pub mod ast;
pub mod types;

// Re-export commonly used types
pub use ast::{Expression, ExpressionKind, Program, Property, Statement};
pub use types::{Value, ValueType};
