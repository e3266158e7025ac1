//! Statement and program AST nodes

use super::expression::Expression;
use serde::{Deserialize, Serialize};

/// A complete source program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    /// Create a program from a list of statements
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// Statement AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// `let <name> = <initializer>`
    VariableDeclaration {
        name: String,
        initializer: Expression,
    },

    /// `<name> = <expression>`
    Assignment { name: String, expression: Expression },

    /// `func <name>[<params>] (<body>) end`
    FunctionDeclaration {
        name: String,
        params: Vec<String>,
        body: Vec<Statement>,
    },

    /// `while <condition> do <body> end`
    WhileLoop {
        condition: Expression,
        body: Vec<Statement>,
    },

    /// `for <variable> in <iterable> do <body> end`
    ForLoop {
        variable: String,
        iterable: Expression,
        body: Vec<Statement>,
    },

    /// A bare expression at statement level (e.g. a conditional)
    Expression { expression: Expression },
}
