//! Expression AST nodes
//!
//! Every expression carries an optional inferred-type tag. The parser
//! leaves it empty; the semantic analyzer fills it in. Keeping the tag a
//! first-class field means downstream stages never have to re-derive it.

use super::operator::{BinaryOperator, UnaryOperator};
use crate::types::ValueType;
use serde::{Deserialize, Serialize};

/// Expression AST node: a node kind plus the type inferred for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// The node kind and its fields
    #[serde(flatten)]
    pub kind: ExpressionKind,
    /// Inferred type tag, `None` before semantic analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred_type: Option<ValueType>,
}

/// The expression node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExpressionKind {
    /// Variable reference
    Identifier { name: String },

    /// Number literal
    NumberLiteral { value: f64 },

    /// String literal
    StringLiteral { value: String },

    /// Boolean literal
    BooleanLiteral { value: bool },

    /// Array literal `[e, e, ...]`
    ArrayLiteral { elements: Vec<Expression> },

    /// Object literal `{k: v, ...}`
    ObjectLiteral { properties: Vec<Property> },

    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Unary operation (prefix negation or postfix factorial)
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Function call `callee[args]`
    FunctionCall { callee: String, args: Vec<Expression> },

    /// Conditional `if c then t else f`, also usable at statement level
    Conditional {
        condition: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },

    /// Call into the external market-data collaborator,
    /// `market.<function>("<symbol>")`
    MarketCall { function: String, symbol: String },
}

/// A key/value entry of an object literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Expression,
}

impl Expression {
    /// Create an expression with no inferred type (parser output)
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            inferred_type: None,
        }
    }

    /// Create an expression with an explicit inferred type (analyzer output)
    pub fn typed(kind: ExpressionKind, inferred_type: ValueType) -> Self {
        Self {
            kind,
            inferred_type: Some(inferred_type),
        }
    }

    /// Create an identifier expression
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Identifier { name: name.into() })
    }

    /// Create a number literal
    pub fn number(value: f64) -> Self {
        Self::new(ExpressionKind::NumberLiteral { value })
    }

    /// Create a string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExpressionKind::StringLiteral {
            value: value.into(),
        })
    }

    /// Create a boolean literal
    pub fn boolean(value: bool) -> Self {
        Self::new(ExpressionKind::BooleanLiteral { value })
    }

    /// Create an array literal
    pub fn array(elements: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::ArrayLiteral { elements })
    }

    /// Create an object literal
    pub fn object(properties: Vec<Property>) -> Self {
        Self::new(ExpressionKind::ObjectLiteral { properties })
    }

    /// Create a binary expression
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Create a unary expression
    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Self::new(ExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Create a function call expression
    pub fn call(callee: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::FunctionCall {
            callee: callee.into(),
            args,
        })
    }

    /// Create a conditional expression
    pub fn conditional(condition: Expression, consequent: Expression, alternate: Expression) -> Self {
        Self::new(ExpressionKind::Conditional {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    /// Create a market-data call expression
    pub fn market_call(function: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::new(ExpressionKind::MarketCall {
            function: function.into(),
            symbol: symbol.into(),
        })
    }

    /// Attach an inferred type, consuming self
    pub fn with_inferred(mut self, inferred_type: ValueType) -> Self {
        self.inferred_type = Some(inferred_type);
        self
    }

    /// Returns true if this node is a literal usable for constant folding
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::NumberLiteral { .. }
                | ExpressionKind::StringLiteral { .. }
                | ExpressionKind::BooleanLiteral { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_output_is_untyped() {
        let expr = Expression::number(42.0);
        assert_eq!(expr.inferred_type, None);
        assert_eq!(expr.kind, ExpressionKind::NumberLiteral { value: 42.0 });
    }

    #[test]
    fn test_typed_constructor() {
        let expr = Expression::typed(
            ExpressionKind::NumberLiteral { value: 42.0 },
            ValueType::Number,
        );
        assert_eq!(expr.inferred_type, Some(ValueType::Number));
    }

    #[test]
    fn test_binary_expression() {
        // 5 + 3
        let expr = Expression::binary(
            BinaryOperator::Add,
            Expression::number(5.0),
            Expression::number(3.0),
        );

        match expr.kind {
            ExpressionKind::Binary { op, left, right } => {
                assert_eq!(op, BinaryOperator::Add);
                assert_eq!(left.kind, ExpressionKind::NumberLiteral { value: 5.0 });
                assert_eq!(right.kind, ExpressionKind::NumberLiteral { value: 3.0 });
            }
            _ => panic!("Expected Binary expression"),
        }
    }

    #[test]
    fn test_conditional_expression() {
        // if 5 > 3 then "yes" else "no"
        let expr = Expression::conditional(
            Expression::binary(
                BinaryOperator::Gt,
                Expression::number(5.0),
                Expression::number(3.0),
            ),
            Expression::string("yes"),
            Expression::string("no"),
        );

        match expr.kind {
            ExpressionKind::Conditional {
                condition,
                consequent,
                alternate,
            } => {
                assert!(matches!(condition.kind, ExpressionKind::Binary { .. }));
                assert_eq!(
                    consequent.kind,
                    ExpressionKind::StringLiteral {
                        value: "yes".to_string()
                    }
                );
                assert_eq!(
                    alternate.kind,
                    ExpressionKind::StringLiteral {
                        value: "no".to_string()
                    }
                );
            }
            _ => panic!("Expected Conditional expression"),
        }
    }

    #[test]
    fn test_market_call_expression() {
        let expr = Expression::market_call("getStockPrice", "AAPL");
        match expr.kind {
            ExpressionKind::MarketCall { function, symbol } => {
                assert_eq!(function, "getStockPrice");
                assert_eq!(symbol, "AAPL");
            }
            _ => panic!("Expected MarketCall expression"),
        }
    }

    #[test]
    fn test_is_literal() {
        assert!(Expression::number(1.0).is_literal());
        assert!(Expression::string("s").is_literal());
        assert!(Expression::boolean(true).is_literal());
        assert!(!Expression::identifier("x").is_literal());
        assert!(!Expression::array(vec![]).is_literal());
    }

    #[test]
    fn test_serde_round_trip() {
        let expr = Expression::binary(
            BinaryOperator::Mul,
            Expression::identifier("x"),
            Expression::number(2.0),
        );

        let json = serde_json::to_string(&expr).unwrap();
        assert!(json.contains("Binary"));

        let back: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, back);
    }
}
