//! Runtime value types
//!
//! `Value` covers everything the evaluator and the market-data collaborator
//! can produce. The evaluator itself only yields numbers, strings and
//! booleans; `Null` is the collaborator's "no data" result, and
//! `Array`/`Object` carry structured quote data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No data
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (f64, handles both int and float)
    Number(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object (key-value map)
    Object(HashMap<String, Value>),
}

impl Value {
    /// Human-readable name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, map[*key])?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Number(42.0), Value::Number(42.0));
        assert_ne!(Value::Bool(true), Value::Bool(false));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::String("s".to_string()).type_name(), "string");
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn test_display_number_drops_trailing_zero() {
        assert_eq!(Value::Number(11.0).to_string(), "11");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_serde_untagged() {
        let val = Value::Object({
            let mut map = HashMap::new();
            map.insert("price".to_string(), Value::Number(187.5));
            map.insert("symbol".to_string(), Value::String("AAPL".to_string()));
            map
        });

        let json = serde_json::to_string(&val).unwrap();
        assert!(json.contains("187.5"));
        assert!(json.contains("AAPL"));

        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(val, back);
    }
}
