//! The inferred-type tag attached to expressions during semantic analysis

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type tag inferred for an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    String,
    Boolean,
    Array,
    Object,
    /// Unresolved or mixed; everything outside the inference table
    Any,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Any => "any",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ValueType::Number.to_string(), "number");
        assert_eq!(ValueType::Any.to_string(), "any");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ValueType::Boolean).unwrap();
        assert_eq!(json, r#""boolean""#);
    }
}
