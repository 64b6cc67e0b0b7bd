// SPDX-License-Identifier: MIT OR Apache-2.0

// src/core/event/value.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The possible attribute values carried by an event.
///
/// Mirrors the attribute `Type` enum in `query_api::definition`; `Null`
/// represents an explicitly absent value.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    #[default]
    Null,
}

impl AttributeValue {
    pub fn as_string(&self) -> Option<&String> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn get_type(&self) -> crate::query_api::definition::attribute::Type {
        use crate::query_api::definition::attribute::Type;
        match self {
            AttributeValue::String(_) => Type::STRING,
            AttributeValue::Int(_) => Type::INT,
            AttributeValue::Long(_) => Type::LONG,
            AttributeValue::Float(_) => Type::FLOAT,
            AttributeValue::Double(_) => Type::DOUBLE,
            AttributeValue::Bool(_) => Type::BOOL,
            AttributeValue::Null => Type::OBJECT,
        }
    }

    /// Numeric view used by comparison executors; strings do not coerce.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(i) => Some(*i as f64),
            AttributeValue::Long(l) => Some(*l as f64),
            AttributeValue::Float(f) => Some(*f as f64),
            AttributeValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Long(l) => write!(f, "{l}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Double(v) => write!(f, "{v}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_concatenates_into_keys() {
        let parts = [
            AttributeValue::String("IBM".to_string()),
            AttributeValue::Int(7),
            AttributeValue::Null,
        ];
        let key: String = parts.iter().map(|v| v.to_string()).collect();
        assert_eq!(key, "IBM7null");
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(AttributeValue::Int(3).to_number(), Some(3.0));
        assert_eq!(AttributeValue::Long(-2).to_number(), Some(-2.0));
        assert_eq!(AttributeValue::String("3".into()).to_number(), None);
        assert_eq!(AttributeValue::Null.to_number(), None);
    }
}
