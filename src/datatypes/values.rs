// src/datatypes/values.rs
use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;

/// Scalar property value stored on vertices.
///
/// A closed tagged variant — predicate comparison never coerces implicitly;
/// cross-type numeric equality is handled explicitly in `predicates::values_equal`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, PartialOrd)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    String(String),
    Boolean(bool),
    DateTime(NaiveDate),
    Null,
}

// Implement Eq for Value
impl Eq for Value {
    // We need this empty impl because we already have PartialEq
    // and all variants can be exactly equal except Float64,
    // which we handle specially in Hash below
}

// Implement Hash for Value
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // First hash discriminant to differentiate variants
        std::mem::discriminant(self).hash(state);

        // Then hash the contained value
        match self {
            Value::Int64(v) => v.hash(state),
            Value::Float64(v) => {
                // Special handling for NaN and -0.0
                if v.is_nan() {
                    // Hash all NaN values the same
                    f64::NAN.to_bits().hash(state)
                } else if *v == 0.0 {
                    // Handle -0.0 == 0.0
                    0.0f64.to_bits().hash(state)
                } else {
                    v.to_bits().hash(state)
                }
            },
            Value::String(v) => v.hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::DateTime(v) => v.hash(state),
            Value::Null => 0.hash(state),
        }
    }
}

/// Bare-scalar rendering (strings unquoted) — tree display keys are printed
/// with this, so nested trees render as `{Table1={Column1={}}}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::DateTime(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_nan_values_hash_identically() {
        assert_eq!(
            hash_of(&Value::Float64(f64::NAN)),
            hash_of(&Value::Float64(-f64::NAN))
        );
    }

    #[test]
    fn test_negative_zero_hashes_like_zero() {
        assert_eq!(hash_of(&Value::Float64(-0.0)), hash_of(&Value::Float64(0.0)));
    }

    #[test]
    fn test_display_is_unquoted() {
        assert_eq!(Value::from("Table1").to_string(), "Table1");
        assert_eq!(Value::from(42i64).to_string(), "42");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from("a"), Value::String("a".to_string()));
        assert_eq!(Value::from(1i64), Value::Int64(1));
        assert_eq!(Value::from(true), Value::Boolean(true));
    }
}
