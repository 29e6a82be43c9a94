// src/graph/predicates.rs
use crate::datatypes::values::Value;

/// Scalar predicate applied to one property value.
///
/// `Within`/`Without` carry their candidate sets as plain vectors; membership
/// is checked with [`values_equal`] so cross-type numerics behave the same
/// as direct equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(Value),
    NotEquals(Value),
    Within(Vec<Value>),
    Without(Vec<Value>),
}

impl Predicate {
    pub fn eq(value: impl Into<Value>) -> Self {
        Predicate::Equals(value.into())
    }

    pub fn neq(value: impl Into<Value>) -> Self {
        Predicate::NotEquals(value.into())
    }

    pub fn within<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::Within(values.into_iter().map(Into::into).collect())
    }

    pub fn without<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::Without(values.into_iter().map(Into::into).collect())
    }
}

/// Evaluate `predicate` against a property value.
///
/// A missing property (`None`) never matches — for every variant, including
/// the negated ones. A filter on an unset key silently excludes the element;
/// it is not an error condition. Pure function, no graph access.
pub fn evaluate(actual: Option<&Value>, predicate: &Predicate) -> bool {
    let Some(value) = actual else {
        return false;
    };
    match predicate {
        Predicate::Equals(target) => values_equal(value, target),
        Predicate::NotEquals(target) => !values_equal(value, target),
        Predicate::Within(targets) => targets.iter().any(|t| values_equal(value, t)),
        Predicate::Without(targets) => !targets.iter().any(|t| values_equal(value, t)),
    }
}

/// Check equality with cross-type numeric comparison support.
/// Handles Int64 <-> Float64 so integer-valued properties match float
/// predicates and vice versa.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    // Direct equality check first
    if a == b {
        return true;
    }
    // Handle numeric cross-type comparison
    match (a, b) {
        (Value::Int64(i), Value::Float64(f)) => (*i as f64) == *f,
        (Value::Float64(f), Value::Int64(i)) => *f == (*i as f64),
        _ => false,
    }
}
