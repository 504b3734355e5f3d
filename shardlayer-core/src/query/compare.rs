//! Equality and ordering over JSON values.
//!
//! Filters, sorting and `$in`/`$nin` membership all compare values through
//! [`Comparable`]. Numbers compare by value whatever their representation
//! (`1 == 1.0`), strings compare bytewise, arrays compare element by element.
//! Values of different kinds are never equal and have no ordering, so every
//! ordering test between them is false instead of an error.

use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Borrowed, comparable view of a JSON value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer or floating point number
    Number(&'a Number),
    /// String value
    String(&'a str),
    /// Array of values
    Array(&'a [Value]),
    /// Object of values
    Map(&'a Map<String, Value>),
}

impl<'a> From<&'a Value> for Comparable<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Comparable::Null,
            Value::Bool(value) => Comparable::Bool(*value),
            Value::Number(value) => Comparable::Number(value),
            Value::String(value) => Comparable::String(value),
            Value::Array(values) => Comparable::Array(values),
            Value::Object(map) => Comparable::Map(map),
        }
    }
}

pub(crate) fn as_integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    match (as_integer(left), as_integer(right)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| Comparable::from(x) == Comparable::from(y))
            }
            (Comparable::Map(a), Comparable::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, x)| match b.get(key) {
                        Some(y) => Comparable::from(x) == Comparable::from(y),
                        None => false,
                    })
            }
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => Some(Ordering::Equal),
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => compare_numbers(a, b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            (Comparable::Array(a), Comparable::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match Comparable::from(x).partial_cmp(&Comparable::from(y))? {
                        Ordering::Equal => continue,
                        ordering => return Some(ordering),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            (Comparable::Map(_), Comparable::Map(_)) if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// Returns `true` if both values are equal under store semantics.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    Comparable::from(left) == Comparable::from(right)
}

/// Orders two values, or returns `None` if they cannot be ordered.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    Comparable::from(left).partial_cmp(&Comparable::from(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_across_representations() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert_eq!(compare_values(&json!(-1), &json!(u64::MAX)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Some(Ordering::Greater));
    }

    #[test]
    fn strings_compare_lexicographically() {
        assert_eq!(compare_values(&json!("abc"), &json!("abd")), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("b"), &json!("abc")), Some(Ordering::Greater));
    }

    #[test]
    fn mixed_kinds_are_neither_equal_nor_ordered() {
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!(null), &json!(false)));
        assert_eq!(compare_values(&json!(1), &json!("1")), None);
        assert_eq!(compare_values(&json!({"a": 1}), &json!({"a": 2})), None);
    }

    #[test]
    fn containers_compare_structurally() {
        assert!(values_equal(&json!([1, "x"]), &json!([1.0, "x"])));
        assert!(values_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert_eq!(compare_values(&json!([1, 2]), &json!([1, 3])), Some(Ordering::Less));
        assert_eq!(compare_values(&json!([1, 2]), &json!([1])), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!({"a": 1}), &json!({"a": 1})), Some(Ordering::Equal));
    }
}
