//! Ordering of query results by a sort specification.
//!
//! A sort specification is a JSON object mapping field names to a direction:
//! `1` for ascending, `-1` for descending. Fields are consulted in the order
//! they appear in the specification.

use serde_json::Value;
use std::cmp::Ordering;

use crate::query::compare::compare_values;

/// Returns `true` if `a` should be ordered before `b` under `sort_spec`.
///
/// A document that has a sort field precedes one that lacks it. Values that
/// cannot be ordered against each other tie on that field.
pub fn precedes(a: &Value, b: &Value, sort_spec: &Value) -> bool {
    let Some(rules) = sort_spec.as_object() else {
        return false;
    };

    for (field, direction) in rules {
        let left = a.as_object().and_then(|map| map.get(field));
        let right = b.as_object().and_then(|map| map.get(field));

        let (left, right) = match (left, right) {
            (None, None) => continue,
            (None, Some(_)) => return false,
            (Some(_), None) => return true,
            (Some(left), Some(right)) => (left, right),
        };

        match compare_values(left, right) {
            Some(Ordering::Less) => return is_direction(direction, 1),
            Some(Ordering::Greater) => return is_direction(direction, -1),
            _ => continue,
        }
    }

    false
}

fn is_direction(direction: &Value, expected: i64) -> bool {
    direction.as_i64() == Some(expected)
        || direction.as_f64() == Some(expected as f64)
}

/// Sorts documents in place by `sort_spec`.
///
/// The sort is stable: documents that tie on every field keep their
/// relative order.
pub fn sort_documents(documents: &mut Vec<Value>, sort_spec: &Value) {
    if documents.len() < 2 {
        return;
    }

    let sorted = merge_sort(std::mem::take(documents), sort_spec);
    *documents = sorted;
}

// `precedes` need not be a total order (unordered values tie), and
// `slice::sort_by` may panic on such comparators.
fn merge_sort(mut documents: Vec<Value>, sort_spec: &Value) -> Vec<Value> {
    if documents.len() < 2 {
        return documents;
    }

    let right = documents.split_off(documents.len() / 2);
    let left = merge_sort(documents, sort_spec);
    let right = merge_sort(right, sort_spec);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => precedes(r, l, sort_spec),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };

        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged
}
