//! Update operators applied to documents in place.
//!
//! Supported operators are `$set`, `$inc` and `$push`. Operators are applied in
//! the order they appear in the update specification. Unknown operators, and
//! operators whose operand is not an object, are ignored.

use serde_json::{Map, Number, Value};

use crate::query::compare::as_integer;

/// Applies `update_spec` to `document` in place.
///
/// Documents that are not objects are left untouched.
pub fn apply(document: &mut Value, update_spec: &Value) {
    let (Some(fields), Some(operators)) = (document.as_object_mut(), update_spec.as_object()) else {
        return;
    };

    for (operator, operations) in operators {
        let Some(operations) = operations.as_object() else {
            continue;
        };

        match operator.as_str() {
            "$set" => apply_set(fields, operations),
            "$inc" => apply_inc(fields, operations),
            "$push" => apply_push(fields, operations),
            _ => {}
        }
    }
}

fn apply_set(fields: &mut Map<String, Value>, operations: &Map<String, Value>) {
    for (field, value) in operations {
        fields.insert(field.clone(), value.clone());
    }
}

fn apply_inc(fields: &mut Map<String, Value>, operations: &Map<String, Value>) {
    for (field, delta) in operations {
        let Value::Number(delta) = delta else {
            continue;
        };

        match fields.get_mut(field) {
            None => {
                fields.insert(field.clone(), Value::Number(delta.clone()));
            }
            Some(current) => {
                if let Value::Number(number) = current {
                    let sum = add_numbers(number, delta);
                    *current = sum;
                }
            }
        }
    }
}

fn add_numbers(current: &Number, delta: &Number) -> Value {
    if let (Some(a), Some(b)) = (as_integer(current), as_integer(delta)) {
        let sum = a + b;

        if let Ok(sum) = i64::try_from(sum) {
            return Value::from(sum);
        }
        if let Ok(sum) = u64::try_from(sum) {
            return Value::from(sum);
        }
    }

    let sum = current.as_f64().unwrap_or_default() + delta.as_f64().unwrap_or_default();

    // Non-finite sums have no JSON representation and persist as null.
    Number::from_f64(sum)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn apply_push(fields: &mut Map<String, Value>, operations: &Map<String, Value>) {
    for (field, value) in operations {
        let target = fields
            .entry(field.clone())
            .or_insert_with(|| Value::Array(Vec::new()));

        if let Value::Array(items) = target {
            items.push(value.clone());
        }
    }
}
