//! Filter evaluation against a single document.
//!
//! A filter is a JSON object whose keys are either logical operators
//! (`$and`, `$or`, `$not`) or field names. All keys must be satisfied for the
//! document to match. A field key maps either to a scalar (equality) or to an
//! object of comparison operators.

use serde_json::{Map, Value};

use crate::query::compare::Comparable;

/// Returns `true` if the filter, projection or sort value carries no entries.
///
/// `null`, `[]` and `{}` all count as empty.
pub fn is_empty_spec(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(values) => values.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Returns `true` if `document` satisfies `filter`.
///
/// An empty filter matches every document; any other filter that is not an
/// object matches nothing.
pub fn matches(document: &Value, filter: &Value) -> bool {
    DocumentEvaluator::new(document).evaluate(filter)
}

/// Evaluates filters against one document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Value,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    pub fn evaluate(&self, filter: &Value) -> bool {
        if is_empty_spec(filter) {
            return true;
        }

        let Some(clauses) = filter.as_object() else {
            return false;
        };

        clauses
            .iter()
            .all(|(key, condition)| self.visit_clause(key, condition))
    }

    fn visit_clause(&self, key: &str, condition: &Value) -> bool {
        match key {
            "$and" => self.visit_and(condition),
            "$or" => self.visit_or(condition),
            "$not" => self.visit_not(condition),
            _ => match condition {
                Value::Object(operators) => self.visit_operators(key, operators),
                // Array conditions place no constraint on the field.
                Value::Array(_) => true,
                scalar => self.visit_eq(key, scalar),
            },
        }
    }

    fn visit_and(&self, condition: &Value) -> bool {
        match condition.as_array() {
            Some(filters) => filters.iter().all(|filter| self.evaluate(filter)),
            None => false,
        }
    }

    fn visit_or(&self, condition: &Value) -> bool {
        match condition.as_array() {
            Some(filters) => filters.iter().any(|filter| self.evaluate(filter)),
            None => false,
        }
    }

    fn visit_not(&self, condition: &Value) -> bool {
        !self.evaluate(condition)
    }

    fn field(&self, field: &str) -> Option<&'a Value> {
        self.document
            .as_object()
            .and_then(|map| map.get(field))
    }

    fn visit_eq(&self, field: &str, expected: &Value) -> bool {
        match self.field(field) {
            Some(value) => Comparable::from(value) == Comparable::from(expected),
            None => false,
        }
    }

    fn visit_operators(&self, field: &str, operators: &Map<String, Value>) -> bool {
        let Some(value) = self.field(field) else {
            return false;
        };
        let left = Comparable::from(value);

        operators.iter().all(|(op, operand)| {
            let right = Comparable::from(operand);

            match op.as_str() {
                "$eq" => left == right,
                "$ne" => left != right,
                "$gt" => left > right,
                "$lt" => left < right,
                "$gte" => left >= right,
                "$lte" => left <= right,
                "$in" => match operand.as_array() {
                    Some(items) => items.iter().any(|item| left == Comparable::from(item)),
                    None => false,
                },
                "$nin" => match operand.as_array() {
                    Some(items) => !items.iter().any(|item| left == Comparable::from(item)),
                    None => false,
                },
                _ => true,
            }
        })
    }
}
