//! Query language: filters, update operators, sorting and projection.
//!
//! Every part of a query is a plain JSON value, so requests decoded from the
//! wire can be passed straight through. The builders in this module produce
//! the same values for callers constructing queries in code.
//!
//! # Filter grammar
//!
//! ```text
//! filter     ::= {} | {field: scalar, ...} | {field: {op: value, ...}, ...}
//!              | {"$and": [filter, ...]} | {"$or": [filter, ...]} | {"$not": filter}
//! op         ::= $eq | $ne | $gt | $lt | $gte | $lte | $in | $nin
//! update     ::= {"$set": {...}, "$inc": {field: number, ...}, "$push": {...}}
//! sort       ::= {field: 1 | -1, ...}
//! projection ::= {any_key: field_name, ...}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shardlayer::query::{Filter, FindOptions, SortDirection, Update};
//!
//! let filter = Filter::eq("host", "web-1").and(Filter::gte("level", 3));
//! let options = FindOptions::builder()
//!     .sort("timestamp", SortDirection::Desc)
//!     .projection(["_id", "message"])
//!     .build();
//! let update = Update::new().inc("seen", 1).push("tags", "triaged");
//! ```

pub mod compare;
pub mod matcher;
pub mod projection;
pub mod sort;
pub mod update;

use serde_json::{Map, Value, json};

pub use compare::{compare_values, values_equal};
pub use matcher::{is_empty_spec, matches};
pub use projection::project;
pub use sort::{precedes, sort_documents};
pub use update::apply;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order, encoded as `1`.
    Asc,
    /// Descending order, encoded as `-1`.
    Desc,
}

impl From<SortDirection> for Value {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Value::from(1),
            SortDirection::Desc => Value::from(-1),
        }
    }
}

/// A filter expression, wrapping its JSON form.
///
/// Expressions combine with [`Expr::and`], [`Expr::or`] and [`Expr::not`], and
/// convert into the [`Value`] accepted by collection operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr(Value);

impl Expr {
    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an `$and`, the other expression is
    /// appended to its list.
    pub fn and(self, other: Expr) -> Self {
        self.combine("$and", other)
    }

    /// Combines this expression with another using logical OR.
    ///
    /// If this expression is already an `$or`, the other expression is
    /// appended to its list.
    pub fn or(self, other: Expr) -> Self {
        self.combine("$or", other)
    }

    /// Negates this expression.
    pub fn not(self) -> Self {
        Expr(json!({ "$not": self.0 }))
    }

    /// Returns the JSON form of this expression.
    pub fn into_value(self) -> Value {
        self.0
    }

    fn combine(self, operator: &str, other: Expr) -> Self {
        match self.0 {
            Value::Object(mut map) if map.len() == 1 && map.contains_key(operator) => {
                if let Some(Value::Array(list)) = map.get_mut(operator) {
                    list.push(other.0);
                }
                Expr(Value::Object(map))
            }
            value => {
                let mut map = Map::new();
                map.insert(operator.to_string(), Value::Array(vec![value, other.0]));
                Expr(Value::Object(map))
            }
        }
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        expr.0
    }
}

/// Helper for constructing filter expressions.
///
/// # Example
///
/// ```ignore
/// use shardlayer::query::Filter;
///
/// let expr = Filter::eq("host", "web-1").and(Filter::gt("level", 2));
/// ```
pub struct Filter;

impl Filter {
    fn field(field: impl Into<String>, op: &str, value: Value) -> Expr {
        let mut operators = Map::new();
        operators.insert(op.to_string(), value);

        let mut clause = Map::new();
        clause.insert(field.into(), Value::Object(operators));
        Expr(Value::Object(clause))
    }

    /// Matches every document.
    pub fn all() -> Expr {
        Expr(Value::Object(Map::new()))
    }

    /// Matches documents where the field equals the value.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Self::field(field, "$eq", value.into())
    }

    /// Matches documents where the field exists and does not equal the value.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Self::field(field, "$ne", value.into())
    }

    /// Matches documents where the field is greater than the value.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Self::field(field, "$gt", value.into())
    }

    /// Matches documents where the field is greater than or equal to the value.
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Self::field(field, "$gte", value.into())
    }

    /// Matches documents where the field is less than the value.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Self::field(field, "$lt", value.into())
    }

    /// Matches documents where the field is less than or equal to the value.
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Expr {
        Self::field(field, "$lte", value.into())
    }

    /// Matches documents where the field equals one of the values.
    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expr {
        Self::field(field, "$in", Value::Array(values.into_iter().map(Into::into).collect()))
    }

    /// Matches documents where the field exists and equals none of the values.
    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expr {
        Self::field(field, "$nin", Value::Array(values.into_iter().map(Into::into).collect()))
    }

    /// Matches documents matched by every expression.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr(json!({ "$and": exprs.into_iter().map(Expr::into_value).collect::<Vec<_>>() }))
    }

    /// Matches documents matched by at least one expression.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr(json!({ "$or": exprs.into_iter().map(Expr::into_value).collect::<Vec<_>>() }))
    }

    /// Matches documents not matched by the expression.
    pub fn not(expr: Expr) -> Expr {
        expr.not()
    }
}

/// Builder for update specifications.
#[derive(Debug, Clone, Default)]
pub struct Update {
    set: Map<String, Value>,
    inc: Map<String, Value>,
    push: Map<String, Value>,
}

impl Update {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Increments a numeric field by a delta.
    pub fn inc(mut self, field: impl Into<String>, delta: impl Into<Value>) -> Self {
        self.inc.insert(field.into(), delta.into());
        self
    }

    /// Appends a value to an array field.
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push.insert(field.into(), value.into());
        self
    }

    /// Builds the update specification, omitting unused operators.
    pub fn build(self) -> Value {
        let mut spec = Map::new();
        for (operator, operations) in [("$set", self.set), ("$inc", self.inc), ("$push", self.push)] {
            if !operations.is_empty() {
                spec.insert(operator.to_string(), Value::Object(operations));
            }
        }
        Value::Object(spec)
    }
}

impl From<Update> for Value {
    fn from(update: Update) -> Self {
        update.build()
    }
}

/// Projection, sort and limit for a `find` call.
///
/// A limit of `0` means "no limit". When a positive limit is reached, the scan
/// stops and results are returned in scan order without sorting.
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Fields to keep; an empty object keeps the whole document.
    pub projection: Value,
    /// Sort specification; an empty object keeps scan order.
    pub sort: Value,
    /// Maximum number of documents to return (`0` for all).
    pub limit: usize,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            projection: Value::Object(Map::new()),
            sort: Value::Object(Map::new()),
            limit: 0,
        }
    }
}

impl FindOptions {
    /// Creates options that return every matching document unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder for fluent construction.
    pub fn builder() -> FindOptionsBuilder {
        FindOptionsBuilder::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindOptionsBuilder {
    options: FindOptions,
    projection: Vec<Value>,
    sort: Map<String, Value>,
}

impl FindOptionsBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only the named top-level fields.
    pub fn projection<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.projection
            .extend(fields.into_iter().map(|field| Value::String(field.into())));
        self
    }

    /// Adds a sort field. Fields are compared in the order they are added.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.insert(field.into(), direction.into());
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }

    /// Builds and returns the final options.
    pub fn build(mut self) -> FindOptions {
        if !self.projection.is_empty() {
            self.options.projection = Value::Array(self.projection);
        }
        if !self.sort.is_empty() {
            self.options.sort = Value::Object(self.sort);
        }
        self.options
    }
}
