//! Database schema descriptors.
//!
//! A schema is loaded once from a JSON descriptor:
//!
//! ```json
//! {
//!     "name": "logs",
//!     "tuples_limit": 1000,
//!     "structure": {
//!         "events": {"host": "string", "level": "int"},
//!         "alerts": {}
//!     }
//! }
//! ```
//!
//! `structure` maps collection names to structure hints. The hints are kept
//! as-is and never checked against documents. Collections keep the order in
//! which they are declared.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The descriptor as written on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawSchema {
    name: Option<Value>,
    tuples_limit: Option<Value>,
    structure: Option<Value>,
}

/// A validated database schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    tuples_limit: usize,
    structure: Map<String, Value>,
}

impl Schema {
    /// Creates a schema from already validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Validation`] if `tuples_limit` is zero or
    /// a collection name is empty.
    pub fn new(name: impl Into<String>, tuples_limit: usize, structure: Map<String, Value>) -> DocumentStoreResult<Self> {
        if tuples_limit == 0 {
            return Err(DocumentStoreError::Validation("tuples_limit must be at least 1".to_string()));
        }
        if structure.keys().any(String::is_empty) {
            return Err(DocumentStoreError::Validation("collection names must not be empty".to_string()));
        }

        Ok(Self { name: name.into(), tuples_limit, structure })
    }

    /// Parses and validates a schema descriptor from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Serialization`] if the text is not valid
    /// JSON and [`DocumentStoreError::Validation`] if the descriptor is invalid.
    pub fn from_json(text: &str) -> DocumentStoreResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Validates a schema descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Validation`] if the descriptor is not an
    /// object, `name` is not a string, `tuples_limit` is not an integer of at
    /// least 1, or `structure` is not an object with non-empty keys.
    pub fn from_value(value: Value) -> DocumentStoreResult<Self> {
        if !value.is_object() {
            return Err(DocumentStoreError::Validation("schema must be a JSON object".to_string()));
        }

        let raw: RawSchema = serde_json::from_value(value)?;

        let name = match raw.name {
            Some(Value::String(name)) => name,
            _ => return Err(DocumentStoreError::Validation("schema name must be a string".to_string())),
        };

        let tuples_limit = raw
            .tuples_limit
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|limit| *limit >= 1)
            .ok_or_else(|| DocumentStoreError::Validation("tuples_limit must be an integer of at least 1".to_string()))?;

        let structure = match raw.structure {
            Some(Value::Object(structure)) => structure,
            _ => return Err(DocumentStoreError::Validation("schema structure must be an object".to_string())),
        };

        Self::new(name, tuples_limit, structure)
    }

    /// Reads and validates a schema descriptor file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Io`] if the file cannot be read, plus the
    /// errors of [`Schema::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> DocumentStoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| DocumentStoreError::io(path, err))?;

        Self::from_json(&text)
    }

    /// Returns the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the maximum number of documents per shard.
    pub fn tuples_limit(&self) -> usize {
        self.tuples_limit
    }

    /// Returns the declared collections and their structure hints.
    pub fn structure(&self) -> &Map<String, Value> {
        &self.structure
    }

    /// Iterates over the declared collection names in declaration order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.structure.keys().map(String::as_str)
    }
}
