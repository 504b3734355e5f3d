//! Core traits and helpers for document representation.
//!
//! Stored documents are plain JSON objects carrying a string `_id`. This module
//! provides the `_id` accessors used by the collection layer, plus the
//! [`Document`] trait for callers that prefer working with typed structs.

use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the primary key field every stored document must carry.
pub const ID_FIELD: &str = "_id";

/// Returns the `_id` of a document, or `None` if the value is not an object
/// or its `_id` is missing or not a string.
pub fn document_id(document: &Value) -> Option<&str> {
    document
        .as_object()
        .and_then(|map| map.get(ID_FIELD))
        .and_then(Value::as_str)
}

/// Returns the `_id` of a document that is about to be stored.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Validation`] if the document is not an object,
/// has no `_id`, or its `_id` is not a string.
pub fn require_id(document: &Value) -> DocumentStoreResult<&str> {
    let map = document
        .as_object()
        .ok_or_else(|| DocumentStoreError::Validation("document must be a JSON object".to_string()))?;

    match map.get(ID_FIELD) {
        None => Err(DocumentStoreError::Validation(format!("document must contain a {ID_FIELD} field"))),
        Some(Value::String(id)) => Ok(id),
        Some(_) => Err(DocumentStoreError::Validation(format!("{ID_FIELD} must be a string"))),
    }
}

/// Core trait for typed documents stored through a
/// [`TypedCollection`](crate::collection::TypedCollection).
///
/// The type is serialized to a JSON object; it must serialize its identifier
/// under the `_id` key (for example with `#[serde(rename = "_id")]`).
///
/// # Example
///
/// ```ignore
/// use shardlayer::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Event {
///     #[serde(rename = "_id")]
///     pub id: String,
///     pub source: String,
///     pub severity: i64,
/// }
///
/// impl Document for Event {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "events"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's unique identifier.
    fn id(&self) -> &str;

    /// Returns the name of the collection this document belongs to.
    ///
    /// The collection must be declared by the database schema.
    fn collection_name() -> &'static str;
}

/// Extension trait providing JSON conversion for documents.
///
/// Automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a JSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}
