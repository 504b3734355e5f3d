//! Error types and result types for document store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.
//! Shard files that fail to parse during a scan are not reported through this
//! type: the scan treats them as empty and moves on.

use serde_json::Error as SerdeJsonError;
use std::path::PathBuf;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// A document, schema descriptor or name failed validation.
    ///
    /// Raised before anything is written, so the triggering operation has no effect.
    #[error("Validation error: {0}")]
    Validation(String),
    /// A document with the given `_id` already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// The requested collection is not declared by the database schema.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// A directory or file could not be created, read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path the failing operation was applied to.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Serialization/deserialization error when converting to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DocumentStoreError {
    /// Wraps an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocumentStoreError::Io { path: path.into(), source }
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
