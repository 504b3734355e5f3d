//! Convenient re-exports of commonly used types from shardlayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use shardlayer::prelude::*;
//! ```

pub use shardlayer_core::{
    backend::StorageBackend,
    collection::{Collection, CollectionSpec, TypedCollection},
    database::Database,
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Filter, FindOptions, FindOptionsBuilder, SortDirection, Update},
    registry::{DatabaseRegistry, RegistryConfig, RegistrySession},
    schema::Schema,
};
