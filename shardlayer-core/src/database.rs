//! Databases: a set of collections declared by a schema.
//!
//! A [`Database`] lives in `data_root/db_name/`, with one subdirectory per
//! declared collection. Opening a database creates the missing directories and
//! an empty first shard for each collection; existing shards are left as they
//! are. The set of collections is fixed once the database is open.
//!
//! # Example
//!
//! ```ignore
//! use shardlayer::{database::Database, memory::InMemoryStorage, schema::Schema};
//! use serde_json::json;
//!
//! let schema = Schema::from_file("schema.json")?;
//! let database = Database::open(InMemoryStorage::new(), schema, "logs", "data")?;
//!
//! let events = database.get_collection("events")?;
//! events.insert(json!({"_id": "e1", "level": 2}))?;
//! ```

use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    backend::StorageBackend,
    collection::{Collection, CollectionSpec, TypedCollection},
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    schema::Schema,
    shard::ShardStore,
};

/// An open database bound to a storage backend.
///
/// # Type Parameters
///
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Database<B: StorageBackend> {
    name: String,
    base_path: PathBuf,
    schema: Schema,
    backend: B,
    collections: Vec<CollectionSpec>,
}

impl<B: StorageBackend> Database<B> {
    /// Opens database `db_name` under `data_root` with the given schema.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Validation`] if `db_name` or `data_root` is empty
    /// - [`DocumentStoreError::Io`] if a directory or first shard cannot be created
    pub fn open(backend: B, schema: Schema, db_name: &str, data_root: impl AsRef<Path>) -> DocumentStoreResult<Self> {
        let data_root = data_root.as_ref();

        if db_name.is_empty() {
            return Err(DocumentStoreError::Validation("database name must not be empty".to_string()));
        }
        if data_root.as_os_str().is_empty() {
            return Err(DocumentStoreError::Validation("data root must not be empty".to_string()));
        }

        let base_path = data_root.join(db_name);
        backend.create_dir_all(&base_path)?;

        let collections = schema
            .structure()
            .iter()
            .map(|(name, structure)| CollectionSpec::new(name, &base_path, schema.tuples_limit(), structure.clone()))
            .collect::<Vec<_>>();

        for spec in &collections {
            ShardStore::new(spec.path(), &backend).init()?;
        }

        info!(
            database = db_name,
            path = %base_path.display(),
            collections = collections.len(),
            tuples_limit = schema.tuples_limit(),
            "opened database"
        );

        Ok(Self { name: db_name.to_string(), base_path, schema, backend, collections })
    }

    /// Loads the schema descriptor at `schema_path` and opens the database.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Schema::from_file`] and [`Database::open`].
    pub fn open_with_schema_file(
        backend: B,
        schema_path: impl AsRef<Path>,
        db_name: &str,
        data_root: impl AsRef<Path>,
    ) -> DocumentStoreResult<Self> {
        let schema = Schema::from_file(schema_path)?;
        Self::open(backend, schema, db_name, data_root)
    }

    /// Returns the database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the database directory (`data_root/db_name`).
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the schema the database was opened with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the storage backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the collection names in declaration order.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections
            .iter()
            .map(CollectionSpec::name)
            .collect()
    }

    /// Returns `true` if the schema declares collection `name`.
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.iter().any(|spec| spec.name() == name)
    }

    /// Gets an untyped collection by name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionNotFound`] if the schema does
    /// not declare the collection.
    pub fn get_collection(&self, name: &str) -> DocumentStoreResult<Collection<'_, B>> {
        self.collections
            .iter()
            .find(|spec| spec.name() == name)
            .map(|spec| Collection::new(spec, &self.backend))
            .ok_or_else(|| DocumentStoreError::CollectionNotFound(name.to_string()))
    }

    /// Gets a typed collection for a document type.
    ///
    /// The collection name is determined by the document type's
    /// `collection_name()` method.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionNotFound`] if the schema does
    /// not declare the collection.
    pub fn typed_collection<D: Document>(&self) -> DocumentStoreResult<TypedCollection<'_, B, D>> {
        self.get_collection(D::collection_name())
            .map(|collection| collection.typed())
    }

    /// Iterates over all collections in declaration order.
    pub fn collections(&self) -> impl Iterator<Item = Collection<'_, B>> {
        self.collections
            .iter()
            .map(|spec| Collection::new(spec, &self.backend))
    }
}
