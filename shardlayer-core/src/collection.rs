//! Collections: CRUD operations over a collection's shards.
//!
//! - [`CollectionSpec`] - owned description of a collection (name, directory, capacity, structure)
//! - [`Collection`] - untyped view operating on JSON documents
//! - [`TypedCollection`] - typed view for a specific [`Document`] type
//!
//! All operations scan shards in ascending number order and documents in file
//! order ("scan order"). They are blocking and unsynchronized: the duplicate
//! `_id` check in [`Collection::insert`] and the read-then-rewrite cycle of
//! updates and deletes are not atomic, so callers must serialize every
//! operation on a database (see [`DatabaseRegistry`](crate::registry::DatabaseRegistry)).
//!
//! # Example
//!
//! ```ignore
//! use serde_json::json;
//!
//! let events = database.get_collection("events")?;
//! events.insert(json!({"_id": "e1", "host": "web-1", "level": 3}))?;
//!
//! let noisy = events.find(&json!({"level": {"$gte": 3}}), &json!({}), &json!({"level": -1}), 0);
//! events.update_many(&json!({"host": "web-1"}), &json!({"$set": {"triaged": true}}))?;
//! ```

use serde_json::{Map, Value};
use std::{
    collections::HashSet,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    backend::StorageBackend,
    document::{Document, DocumentExt, ID_FIELD, require_id},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{FindOptions, apply, is_empty_spec, matches, project, sort_documents},
    shard::ShardStore,
};

/// Owned description of a collection declared by a schema.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    name: String,
    path: PathBuf,
    tuples_limit: usize,
    structure: Value,
}

impl CollectionSpec {
    /// Describes collection `name` stored under `db_path/name/`.
    pub fn new(name: impl Into<String>, db_path: &Path, tuples_limit: usize, structure: Value) -> Self {
        let name = name.into();
        let path = db_path.join(&name);

        Self { name, path, tuples_limit, structure }
    }

    /// Returns the name of the collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the maximum number of documents per shard.
    pub fn tuples_limit(&self) -> usize {
        self.tuples_limit
    }

    /// Returns the structure hint declared by the schema. It is never
    /// checked against documents.
    pub fn structure(&self) -> &Value {
        &self.structure
    }
}

/// An untyped collection bound to a storage backend.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the collection description and backend reference
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<'a, B: StorageBackend> {
    spec: &'a CollectionSpec,
    backend: &'a B,
}

impl<'a, B: StorageBackend> Collection<'a, B> {
    /// Creates a collection view over a backend.
    pub fn new(spec: &'a CollectionSpec, backend: &'a B) -> Self {
        Self { spec, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Returns the collection directory.
    pub fn path(&self) -> &Path {
        self.spec.path()
    }

    /// Returns the maximum number of documents per shard.
    pub fn tuples_limit(&self) -> usize {
        self.spec.tuples_limit()
    }

    /// Returns the structure hint declared by the schema.
    pub fn structure(&self) -> &Value {
        self.spec.structure()
    }

    /// Returns the shard store of this collection.
    pub fn shards(&self) -> ShardStore<'a, B> {
        ShardStore::new(self.spec.path(), self.backend)
    }

    /// Returns the paths of all shards in order.
    pub fn shard_paths(&self) -> Vec<PathBuf> {
        self.shards().shard_paths()
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards().shard_count()
    }

    /// Returns a typed view of this collection.
    pub fn typed<D: Document>(&self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(Collection::new(self.spec, self.backend))
    }

    /// Inserts a document.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Validation`] if the document is not an object or
    ///   its `_id` is missing or not a string
    /// - [`DocumentStoreError::DocumentAlreadyExists`] if a document with the
    ///   same `_id` is stored in any shard
    /// - [`DocumentStoreError::Io`] if the target shard cannot be written
    pub fn insert(&self, document: Value) -> DocumentStoreResult<()> {
        let id = require_id(&document)?.to_string();

        if self.contains_id(&id) {
            return Err(DocumentStoreError::DocumentAlreadyExists(id, self.name().to_string()));
        }

        let shard = self
            .shards()
            .append(document, self.tuples_limit())?;

        debug!(collection = self.name(), id = %id, shard, "inserted document");
        Ok(())
    }

    /// Inserts a batch of documents.
    ///
    /// The whole batch is validated first: every document needs a non-empty
    /// string `_id`, unique within the batch and not yet stored. Documents are
    /// then inserted one by one. If an insert fails after validation, the
    /// documents inserted before it stay stored.
    ///
    /// Returns the number of inserted documents.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Collection::insert`]; validation errors
    /// leave the collection unchanged.
    pub fn insert_many(&self, documents: Vec<Value>) -> DocumentStoreResult<usize> {
        let mut ids = HashSet::with_capacity(documents.len());

        for document in &documents {
            let id = require_id(document)?;

            if id.is_empty() {
                return Err(DocumentStoreError::Validation(format!("{ID_FIELD} must not be empty")));
            }
            if !ids.insert(id) || self.contains_id(id) {
                return Err(DocumentStoreError::DocumentAlreadyExists(id.to_string(), self.name().to_string()));
            }
        }

        let count = documents.len();
        for document in documents {
            self.insert(document)?;
        }

        Ok(count)
    }

    /// Finds documents matching `filter`.
    ///
    /// Matching documents are projected and collected in scan order. If
    /// `limit` is positive, the scan stops as soon as `limit` documents are
    /// collected and they are returned in scan order, without sorting.
    /// Otherwise the complete result is sorted by `sort` (when not empty).
    ///
    /// Shards that cannot be parsed contribute no documents.
    pub fn find(&self, filter: &Value, projection: &Value, sort: &Value, limit: usize) -> Vec<Value> {
        let shards = self.shards();
        let mut results = Vec::new();

        for number in shards.numbers() {
            let Some(documents) = shards.read_shard(number) else {
                continue;
            };

            for document in &documents {
                if !matches(document, filter) {
                    continue;
                }

                results.push(project(document, projection));

                if limit > 0 && results.len() >= limit {
                    return results;
                }
            }
        }

        if !is_empty_spec(sort) {
            sort_documents(&mut results, sort);
        }

        results
    }

    /// Finds documents using [`FindOptions`].
    pub fn find_with(&self, filter: &Value, options: &FindOptions) -> Vec<Value> {
        self.find(filter, &options.projection, &options.sort, options.limit)
    }

    /// Finds the first document in scan order matching `filter`.
    ///
    /// Equivalent to `find` with a limit of 1, so `sort` is never applied.
    /// A match whose projection keeps no field is returned as `Some({})`,
    /// not `None`.
    pub fn find_one(&self, filter: &Value, projection: &Value, sort: &Value) -> Option<Value> {
        self.find(filter, projection, sort, 1)
            .into_iter()
            .next()
    }

    /// Counts the documents matching `filter`.
    pub fn count(&self, filter: &Value) -> usize {
        let shards = self.shards();

        shards
            .numbers()
            .filter_map(|number| shards.read_shard(number))
            .map(|documents| documents.iter().filter(|doc| matches(doc, filter)).count())
            .sum()
    }

    /// Applies `update` to the first document in scan order matching `filter`.
    ///
    /// Returns `1` if a document was updated, `0` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard holding the document cannot be rewritten.
    pub fn update_one(&self, filter: &Value, update: &Value) -> DocumentStoreResult<usize> {
        let shards = self.shards();

        for number in shards.numbers() {
            let Some(mut documents) = shards.read_shard(number) else {
                continue;
            };

            if let Some(document) = documents.iter_mut().find(|doc| matches(doc, filter)) {
                apply(document, update);
                shards.write_shard(number, &documents)?;

                debug!(collection = self.name(), shard = number, "updated one document");
                return Ok(1);
            }
        }

        Ok(0)
    }

    /// Applies `update` to every document matching `filter`.
    ///
    /// Only shards holding at least one match are rewritten. Returns the
    /// number of updated documents.
    ///
    /// # Errors
    ///
    /// Returns an error if a shard cannot be rewritten. Shards rewritten
    /// before the failure keep their changes.
    pub fn update_many(&self, filter: &Value, update: &Value) -> DocumentStoreResult<usize> {
        let shards = self.shards();
        let mut updated = 0;

        for number in shards.numbers() {
            let Some(mut documents) = shards.read_shard(number) else {
                continue;
            };

            let mut changed = 0;
            for document in documents.iter_mut().filter(|doc| matches(doc, filter)) {
                apply(document, update);
                changed += 1;
            }

            if changed > 0 {
                shards.write_shard(number, &documents)?;
                updated += changed;
            }
        }

        debug!(collection = self.name(), updated, "updated documents");
        Ok(updated)
    }

    /// Deletes the first document in scan order matching `filter`.
    ///
    /// Returns `1` if a document was deleted, `0` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard holding the document cannot be rewritten.
    pub fn delete_one(&self, filter: &Value) -> DocumentStoreResult<usize> {
        let shards = self.shards();

        for number in shards.numbers() {
            let Some(mut documents) = shards.read_shard(number) else {
                continue;
            };

            if let Some(position) = documents.iter().position(|doc| matches(doc, filter)) {
                documents.remove(position);
                shards.write_shard(number, &documents)?;

                debug!(collection = self.name(), shard = number, "deleted one document");
                return Ok(1);
            }
        }

        Ok(0)
    }

    /// Deletes every document matching `filter`.
    ///
    /// Remaining documents keep their order, and emptied shards stay in
    /// place. Returns the number of deleted documents.
    ///
    /// # Errors
    ///
    /// Returns an error if a shard cannot be rewritten. Shards rewritten
    /// before the failure keep their changes.
    pub fn delete_many(&self, filter: &Value) -> DocumentStoreResult<usize> {
        let shards = self.shards();
        let mut deleted = 0;

        for number in shards.numbers() {
            let Some(mut documents) = shards.read_shard(number) else {
                continue;
            };

            let before = documents.len();
            documents.retain(|doc| !matches(doc, filter));
            let removed = before - documents.len();

            if removed > 0 {
                shards.write_shard(number, &documents)?;
                deleted += removed;
            }
        }

        debug!(collection = self.name(), deleted, "deleted documents");
        Ok(deleted)
    }

    fn contains_id(&self, id: &str) -> bool {
        let mut filter = Map::new();
        filter.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let empty = Value::Object(Map::new());
        self.find_one(&Value::Object(filter), &empty, &empty).is_some()
    }
}

/// A typed view of a collection for a specific document type.
///
/// Documents are converted to and from JSON with serde. Filters and updates
/// are still plain JSON values.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StorageBackend, D: Document> {
    inner: Collection<'a, B>,
    _marker: PhantomData<D>,
}

impl<'a, B: StorageBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(inner: Collection<'a, B>) -> Self {
        Self { inner, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the untyped view of this collection.
    pub fn untyped(&self) -> &Collection<'a, B> {
        &self.inner
    }

    /// Converts this typed collection to a different document type.
    pub fn typed<T: Document>(self) -> TypedCollection<'a, B, T> {
        TypedCollection::new(self.inner)
    }

    /// Inserts a document. See [`Collection::insert`].
    ///
    /// # Errors
    ///
    /// Also fails if the document cannot be serialized, or with
    /// [`DocumentStoreError::Validation`] if its serialized `_id` differs from
    /// [`Document::id`].
    pub fn insert(&self, document: &D) -> DocumentStoreResult<()> {
        self.inner.insert(Self::to_stored(document)?)
    }

    /// Inserts a batch of documents. See [`Collection::insert_many`].
    ///
    /// # Errors
    ///
    /// Also fails if a document cannot be serialized or its serialized `_id`
    /// differs from [`Document::id`]. Nothing is inserted in that case.
    pub fn insert_many(&self, documents: &[D]) -> DocumentStoreResult<usize> {
        let values = documents
            .iter()
            .map(Self::to_stored)
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        self.inner.insert_many(values)
    }

    fn to_stored(document: &D) -> DocumentStoreResult<Value> {
        let value = document.to_json()?;

        let stored_id = require_id(&value)?;
        if stored_id != document.id() {
            return Err(DocumentStoreError::Validation(format!(
                "{ID_FIELD} {stored_id:?} does not match document id {:?}",
                document.id()
            )));
        }

        Ok(value)
    }

    /// Finds documents matching `filter`. See [`Collection::find`].
    ///
    /// # Errors
    ///
    /// Fails if a matching document cannot be deserialized into `D`.
    pub fn find(&self, filter: &Value, options: &FindOptions) -> DocumentStoreResult<Vec<D>> {
        self.inner
            .find_with(filter, options)
            .into_iter()
            .map(D::from_json)
            .collect()
    }

    /// Finds the first document in scan order matching `filter`.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be deserialized into `D`.
    pub fn find_one(&self, filter: &Value) -> DocumentStoreResult<Option<D>> {
        let empty = Value::Object(Map::new());

        self.inner
            .find_one(filter, &empty, &empty)
            .map(D::from_json)
            .transpose()
    }

    /// Finds a document by its `_id`.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be deserialized into `D`.
    pub fn get(&self, id: &str) -> DocumentStoreResult<Option<D>> {
        let mut filter = Map::new();
        filter.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        self.find_one(&Value::Object(filter))
    }

    /// See [`Collection::update_one`].
    pub fn update_one(&self, filter: &Value, update: &Value) -> DocumentStoreResult<usize> {
        self.inner.update_one(filter, update)
    }

    /// See [`Collection::update_many`].
    pub fn update_many(&self, filter: &Value, update: &Value) -> DocumentStoreResult<usize> {
        self.inner.update_many(filter, update)
    }

    /// See [`Collection::delete_one`].
    pub fn delete_one(&self, filter: &Value) -> DocumentStoreResult<usize> {
        self.inner.delete_one(filter)
    }

    /// See [`Collection::delete_many`].
    pub fn delete_many(&self, filter: &Value) -> DocumentStoreResult<usize> {
        self.inner.delete_many(filter)
    }
}
