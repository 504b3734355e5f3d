#![allow(dead_code)]

use serde_json::{Value, json};
use shardlayer::{
    Database, Schema,
    backend::StorageBackend,
    error::{DocumentStoreError, DocumentStoreResult},
    memory::InMemoryStorage,
};
use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

pub const DATA_ROOT: &str = "data";
pub const DB_NAME: &str = "logs";

pub fn schema(tuples_limit: usize) -> Schema {
    Schema::from_value(json!({
        "name": "logs",
        "tuples_limit": tuples_limit,
        "structure": {
            "events": {"host": "string", "level": "int"},
            "alerts": {}
        }
    }))
    .unwrap()
}

/// Opens the `logs` database in memory and returns a handle to its storage.
pub fn memory_database(tuples_limit: usize) -> (InMemoryStorage, Database<InMemoryStorage>) {
    let storage = InMemoryStorage::new();
    let database = Database::open(storage.clone(), schema(tuples_limit), DB_NAME, DATA_ROOT).unwrap();

    (storage, database)
}

pub fn shard_path(collection: &str, number: usize) -> PathBuf {
    Path::new(DATA_ROOT)
        .join(DB_NAME)
        .join(collection)
        .join(format!("{number}.json"))
}

/// Parses a shard file held by an in-memory storage.
pub fn read_shard(storage: &InMemoryStorage, collection: &str, number: usize) -> Value {
    let bytes = storage
        .contents(&shard_path(collection, number))
        .unwrap_or_else(|| panic!("shard {number} of {collection} does not exist"));

    serde_json::from_slice(&bytes).unwrap()
}

pub fn ids(documents: &[Value]) -> Vec<&str> {
    documents
        .iter()
        .map(|doc| doc["_id"].as_str().unwrap())
        .collect()
}

pub fn empty() -> Value {
    json!({})
}

/// Storage that accepts a fixed number of writes, then fails every write.
#[derive(Debug, Clone)]
pub struct FailingWrites {
    inner: InMemoryStorage,
    remaining: Arc<AtomicUsize>,
}

impl FailingWrites {
    pub fn new(inner: InMemoryStorage, allowed_writes: usize) -> Self {
        Self { inner, remaining: Arc::new(AtomicUsize::new(allowed_writes)) }
    }
}

impl StorageBackend for FailingWrites {
    fn create_dir_all(&self, path: &Path) -> DocumentStoreResult<()> {
        self.inner.create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> DocumentStoreResult<Vec<u8>> {
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> DocumentStoreResult<()> {
        let allowed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if !allowed {
            return Err(DocumentStoreError::io(path, io::Error::other("write budget exhausted")));
        }
        self.inner.write(path, contents)
    }
}
