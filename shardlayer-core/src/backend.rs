//! Filesystem abstraction for shard storage.
//!
//! The shard store never touches the disk directly: every directory creation,
//! existence probe, read and write goes through a [`StorageBackend`]. Backends
//! are opaque whole-file stores. They know nothing about shards, documents or
//! JSON.
//!
//! # Implementors
//!
//! - `shardlayer_fs::LocalStorage` - files on the local filesystem
//! - `shardlayer_memory::InMemoryStorage` - for tests and ephemeral databases
//!
//! # Example
//!
//! ```ignore
//! use shardlayer::backend::StorageBackend;
//! use shardlayer::memory::InMemoryStorage;
//! use std::path::Path;
//!
//! let storage = InMemoryStorage::new();
//! storage.create_dir_all(Path::new("data/logs/events"))?;
//! storage.write(Path::new("data/logs/events/1.json"), b"[]")?;
//! assert!(storage.exists(Path::new("data/logs/events/1.json")));
//! ```

use std::{fmt::Debug, path::Path, sync::Arc};

use crate::error::DocumentStoreResult;

/// Whole-file storage operations required by the shard store.
///
/// # Invariants
///
/// - `write` replaces the entire file content (truncate, then write)
/// - `read` returns exactly the bytes of the last successful `write`
/// - `write` does not need to be atomic; a failed write may leave the file
///   truncated or partially written
///
/// # Thread Safety
///
/// Backends must be `Send + Sync`. They are not required to make sequences of
/// calls atomic: callers serialize whole operations themselves (see
/// [`DatabaseRegistry`](crate::registry::DatabaseRegistry)).
pub trait StorageBackend: Send + Sync + Debug {
    /// Creates a directory and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> DocumentStoreResult<()>;

    /// Returns `true` if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> DocumentStoreResult<Vec<u8>>;

    /// Writes `contents` to a file, creating it or truncating any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    fn write(&self, path: &Path, contents: &[u8]) -> DocumentStoreResult<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn create_dir_all(&self, path: &Path) -> DocumentStoreResult<()> {
        (**self).create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> DocumentStoreResult<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> DocumentStoreResult<()> {
        (**self).write(path, contents)
    }
}
