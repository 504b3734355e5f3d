//! File-based storage backend for persistent databases.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};
use tracing::trace;

use shardlayer_core::{
    backend::StorageBackend,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Storage on the local filesystem.
///
/// Paths are used as given, so relative paths resolve against the current
/// working directory of the process.
///
/// # Durability
///
/// Writes truncate the file and write the new content in place. By default
/// the content is left to the OS to flush; [`LocalStorage::with_sync`]
/// additionally calls `File::sync_all()` after every write. Neither mode is
/// atomic: a crash during a write can leave a shard truncated.
///
/// # Example
///
/// ```no_run
/// use shardlayer_fs::LocalStorage;
/// use shardlayer_core::backend::StorageBackend;
/// use std::path::Path;
///
/// let storage = LocalStorage::new().with_sync(true);
/// storage.create_dir_all(Path::new("data/logs/events")).unwrap();
/// storage.write(Path::new("data/logs/events/1.json"), b"[]").unwrap();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage {
    sync: bool,
}

impl LocalStorage {
    /// Creates a backend that does not force writes to disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether every write is synced to disk before returning.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Returns `true` if writes are synced to disk.
    pub fn syncs_writes(&self) -> bool {
        self.sync
    }
}

impl StorageBackend for LocalStorage {
    fn create_dir_all(&self, path: &Path) -> DocumentStoreResult<()> {
        fs::create_dir_all(path).map_err(|err| DocumentStoreError::io(path, err))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> DocumentStoreResult<Vec<u8>> {
        fs::read(path).map_err(|err| DocumentStoreError::io(path, err))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> DocumentStoreResult<()> {
        let io_error = |err| DocumentStoreError::io(path, err);

        let mut file = File::create(path).map_err(io_error)?;
        file.write_all(contents).map_err(io_error)?;

        if self.sync {
            file.sync_all().map_err(io_error)?;
        }

        trace!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }
}
