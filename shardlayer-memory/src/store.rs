//! In-memory storage implementation for shard files.

use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, BTreeSet},
    io::{Error as IoError, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};

use shardlayer_core::{
    backend::StorageBackend,
    error::{DocumentStoreError, DocumentStoreResult},
};

#[derive(Debug, Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    read_only: bool,
}

/// Thread-safe in-memory file storage.
///
/// Files and directories live in maps behind a read-write lock. It behaves
/// like a local filesystem for the operations the shard store needs: a file
/// can only be written once its parent directory exists, and a missing file
/// cannot be read.
///
/// # Thread Safety
///
/// `InMemoryStorage` is cloneable and uses an `Arc`-wrapped internal state.
/// Multiple clones of the same instance share the same files, which lets a
/// test keep a handle for inspection after moving one into a database.
///
/// # Example
///
/// ```ignore
/// use shardlayer_memory::InMemoryStorage;
/// use shardlayer_core::backend::StorageBackend;
/// use std::path::Path;
///
/// let storage = InMemoryStorage::new();
/// storage.create_dir_all(Path::new("data/logs"))?;
/// storage.write(Path::new("data/logs/1.json"), b"[]")?;
///
/// assert_eq!(storage.contents(Path::new("data/logs/1.json")), Some(b"[]".to_vec()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    tree: Arc<RwLock<Tree>>,
}

impl InMemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content of a file, if it exists.
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.tree.read().files.get(path).cloned()
    }

    /// Returns the paths of all files in lexicographic order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.tree.read().files.keys().cloned().collect()
    }

    /// Returns `true` if a directory exists at `path`.
    pub fn is_dir(&self, path: &Path) -> bool {
        self.tree.read().dirs.contains(path)
    }

    /// Removes a file. Returns `true` if it existed.
    pub fn remove(&self, path: &Path) -> bool {
        self.tree.write().files.remove(path).is_some()
    }

    /// Makes every subsequent `create_dir_all` and `write` fail with a
    /// permission error, or lifts that restriction.
    pub fn set_read_only(&self, read_only: bool) {
        self.tree.write().read_only = read_only;
    }

    /// Removes all files and directories.
    pub fn clear(&self) {
        let mut tree = self.tree.write();
        tree.dirs.clear();
        tree.files.clear();
    }
}

fn read_only_error(path: &Path) -> DocumentStoreError {
    DocumentStoreError::io(path, IoError::new(ErrorKind::PermissionDenied, "storage is read-only"))
}

impl StorageBackend for InMemoryStorage {
    fn create_dir_all(&self, path: &Path) -> DocumentStoreResult<()> {
        let mut tree = self.tree.write();

        if tree.read_only {
            return Err(read_only_error(path));
        }
        if tree.files.contains_key(path) {
            return Err(DocumentStoreError::io(path, IoError::new(ErrorKind::AlreadyExists, "a file exists at this path")));
        }

        for ancestor in path.ancestors().filter(|ancestor| !ancestor.as_os_str().is_empty()) {
            tree.dirs.insert(ancestor.to_path_buf());
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.tree.read().files.contains_key(path)
    }

    fn read(&self, path: &Path) -> DocumentStoreResult<Vec<u8>> {
        self.tree
            .read()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| DocumentStoreError::io(path, IoError::new(ErrorKind::NotFound, "file not found")))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> DocumentStoreResult<()> {
        let mut tree = self.tree.write();

        if tree.read_only {
            return Err(read_only_error(path));
        }

        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => tree.dirs.contains(parent),
            _ => true,
        };
        if !parent_exists {
            return Err(DocumentStoreError::io(path, IoError::new(ErrorKind::NotFound, "parent directory does not exist")));
        }

        tree.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
