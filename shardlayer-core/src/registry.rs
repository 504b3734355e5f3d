//! Process-wide access to databases.
//!
//! Collections perform no synchronization of their own, so every operation on
//! a database must be serialized by the caller. [`DatabaseRegistry`] is the
//! object that does this: it holds all open databases behind a single async
//! mutex, and a [`RegistrySession`] is the only way to reach them. Holding a
//! session means holding the lock, so store operations never interleave.
//!
//! Databases are opened lazily on first use, from the schema file and data
//! root of the [`RegistryConfig`], and stay open for the registry's lifetime.
//!
//! # Example
//!
//! ```ignore
//! use shardlayer::{fs::LocalStorage, registry::{DatabaseRegistry, RegistryConfig}};
//! use serde_json::json;
//!
//! let registry = DatabaseRegistry::new(RegistryConfig::default(), LocalStorage::new());
//!
//! let mut session = registry.session().await;
//! let logs = session.database("logs")?;
//! logs.get_collection("events")?.insert(json!({"_id": "e1"}))?;
//! ```

use mea::mutex::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
    path::PathBuf,
};

use crate::{
    backend::StorageBackend,
    database::Database,
    error::{DocumentStoreError, DocumentStoreResult},
};

const DEFAULT_SCHEMA_PATH: &str = "schema.json";
const DEFAULT_DATA_ROOT: &str = "data";

/// Where the registry finds the schema descriptor and stores databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Path of the schema descriptor shared by all databases.
    pub schema_path: PathBuf,
    /// Directory holding one subdirectory per database.
    pub data_root: PathBuf,
}

impl RegistryConfig {
    /// Creates a configuration from a schema path and a data root.
    pub fn new(schema_path: impl Into<PathBuf>, data_root: impl Into<PathBuf>) -> Self {
        Self { schema_path: schema_path.into(), data_root: data_root.into() }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_PATH, DEFAULT_DATA_ROOT)
    }
}

/// Owns every open database and serializes access to them.
///
/// # Type Parameters
///
/// * `B` - The storage backend type, cloned into each opened database
pub struct DatabaseRegistry<B: StorageBackend + Clone> {
    config: RegistryConfig,
    backend: B,
    databases: Mutex<HashMap<String, Database<B>>>,
}

impl<B: StorageBackend + Clone> DatabaseRegistry<B> {
    /// Creates a registry with no open databases.
    pub fn new(config: RegistryConfig, backend: B) -> Self {
        Self { config, backend, databases: Mutex::new(HashMap::new()) }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Waits for exclusive access to the databases.
    ///
    /// The lock is released when the returned session is dropped.
    pub async fn session(&self) -> RegistrySession<'_, B> {
        RegistrySession { config: &self.config, backend: &self.backend, databases: self.databases.lock().await }
    }
}

impl<B: StorageBackend + Clone> fmt::Debug for DatabaseRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseRegistry")
            .field("config", &self.config)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to the databases of a [`DatabaseRegistry`].
pub struct RegistrySession<'a, B: StorageBackend + Clone> {
    config: &'a RegistryConfig,
    backend: &'a B,
    databases: MutexGuard<'a, HashMap<String, Database<B>>>,
}

impl<B: StorageBackend + Clone> RegistrySession<'_, B> {
    /// Returns database `name`, opening it on first use.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Validation`] if `name` is empty or the schema is invalid
    /// - [`DocumentStoreError::Io`] if the schema file cannot be read or the
    ///   database directories cannot be created
    /// - [`DocumentStoreError::Serialization`] if the schema file is not valid JSON
    ///
    /// A database that failed to open is not cached; the next call retries.
    pub fn database(&mut self, name: &str) -> DocumentStoreResult<&Database<B>> {
        if name.is_empty() {
            return Err(DocumentStoreError::Validation("database name must not be empty".to_string()));
        }

        let database = match self.databases.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Database::open_with_schema_file(
                self.backend.clone(),
                &self.config.schema_path,
                name,
                &self.config.data_root,
            )?),
        };

        Ok(database)
    }

    /// Returns `true` if database `name` has already been opened.
    pub fn is_open(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Returns the names of the opened databases, sorted.
    pub fn open_databases(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.databases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<B: StorageBackend + Clone> fmt::Debug for RegistrySession<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrySession")
            .field("config", &self.config)
            .field("open_databases", &self.open_databases())
            .finish_non_exhaustive()
    }
}
