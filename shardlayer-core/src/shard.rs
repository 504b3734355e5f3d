//! Shard file management for a single collection.
//!
//! A collection's documents live in numbered shard files inside the
//! collection directory:
//!
//! ```text
//! <data_root>/<db_name>/<collection>/
//! ├─ 1.json      # pretty-printed JSON array of documents
//! ├─ 2.json
//! └─ ...
//! ```
//!
//! Shard numbers are contiguous from 1. The last shard is found by probing
//! `1.json`, `2.json`, ... until the first missing file. Each shard holds at
//! most `tuples_limit` documents; new documents always go to the last shard,
//! and a new shard is created once it is full. Shards are never removed,
//! merged or renumbered, even when deletes empty them.
//!
//! Every mutation reads a whole shard, changes it in memory and rewrites the
//! file. There is no journal and no atomic rename, so a crash during a write
//! can leave a shard truncated. A shard that does not parse as a JSON array
//! is treated as holding no documents.

use serde::Serialize;
use serde_json::{Serializer, Value, ser::PrettyFormatter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{backend::StorageBackend, error::DocumentStoreResult};

const SHARD_EXTENSION: &str = "json";
const SHARD_INDENT: &[u8] = b"    ";

/// View over the shard files of one collection directory.
#[derive(Debug)]
pub struct ShardStore<'a, B: StorageBackend> {
    dir: &'a Path,
    backend: &'a B,
}

impl<'a, B: StorageBackend> ShardStore<'a, B> {
    /// Creates a shard store rooted at a collection directory.
    pub fn new(dir: &'a Path, backend: &'a B) -> Self {
        Self { dir, backend }
    }

    /// Creates the collection directory (with parents) and an empty first
    /// shard if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or shard file cannot be created.
    pub fn init(&self) -> DocumentStoreResult<()> {
        self.backend.create_dir_all(self.dir)?;

        if !self.exists(1) {
            self.write_shard(1, &[])?;
        }

        Ok(())
    }

    /// Returns the collection directory.
    pub fn dir(&self) -> &Path {
        self.dir
    }

    /// Returns the file path of shard `number`.
    pub fn shard_path(&self, number: usize) -> PathBuf {
        self.dir.join(format!("{number}.{SHARD_EXTENSION}"))
    }

    /// Returns `true` if shard `number` exists.
    pub fn exists(&self, number: usize) -> bool {
        self.backend.exists(&self.shard_path(number))
    }

    /// Iterates over existing shard numbers in ascending order, stopping at
    /// the first gap.
    ///
    /// Existence is probed lazily, so shards created during iteration are
    /// visited too.
    pub fn numbers(&self) -> impl Iterator<Item = usize> + '_ {
        (1..).take_while(move |number| self.exists(*number))
    }

    /// Returns the number of the last shard, or `0` if there are none.
    pub fn last_shard_number(&self) -> usize {
        self.numbers().last().unwrap_or(0)
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.last_shard_number()
    }

    /// Returns the paths of all existing shards in order.
    pub fn shard_paths(&self) -> Vec<PathBuf> {
        self.numbers()
            .map(|number| self.shard_path(number))
            .collect()
    }

    /// Reads the documents of shard `number`.
    ///
    /// Returns `None` if the shard is missing, unreadable, or does not contain
    /// a JSON array. Callers treat such a shard as holding no documents.
    pub fn read_shard(&self, number: usize) -> Option<Vec<Value>> {
        let path = self.shard_path(number);
        let bytes = match self.backend.read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read shard");
                return None;
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(documents)) => Some(documents),
            Ok(_) => {
                warn!(path = %path.display(), "shard is not a JSON array, skipping");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "shard failed to parse, skipping");
                None
            }
        }
    }

    /// Returns the number of documents in shard `number` (`0` when missing
    /// or unparsable).
    pub fn count_documents(&self, number: usize) -> usize {
        if !self.exists(number) {
            return 0;
        }

        self.read_shard(number)
            .map(|documents| documents.len())
            .unwrap_or(0)
    }

    /// Replaces the content of shard `number` with `documents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard cannot be serialized or written.
    pub fn write_shard(&self, number: usize, documents: &[Value]) -> DocumentStoreResult<()> {
        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(SHARD_INDENT));
        documents.serialize(&mut serializer)?;

        self.backend.write(&self.shard_path(number), &buffer)
    }

    /// Selects the shard the next document goes to, creating it if needed.
    ///
    /// This is the last shard, or a new shard after it once the last shard
    /// holds `tuples_limit` documents.
    ///
    /// # Errors
    ///
    /// Returns an error if a new shard cannot be created.
    pub fn insert_target(&self, tuples_limit: usize) -> DocumentStoreResult<usize> {
        let mut target = self.last_shard_number().max(1);

        if self.count_documents(target) >= tuples_limit {
            target += 1;
            debug!(dir = %self.dir.display(), shard = target, "shard full, rolling over");
            self.write_shard(target, &[])?;
        } else if !self.exists(target) {
            debug!(dir = %self.dir.display(), shard = target, "creating shard");
            self.write_shard(target, &[])?;
        }

        Ok(target)
    }

    /// Appends a document to the insert target shard and returns its number.
    ///
    /// If the target shard does not parse, its content is replaced by a new
    /// array holding only this document.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard cannot be written.
    pub fn append(&self, document: Value, tuples_limit: usize) -> DocumentStoreResult<usize> {
        let target = self.insert_target(tuples_limit)?;

        let mut documents = self.read_shard(target).unwrap_or_default();
        documents.push(document);
        self.write_shard(target, &documents)?;

        Ok(target)
    }
}
