//! In-memory storage backend for shardlayer.
//!
//! This crate provides [`InMemoryStorage`], a thread-safe implementation of the
//! `StorageBackend` trait that keeps shard files in memory. It is intended for
//! tests and ephemeral databases: nothing survives the process.
//!
//! # Quick Start
//!
//! ```ignore
//! use shardlayer::{Database, Schema, memory::InMemoryStorage};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(json!({
//!     "name": "scratch",
//!     "tuples_limit": 100,
//!     "structure": {"notes": {}}
//! }))?;
//!
//! let storage = InMemoryStorage::new();
//! let database = Database::open(storage.clone(), schema, "scratch", "data")?;
//! database.get_collection("notes")?.insert(json!({"_id": "n1", "text": "hi"}))?;
//!
//! assert!(storage.contents("data/scratch/notes/1.json".as_ref()).is_some());
//! ```

pub mod store;

pub use store::InMemoryStorage;
