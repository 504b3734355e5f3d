//! Main shardlayer crate providing a file-backed, sharded JSON document store.
//!
//! This crate is the primary entry point for users of shardlayer. It
//! re-exports the core types and functionality from the sub-crates and
//! provides access to the storage backends.
//!
//! # Features
//!
//! - **Plain files** - Each collection is a directory of numbered, pretty-printed JSON array files
//! - **Mongo-style queries** - `$and`/`$or`/`$not`, comparison operators, `$set`/`$inc`/`$push` updates
//! - **Typed or untyped documents** - Work with `serde_json::Value` or your own Serde structs
//! - **Pluggable storage** - Local filesystem or in-memory backends behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use shardlayer::{prelude::*, fs::LocalStorage};
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Event {
//!     #[serde(rename = "_id")]
//!     pub id: String,
//!     pub host: String,
//!     pub level: i64,
//! }
//!
//! impl Document for Event {
//!     fn id(&self) -> &str { &self.id }
//!     fn collection_name() -> &'static str { "events" }
//! }
//!
//! fn main() -> DocumentStoreResult<()> {
//!     let database = Database::open_with_schema_file(LocalStorage::new(), "schema.json", "logs", "data")?;
//!
//!     // Typed access
//!     let events = database.typed_collection::<Event>()?;
//!     events.insert(&Event { id: "e1".into(), host: "web-1".into(), level: 3 })?;
//!
//!     let noisy = events.find(
//!         &Filter::gte("level", 3).into(),
//!         &FindOptions::builder().sort("level", SortDirection::Desc).build(),
//!     )?;
//!     println!("Noisy events: {:?}", noisy);
//!
//!     // Untyped access
//!     let raw = database.get_collection("events")?;
//!     raw.update_many(&json!({"host": "web-1"}), &Update::new().set("triaged", true).into())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Serialized access
//!
//! Collections do not synchronize concurrent callers. Services sharing
//! databases between tasks go through a [`DatabaseRegistry`](registry::DatabaseRegistry),
//! which opens databases lazily and hands out one session at a time.
//!
//! ```ignore
//! use shardlayer::{prelude::*, fs::LocalStorage};
//!
//! let registry = DatabaseRegistry::new(RegistryConfig::new("schema.json", "data"), LocalStorage::new());
//!
//! let mut session = registry.session().await;
//! let count = session.database("logs")?.get_collection("events")?.count(&Filter::all().into());
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for tests and ephemeral databases
//! - [`fs`] - Local filesystem storage (requires the `fs` feature, enabled by default)

pub mod prelude;

pub use shardlayer_core::{backend, collection, database, document, error, query, registry, schema, shard};

pub use shardlayer_core::{database::Database, schema::Schema};

// Re-export serde_json, the value model of every document and query
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use shardlayer_memory::InMemoryStorage;
}

/// Local filesystem storage backend implementations.
///
/// This module is only available when the `fs` feature is enabled.
#[cfg(feature = "fs")]
pub mod fs {
    pub use shardlayer_fs::LocalStorage;
}
