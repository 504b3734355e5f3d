//! A sharded JSON document store that persists collections as numbered JSON files.
//!
//! This crate is the core of the shardlayer project and provides:
//!
//! - **Documents** ([`document`]) - `_id` helpers and the typed [`Document`](document::Document) trait
//! - **Storage backend abstraction** ([`backend`]) - Whole-file storage used by the shard store
//! - **Shards** ([`shard`]) - Numbered shard files, capacity and rollover
//! - **Queries** ([`query`]) - Filter matching, update operators, sorting, projection and builders
//! - **Collections** ([`collection`]) - CRUD operations over a collection's shards
//! - **Schemas** ([`schema`]) - Database schema descriptors
//! - **Databases** ([`database`]) - The set of collections declared by a schema
//! - **Registry** ([`registry`]) - Serialized, lazily opening access to databases
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use shardlayer::{Database, Schema, memory::InMemoryStorage, query::{Filter, FindOptions}};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(json!({
//!     "name": "logs",
//!     "tuples_limit": 1000,
//!     "structure": {"events": {}}
//! }))?;
//!
//! let database = Database::open(InMemoryStorage::new(), schema, "logs", "data")?;
//! let events = database.get_collection("events")?;
//!
//! events.insert(json!({"_id": "e1", "host": "web-1", "level": 3}))?;
//! let errors = events.find_with(&Filter::gte("level", 3).into(), &FindOptions::default());
//! ```

pub mod backend;
pub mod collection;
pub mod database;
pub mod document;
pub mod error;
pub mod query;
pub mod registry;
pub mod schema;
pub mod shard;
