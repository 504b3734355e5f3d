//! Local filesystem storage backend for shardlayer.
//!
//! [`LocalStorage`] maps every storage operation directly onto `std::fs`.
//! Shard files written through it are ordinary pretty-printed JSON files that
//! can be inspected and edited by hand.

pub mod local;

pub use local::LocalStorage;
