//! Storage backends for Canopy
//!
//! Nodes are persisted through the `NodeStore` trait.
//! The primary implementation is `SqliteStore` for durable storage.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{NodeStore, OpenStore, StorageError, StorageResult};
