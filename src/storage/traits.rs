//! Storage trait definitions

use crate::forest::{NodeId, NodeRecord};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection lock poisoned by a panicked writer")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for node storage backends
///
/// The store is append-only: nodes are inserted once and never updated or
/// removed. Implementations must be thread-safe (Send + Sync) to support
/// concurrent access from request handlers, and must assign ids that are
/// unique and increase in insertion order even under concurrent inserts.
pub trait NodeStore: Send + Sync {
    /// Check whether a node with this id exists
    fn exists(&self, id: NodeId) -> StorageResult<bool>;

    /// Insert a node and return its newly assigned id
    ///
    /// Does not validate `parent_id`; callers check existence first.
    fn insert(&self, label: &str, parent_id: Option<NodeId>) -> StorageResult<NodeId>;

    /// All nodes, ordered by id ascending
    fn list_all(&self) -> StorageResult<Vec<NodeRecord>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: NodeStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
