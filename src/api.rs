//! Transport-independent API layer.
//!
//! `TreeApi` is the single entry point for all consumer-facing operations.
//! Transports (HTTP, the CLI) call `TreeApi` methods; they never reach into
//! the store directly.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::forest::{assemble, Node, NodeId};
use crate::storage::{NodeStore, StorageError};

/// Errors surfaced by `TreeApi`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input broke a business rule; the caller can fix it and resubmit
    #[error("{0}")]
    Validation(String),

    /// The declared parent does not exist
    #[error("Parent node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Single entry point for node creation and forest listing.
#[derive(Clone)]
pub struct TreeApi {
    store: Arc<dyn NodeStore>,
}

impl TreeApi {
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self { store }
    }

    // --- Write ---

    /// Create a node under `parent_id`, or a new root when it is `None`.
    ///
    /// The label is trimmed and must not be empty. The parent, when given,
    /// must already exist. Nothing is written unless both checks pass.
    pub fn create_node(&self, label: &str, parent_id: Option<NodeId>) -> ApiResult<Node> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ApiError::Validation("label is required".to_string()));
        }

        // Existence check and insert are separate calls: nodes are never
        // deleted, so a parent seen here is still there at insert time.
        if let Some(parent) = parent_id {
            if !self.store.exists(parent)? {
                return Err(ApiError::NodeNotFound(parent));
            }
        }

        let id = self.store.insert(label, parent_id)?;
        debug!(%id, parent = ?parent_id.map(NodeId::get), "created node");

        Ok(Node {
            id,
            label: label.to_string(),
            parent_id,
            children: Vec::new(),
        })
    }

    // --- Read ---

    /// Read every node and assemble the current forest.
    ///
    /// Always reads through to the store; nothing is cached.
    pub fn list_forest(&self) -> ApiResult<Vec<Node>> {
        let records = self.store.list_all()?;
        let count = records.len();
        let forest = assemble(records);
        debug!(nodes = count, roots = forest.len(), "assembled forest");
        Ok(forest)
    }
}
