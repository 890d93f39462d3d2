//! Canopy: a small service for forests of labeled, parent-linked nodes
//!
//! Nodes are stored flat (id, label, optional parent) and assembled into
//! nested, id-ordered trees on every read.
//!
//! # Core Concepts
//!
//! - **Node store**: append-only durable storage; assigns increasing ids
//! - **Assembly**: turns the flat rows into a forest; never drops a row
//! - **Tree API**: validates creations (non-empty label, existing parent)
//!   before anything is written
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use canopy::{OpenStore, SqliteStore, TreeApi};
//!
//! let api = TreeApi::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
//! let root = api.create_node("root", None).unwrap();
//! api.create_node("child", Some(root.id)).unwrap();
//!
//! let forest = api.list_forest().unwrap();
//! assert_eq!(forest[0].children[0].label, "child");
//! ```

pub mod api;
pub mod config;
pub mod forest;
pub mod http;
pub mod sample;
pub mod storage;

pub use api::{ApiError, ApiResult, TreeApi};
pub use config::{ServerConfig, StoreConfig};
pub use forest::{assemble, ForestStats, Node, NodeId, NodeRecord, TreeStats};
pub use storage::{NodeStore, OpenStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
