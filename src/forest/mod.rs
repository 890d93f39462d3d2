//! Forest data structures and assembly

mod assemble;
pub mod json;
mod node;
mod stats;

#[cfg(test)]
mod tests;

pub use assemble::assemble;
pub use node::{Node, NodeId, NodeRecord};
pub use stats::{ForestStats, TreeStats};
