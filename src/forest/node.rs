//! Node representation in the forest

use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a node
///
/// Serializes as a bare integer. Ids are assigned in insertion order and are
/// never reused, so ascending id order is also creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw integer value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A node as it is persisted: no children, just the parent link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    pub parent_id: Option<NodeId>,
}

impl NodeRecord {
    pub fn new(id: NodeId, label: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id,
            label: label.into(),
            parent_id,
        }
    }

    /// A record with no parent
    pub fn root(id: i64, label: impl Into<String>) -> Self {
        Self::new(NodeId(id), label, None)
    }

    /// A record pointing at `parent`
    pub fn child(id: i64, label: impl Into<String>, parent: i64) -> Self {
        Self::new(NodeId(id), label, Some(NodeId(parent)))
    }
}

/// A node in an assembled forest
///
/// `parent_id` is kept for callers but is not part of the wire shape:
/// clients see `{id, label, children}` only.
///
/// Forests have no depth limit, so dropping and comparing walk the tree with
/// an explicit stack. The derived `Serialize` still recurses once per level;
/// whole forests go out through [`super::json`] instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(skip_serializing, default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// A childless node built from its persisted record
    pub fn from_record(record: NodeRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            parent_id: record.parent_id,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, counting `self`
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Find a node by id anywhere in this subtree
    #[cfg(test)]
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.id != b.id
                || a.label != b.label
                || a.parent_id != b.parent_id
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for Node {}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Self::from_record(record)
    }
}
