//! Shape statistics over an assembled forest

use serde::Serialize;

use super::node::{Node, NodeId};

/// Statistics for a single tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub root_id: NodeId,
    pub root_label: String,
    /// Nodes in the tree, root included
    pub node_count: usize,
    /// Longest root-to-leaf path in edges (a lone root has depth 0)
    pub max_depth: usize,
    pub direct_children: usize,
}

/// Statistics for a whole forest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForestStats {
    pub trees: Vec<TreeStats>,
    pub total_nodes: usize,
    pub max_depth: usize,
}

impl TreeStats {
    pub fn collect(root: &Node) -> Self {
        let mut node_count = 0;
        let mut max_depth = 0;
        let mut stack = vec![(root, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            node_count += 1;
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }

        Self {
            root_id: root.id,
            root_label: root.label.clone(),
            node_count,
            max_depth,
            direct_children: root.children.len(),
        }
    }
}

impl ForestStats {
    pub fn collect(forest: &[Node]) -> Self {
        let trees: Vec<TreeStats> = forest.iter().map(TreeStats::collect).collect();
        Self {
            total_nodes: trees.iter().map(|t| t.node_count).sum(),
            max_depth: trees.iter().map(|t| t.max_depth).max().unwrap_or(0),
            trees,
        }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}
