//! Statistics about a tree's shape.

use crate::node::Node;

/// Snapshot of a tree's size and shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeStats {
    pub total_points: usize,
    pub point_nodes: usize,
    pub region_nodes: usize,
    /// Number of node levels; 0 for an empty tree, 1 for a single leaf
    pub height: usize,
    /// Largest number of points held by a single leaf
    pub max_leaf_points: usize,
}

impl TreeStats {
    pub(crate) fn collect<D, C>(root: Option<&Node<D, C>>) -> TreeStats {
        let mut stats = TreeStats::default();
        if let Some(root) = root {
            stats.visit(root, 1);
        }
        stats
    }

    fn visit<D, C>(&mut self, node: &Node<D, C>, level: usize) {
        self.height = self.height.max(level);
        match node {
            Node::Point(leaf) => {
                self.point_nodes += 1;
                self.total_points += leaf.len();
                self.max_leaf_points = self.max_leaf_points.max(leaf.len());
            }
            Node::Region(internal) => {
                self.region_nodes += 1;
                for child in internal.children() {
                    self.visit(child, level + 1);
                }
            }
        }
    }

    /// Average number of points per leaf.
    pub fn fill_factor(&self) -> f64 {
        if self.point_nodes == 0 {
            0.0
        } else {
            self.total_points as f64 / self.point_nodes as f64
        }
    }
}
