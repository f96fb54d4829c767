//! Tree nodes.
//!
//! A KDB-tree has exactly two node shapes:
//! - [`PointNode`] leaves holding point records for one region
//! - [`RegionNode`] internal nodes holding children that partition their region
//!
//! Both are wrapped in the closed [`Node`] enum. Mutation goes through the
//! owning [`KdbTree`](crate::KdbTree); the public surface here is read-only
//! and meant for inspection and integrity checks.
//!
//! Overflow is reported with [`InsertOutcome`] and consumed by the immediate
//! parent, which splits the overflowing child in place.

mod point_node;
mod region_node;

use std::collections::HashSet;
use std::hash::Hash;

pub use point_node::PointNode;
pub use region_node::RegionNode;

use crate::errors::KdbResult;
use crate::point::Point;
use crate::region::Region;

/// Result of inserting into a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertOutcome {
    /// The point was stored and the node is within capacity.
    Inserted,
    /// The point was stored but the node exceeded its capacity; the caller
    /// must split it before returning. Only reported when the node has a
    /// split plan, so that split cannot fail.
    Overflowed,
}

/// A node of the tree: either a leaf or an internal node.
#[derive(Debug)]
pub enum Node<D, C> {
    /// Leaf holding point records
    Point(PointNode<D, C>),
    /// Internal node holding child nodes
    Region(RegionNode<D, C>),
}

impl<D, C> Node<D, C> {
    /// The region this node is responsible for.
    pub fn region(&self) -> &Region {
        match self {
            Node::Point(node) => node.region(),
            Node::Region(node) => node.region(),
        }
    }

    /// The dimension this node cuts along when it next splits.
    pub fn split_dimension(&self) -> usize {
        match self {
            Node::Point(node) => node.split_dimension(),
            Node::Region(node) => node.split_dimension(),
        }
    }

    pub fn capacity(&self) -> usize {
        match self {
            Node::Point(node) => node.capacity(),
            Node::Region(node) => node.capacity(),
        }
    }

    /// Union of all categories stored beneath this node.
    pub fn categories(&self) -> &HashSet<C> {
        match self {
            Node::Point(node) => node.categories(),
            Node::Region(node) => node.categories(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Point(_))
    }

    pub fn as_point_node(&self) -> Option<&PointNode<D, C>> {
        match self {
            Node::Point(node) => Some(node),
            Node::Region(_) => None,
        }
    }

    pub fn as_region_node(&self) -> Option<&RegionNode<D, C>> {
        match self {
            Node::Point(_) => None,
            Node::Region(node) => Some(node),
        }
    }

    /// The dimension and cutter the node would split at, if any.
    pub(crate) fn split_plan(&self) -> Option<(usize, f64)> {
        match self {
            Node::Point(node) => node.split_plan(),
            Node::Region(node) => node.split_plan(),
        }
    }

    /// Number of points stored beneath this node.
    pub fn point_count(&self) -> usize {
        match self {
            Node::Point(node) => node.len(),
            Node::Region(node) => node.children().iter().map(Node::point_count).sum(),
        }
    }
}

impl<D, C: Clone + Eq + Hash> Node<D, C> {
    pub(crate) fn insert(&mut self, point: Point<D, C>) -> KdbResult<InsertOutcome> {
        match self {
            Node::Point(node) => node.insert(point),
            Node::Region(node) => node.insert(point),
        }
    }

    /// Checks whether a query could find anything beneath this node.
    pub(crate) fn may_match(&self, region: &Region, category: Option<&C>) -> bool {
        self.region().intersects(region)
            && category.map_or(true, |wanted| self.categories().contains(wanted))
    }

    pub(crate) fn query<'a>(
        &'a self,
        region: &Region,
        category: Option<&C>,
        results: &mut Vec<&'a Point<D, C>>,
    ) {
        match self {
            Node::Point(node) => node.query(region, category, results),
            Node::Region(node) => node.query(region, category, results),
        }
    }

    /// Splits the node using its own cut policy.
    pub(crate) fn split(self) -> KdbResult<(Node<D, C>, Node<D, C>)> {
        match self {
            Node::Point(node) => node
                .split()
                .map(|(low, high)| (Node::Point(low), Node::Point(high))),
            Node::Region(node) => node
                .split()
                .map(|(low, high)| (Node::Region(low), Node::Region(high))),
        }
    }

    /// Splits the node along a cut chosen by an ancestor.
    pub(crate) fn split_at(
        self,
        dimension: usize,
        cutter: f64,
    ) -> KdbResult<(Node<D, C>, Node<D, C>)> {
        match self {
            Node::Point(node) => node
                .split_at(dimension, cutter)
                .map(|(low, high)| (Node::Point(low), Node::Point(high))),
            Node::Region(node) => node
                .split_at(dimension, cutter)
                .map(|(low, high)| (Node::Region(low), Node::Region(high))),
        }
    }
}
