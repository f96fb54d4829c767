use std::hash::Hash;

use crate::config::{KdbTreeBuilder, TreeConfig};
use crate::constants::ROOT_SPLIT_DIMENSION;
use crate::errors::{KdbError, KdbResult};
use crate::integrity::{check_tree, IntegrityReport};
use crate::node::{InsertOutcome, Node, PointNode, RegionNode};
use crate::point::Point;
use crate::region::Region;
use crate::stats::TreeStats;

/// A KDB-tree over a fixed domain.
///
/// The tree starts empty. The first insert creates a single leaf covering
/// the whole domain; each time the root overflows it is split in two and a
/// new root region node is placed above the halves, so the tree grows
/// upward and all leaves stay at the same depth.
///
/// `D` is the payload stored with each point and `C` the category used to
/// prune queries.
///
/// # Examples
///
/// ```rust
/// use kdbtree::{KdbTree, Region};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let domain = Region::new(vec![(0.0..10.0).into(), (0.0..10.0).into()])?;
/// let mut tree = KdbTree::with_capacities(domain, 2, 2)?;
///
/// tree.insert(vec![5.0, 5.0], "a", Some("bank".to_string()))?;
/// tree.insert(vec![6.0, 6.0], "b", None)?;
/// tree.insert(vec![1.0, 1.0], "c", Some("bank".to_string()))?;
///
/// let window = Region::new(vec![(4.0..=6.0).into(), (4.0..=6.0).into()])?;
/// assert_eq!(tree.query(&window, None)?.len(), 2);
/// assert_eq!(tree.query(&window, Some(&"bank".to_string()))?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KdbTree<D, C = String> {
    domain: Region,
    config: TreeConfig,
    root: Option<Node<D, C>>,
    size: usize,
}

impl<D, C: Clone + Eq + Hash> KdbTree<D, C> {
    /// Creates an empty tree with the default capacities.
    pub fn new(domain: Region) -> Self {
        KdbTree {
            domain,
            config: TreeConfig::default(),
            root: None,
            size: 0,
        }
    }

    /// Creates an empty tree with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::Configuration`] if a capacity is below 2.
    pub fn with_config(domain: Region, config: TreeConfig) -> KdbResult<Self> {
        config.validate()?;
        Ok(KdbTree {
            domain,
            config,
            root: None,
            size: 0,
        })
    }

    pub fn with_capacities(
        domain: Region,
        region_capacity: usize,
        point_capacity: usize,
    ) -> KdbResult<Self> {
        Self::with_config(domain, TreeConfig::new(region_capacity, point_capacity)?)
    }

    pub fn builder(domain: Region) -> KdbTreeBuilder<D, C> {
        KdbTreeBuilder::new(domain)
    }

    pub fn domain(&self) -> &Region {
        &self.domain
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The root node, `None` until the first insert.
    pub fn root(&self) -> Option<&Node<D, C>> {
        self.root.as_ref()
    }

    pub fn dimensions(&self) -> usize {
        self.domain.dimensions()
    }

    /// Number of stored point records, duplicates included.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Removes every point, returning the tree to its empty state.
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }

    /// Stores a point record.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::DimensionMismatch`] if `coords` does not match the
    /// domain's dimensionality, or [`KdbError::Domain`] if it lies outside
    /// the domain. The tree is unchanged in both cases.
    pub fn insert(&mut self, coords: Vec<f64>, data: D, category: Option<C>) -> KdbResult<()> {
        self.insert_point(Point::new(coords, data, category))
    }

    /// Stores an already built point record. See [`insert`](KdbTree::insert).
    pub fn insert_point(&mut self, point: Point<D, C>) -> KdbResult<()> {
        self.check_dimensions(point.coords().len())?;
        if !self.domain.contains_point(point.coords()) {
            return Err(KdbError::Domain(format!(
                "point {:?} lies outside domain {}",
                point.coords(),
                self.domain
            )));
        }

        let domain = &self.domain;
        let point_capacity = self.config.point_capacity;
        let root = self.root.get_or_insert_with(|| {
            Node::Point(PointNode::new(
                domain.clone(),
                ROOT_SPLIT_DIMENSION,
                point_capacity,
            ))
        });

        if root.insert(point)? == InsertOutcome::Overflowed {
            self.promote_root()?;
        }

        self.size += 1;
        Ok(())
    }

    // Splits the overflowing root and places a new region node over the halves.
    // A root without a split plan is left in place.
    fn promote_root(&mut self) -> KdbResult<()> {
        match &self.root {
            Some(root) if root.split_plan().is_none() => {
                return Err(KdbError::CannotSplit(format!(
                    "root {} has no usable cut",
                    root.region()
                )));
            }
            Some(_) => {}
            None => return Ok(()),
        }
        let Some(old_root) = self.root.take() else {
            return Ok(());
        };

        let (low, high) = old_root.split()?;
        let new_root = RegionNode::with_children(
            self.domain.clone(),
            ROOT_SPLIT_DIMENSION,
            self.config.region_capacity,
            vec![low, high],
        );
        self.root = Some(Node::Region(new_root));

        log::debug!(
            "Promoted new root over {} ({} points, height {})",
            self.domain,
            self.size + 1,
            self.stats().height
        );
        Ok(())
    }

    /// Returns every point inside `region` whose category equals `category`.
    ///
    /// A `None` category matches all points, including untagged ones.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::DimensionMismatch`] if the query region's
    /// dimensionality differs from the domain's.
    pub fn query(&self, region: &Region, category: Option<&C>) -> KdbResult<Vec<&Point<D, C>>> {
        self.check_dimensions(region.dimensions())?;

        let mut results = Vec::new();
        if let Some(root) = &self.root {
            if root.may_match(region, category) {
                root.query(region, category, &mut results);
            }
        }
        Ok(results)
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats::collect(self.root.as_ref())
    }

    /// Walks the whole tree and verifies its structural invariants.
    pub fn check_integrity(&self) -> IntegrityReport {
        check_tree(&self.domain, self.root.as_ref(), self.size)
    }

    fn check_dimensions(&self, actual: usize) -> KdbResult<()> {
        let expected = self.domain.dimensions();
        if actual != expected {
            return Err(KdbError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}
