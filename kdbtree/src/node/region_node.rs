use std::collections::HashSet;
use std::hash::Hash;

use super::{InsertOutcome, Node};
use crate::errors::{KdbError, KdbResult};
use crate::point::Point;
use crate::region::Region;

/// Internal node whose children partition its region.
///
/// A region node splits by space, not by data: the cut lies at the
/// geometric midpoint of its region along the split dimension, and any child
/// straddling the cut is split along the same line.
#[derive(Debug)]
pub struct RegionNode<D, C> {
    region: Region,
    split_dimension: usize,
    capacity: usize,
    children: Vec<Node<D, C>>,
    categories: HashSet<C>,
}

impl<D, C> RegionNode<D, C> {
    pub(crate) fn new(region: Region, split_dimension: usize, capacity: usize) -> Self {
        RegionNode {
            region,
            split_dimension,
            capacity,
            children: Vec::new(),
            categories: HashSet::new(),
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn split_dimension(&self) -> usize {
        self.split_dimension
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn children(&self) -> &[Node<D, C>] {
        &self.children
    }

    pub fn categories(&self) -> &HashSet<C> {
        &self.categories
    }

    /// Finds the first dimension, starting at the node's split dimension,
    /// whose midpoint lies strictly inside the region.
    pub(crate) fn split_plan(&self) -> Option<(usize, f64)> {
        let dimensions = self.region.dimensions();
        (0..dimensions)
            .map(|offset| (self.split_dimension + offset) % dimensions)
            .find_map(|dimension| {
                let interval = self.region.interval(dimension)?;
                let cutter = interval.midpoint();
                (interval.lower() < cutter && cutter < interval.upper())
                    .then_some((dimension, cutter))
            })
    }
}

impl<D, C: Clone + Eq + Hash> RegionNode<D, C> {
    pub(crate) fn with_children(
        region: Region,
        split_dimension: usize,
        capacity: usize,
        children: Vec<Node<D, C>>,
    ) -> Self {
        let mut node = RegionNode::new(region, split_dimension, capacity);
        for child in children {
            node.adopt(child);
        }
        node
    }

    /// Routes `point` to the child whose region contains it, splitting that
    /// child if it overflows.
    ///
    /// Returns [`InsertOutcome::Overflowed`] when this node now has more
    /// children than its capacity.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::Domain`] if no child contains the point.
    pub(crate) fn insert(&mut self, point: Point<D, C>) -> KdbResult<InsertOutcome> {
        let index = self
            .children
            .iter()
            .position(|child| child.region().contains_point(point.coords()))
            .ok_or_else(|| {
                KdbError::Domain(format!(
                    "no child of {} contains point {:?}",
                    self.region,
                    point.coords()
                ))
            })?;

        let category = point.category().cloned();

        if self.children[index].insert(point)? == InsertOutcome::Overflowed {
            self.split_child(index)?;
        }

        if let Some(category) = category {
            self.categories.insert(category);
        }

        if self.children.len() > self.capacity && self.split_plan().is_some() {
            Ok(InsertOutcome::Overflowed)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    // Replaces the child at `index` with its two halves. A child without a
    // split plan is left in place.
    fn split_child(&mut self, index: usize) -> KdbResult<()> {
        if self.children[index].split_plan().is_none() {
            return Err(KdbError::CannotSplit(format!(
                "child {} of {} has no usable cut",
                self.children[index].region(),
                self.region
            )));
        }

        let (low, high) = self.children.remove(index).split()?;
        self.children.push(low);
        self.children.push(high);
        Ok(())
    }

    /// Collects matching points, descending only into children that
    /// intersect `region` and hold `category`.
    pub(crate) fn query<'a>(
        &'a self,
        region: &Region,
        category: Option<&C>,
        results: &mut Vec<&'a Point<D, C>>,
    ) {
        for child in &self.children {
            if child.may_match(region, category) {
                child.query(region, category, results);
            }
        }
    }

    /// Splits the node at the midpoint of its split dimension.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::CannotSplit`] if every dimension of the region
    /// is too narrow to cut.
    pub(crate) fn split(self) -> KdbResult<(RegionNode<D, C>, RegionNode<D, C>)> {
        let (dimension, cutter) = self.split_plan().ok_or_else(|| {
            KdbError::CannotSplit(format!("region {} is too narrow to cut", self.region))
        })?;
        self.split_at(dimension, cutter)
    }

    /// Splits the node's region at `cutter`, moving nested children to their
    /// side and recursively splitting children that straddle the cut.
    pub(crate) fn split_at(
        self,
        dimension: usize,
        cutter: f64,
    ) -> KdbResult<(RegionNode<D, C>, RegionNode<D, C>)> {
        log::trace!(
            "Splitting region node {} ({} children) on dimension {} at {}",
            self.region,
            self.children.len(),
            dimension,
            cutter
        );

        let (low_region, high_region) = self.region.split(dimension, cutter)?;
        let next_dimension = (dimension + 1) % self.region.dimensions();

        let mut low = RegionNode::new(low_region, next_dimension, self.capacity);
        let mut high = RegionNode::new(high_region, next_dimension, self.capacity);

        for child in self.children {
            if low.region.contains_region(child.region()) {
                low.adopt(child);
            } else if high.region.contains_region(child.region()) {
                high.adopt(child);
            } else {
                let (child_low, child_high) = child.split_at(dimension, cutter)?;
                low.adopt(child_low);
                high.adopt(child_high);
            }
        }

        Ok((low, high))
    }

    fn adopt(&mut self, child: Node<D, C>) {
        self.categories.extend(child.categories().iter().cloned());
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PointNode;

    fn region(x: (f64, f64), y: (f64, f64)) -> Region {
        Region::new(vec![(x.0..x.1).into(), (y.0..y.1).into()]).unwrap()
    }

    fn point(x: f64, y: f64, category: Option<&str>) -> Point<u32> {
        Point::new(vec![x, y], 0, category.map(String::from))
    }

    fn leaf(region: Region, points: Vec<Point<u32>>) -> Node<u32, String> {
        let mut node = PointNode::new(region, 1, 8);
        for p in points {
            node.insert(p).unwrap();
        }
        Node::Point(node)
    }

    // [0,10)x[0,10) cut at x = 3 into two leaves
    fn two_leaf_node(capacity: usize) -> RegionNode<u32, String> {
        RegionNode::with_children(
            region((0.0, 10.0), (0.0, 10.0)),
            0,
            capacity,
            vec![
                leaf(
                    region((0.0, 3.0), (0.0, 10.0)),
                    vec![point(1.0, 1.0, Some("bank")), point(2.0, 8.0, None)],
                ),
                leaf(
                    region((3.0, 10.0), (0.0, 10.0)),
                    vec![point(4.0, 4.0, Some("mall")), point(9.0, 9.0, Some("bank"))],
                ),
            ],
        )
    }

    #[test]
    fn test_with_children_merges_categories() {
        let node = two_leaf_node(4);
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.categories().len(), 2);
        assert!(node.categories().contains("bank"));
        assert!(node.categories().contains("mall"));
    }

    #[test]
    fn test_insert_routes_to_containing_child() {
        let mut node = two_leaf_node(4);
        let outcome = node.insert(point(5.0, 5.0, Some("cafe"))).unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(node.children()[1].point_count(), 3);
        assert!(node.categories().contains("cafe"));
        assert!(node.children()[1].categories().contains("cafe"));
        assert!(!node.children()[0].categories().contains("cafe"));
    }

    #[test]
    fn test_insert_splits_overflowing_child() {
        let mut node = RegionNode::with_children(
            region((0.0, 10.0), (0.0, 10.0)),
            0,
            4,
            vec![Node::Point(PointNode::new(region((0.0, 10.0), (0.0, 10.0)), 0, 2))],
        );
        node.insert(point(1.0, 1.0, None)).unwrap();
        node.insert(point(2.0, 2.0, None)).unwrap();
        assert_eq!(node.children().len(), 1);

        node.insert(point(6.0, 6.0, None)).unwrap();
        assert_eq!(node.children().len(), 2);
        assert!(node.children().iter().all(Node::is_leaf));
        assert_eq!(
            node.children().iter().map(Node::point_count).sum::<usize>(),
            3
        );
    }

    #[test]
    fn test_insert_signals_overflow_past_capacity() {
        let mut node = RegionNode::with_children(
            region((0.0, 10.0), (0.0, 10.0)),
            0,
            2,
            vec![Node::Point(PointNode::new(region((0.0, 10.0), (0.0, 10.0)), 0, 2))],
        );
        let mut outcomes = Vec::new();
        for (x, y) in [(1.0, 1.0), (2.0, 2.0), (6.0, 6.0), (7.0, 7.0), (8.0, 3.0)] {
            outcomes.push(node.insert(point(x, y, None)).unwrap());
        }

        // the fifth point splits the right leaf, giving a third child
        assert_eq!(
            outcomes,
            vec![
                InsertOutcome::Inserted,
                InsertOutcome::Inserted,
                InsertOutcome::Inserted,
                InsertOutcome::Inserted,
                InsertOutcome::Overflowed,
            ]
        );
        assert_eq!(node.children().len(), 3);
    }

    #[test]
    fn test_insert_without_containing_child() {
        let mut node = RegionNode::with_children(
            region((0.0, 10.0), (0.0, 10.0)),
            0,
            2,
            vec![leaf(region((0.0, 5.0), (0.0, 10.0)), Vec::new())],
        );
        let err = node.insert(point(7.0, 1.0, Some("bank"))).unwrap_err();
        assert!(err.is_domain_error());
        assert!(node.categories().is_empty());
    }

    #[test]
    fn test_query_prunes_by_category() {
        let node = two_leaf_node(4);
        let everything = region((0.0, 10.0), (0.0, 10.0));

        let mut results = Vec::new();
        node.query(&everything, None, &mut results);
        assert_eq!(results.len(), 4);

        let mut results = Vec::new();
        node.query(&everything, Some(&"mall".to_string()), &mut results);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].coords(), &[4.0, 4.0]);

        let mut results = Vec::new();
        node.query(&everything, Some(&"cafe".to_string()), &mut results);
        assert!(results.is_empty());
    }

    #[test]
    fn test_split_at_midpoint_splits_straddling_children() {
        // cut at x = 5 straddles the right leaf [3, 10)
        let node = two_leaf_node(4);
        assert_eq!(node.split_plan(), Some((0, 5.0)));

        let (low, high) = node.split().unwrap();
        assert_eq!(low.children().len(), 2);
        assert_eq!(high.children().len(), 1);
        assert_eq!(low.split_dimension(), 1);

        assert!(low
            .children()
            .iter()
            .all(|child| low.region().contains_region(child.region())));
        assert!(high
            .children()
            .iter()
            .all(|child| high.region().contains_region(child.region())));

        let low_points: usize = low.children().iter().map(Node::point_count).sum();
        let high_points: usize = high.children().iter().map(Node::point_count).sum();
        assert_eq!(low_points, 3);
        assert_eq!(high_points, 1);

        assert!(low.categories().contains("bank"));
        assert!(low.categories().contains("mall"));
        assert!(high.categories().contains("bank"));
        assert!(!high.categories().contains("mall"));
    }

    #[test]
    fn test_split_at_midpoint_splits_straddling_region_child() {
        // the right child is itself a region node over [3, 10), cut on y at 4
        let nested = RegionNode::with_children(
            region((3.0, 10.0), (0.0, 10.0)),
            1,
            4,
            vec![
                leaf(
                    region((3.0, 10.0), (0.0, 4.0)),
                    vec![point(4.0, 2.0, Some("bank")), point(8.0, 3.0, None)],
                ),
                leaf(
                    region((3.0, 10.0), (4.0, 10.0)),
                    vec![point(6.0, 7.0, None), point(9.0, 9.0, Some("mall"))],
                ),
            ],
        );
        let node = RegionNode::with_children(
            region((0.0, 10.0), (0.0, 10.0)),
            0,
            4,
            vec![
                leaf(region((0.0, 3.0), (0.0, 10.0)), vec![point(1.0, 1.0, None)]),
                Node::Region(nested),
            ],
        );

        let (low, high) = node.split().unwrap();
        assert_eq!(low.children().len(), 2);
        assert_eq!(high.children().len(), 1);

        let low_nested = low.children()[1].as_region_node().unwrap();
        let high_nested = high.children()[0].as_region_node().unwrap();
        assert_eq!(low_nested.region(), &region((3.0, 5.0), (0.0, 10.0)));
        assert_eq!(high_nested.region(), &region((5.0, 10.0), (0.0, 10.0)));
        assert_eq!(low_nested.split_dimension(), 1);
        assert_eq!(low_nested.children().len(), 2);
        assert_eq!(high_nested.children().len(), 2);
        assert!(low_nested.children().iter().all(Node::is_leaf));

        for half in [low_nested, high_nested] {
            assert!(half
                .children()
                .iter()
                .all(|child| half.region().contains_region(child.region())));
        }

        let low_points: usize = low.children().iter().map(Node::point_count).sum();
        assert_eq!(low_points, 2);
        assert_eq!(high.children()[0].point_count(), 3);

        assert!(low_nested.categories().contains("bank"));
        assert!(!low_nested.categories().contains("mall"));
        assert!(high.categories().contains("mall"));
        assert!(!high.categories().contains("bank"));
    }

    #[test]
    fn test_split_child_without_cut_keeps_child() {
        let mut cluster = PointNode::new(region((0.0, 10.0), (0.0, 10.0)), 0, 2);
        for _ in 0..3 {
            cluster.insert(point(5.0, 5.0, Some("bank"))).unwrap();
        }
        let mut node = RegionNode::with_children(
            region((0.0, 10.0), (0.0, 10.0)),
            0,
            4,
            vec![Node::Point(cluster)],
        );

        let err = node.split_child(0).unwrap_err();
        assert!(matches!(err, KdbError::CannotSplit(_)));
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].point_count(), 3);
    }

    #[test]
    fn test_split_plan_skips_zero_width_dimension() {
        let flat = Region::new(vec![(5.0..=5.0).into(), (0.0..10.0).into()]).unwrap();
        let node: RegionNode<u32, String> = RegionNode::new(flat, 0, 2);
        assert_eq!(node.split_plan(), Some((1, 5.0)));

        let point_like = Region::new(vec![(5.0..=5.0).into(), (1.0..=1.0).into()]).unwrap();
        let node: RegionNode<u32, String> = RegionNode::new(point_like, 0, 2);
        assert!(node.split_plan().is_none());
    }
}
