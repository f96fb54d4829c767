use std::collections::HashSet;
use std::hash::Hash;

use super::InsertOutcome;
use crate::errors::{KdbError, KdbResult};
use crate::point::Point;
use crate::region::Region;

/// Leaf node storing the point records of one region.
///
/// A point node splits by data distribution: the cut lies at the mean
/// coordinate of its points along the split dimension.
#[derive(Debug)]
pub struct PointNode<D, C> {
    region: Region,
    split_dimension: usize,
    capacity: usize,
    points: Vec<Point<D, C>>,
    categories: HashSet<C>,
}

impl<D, C> PointNode<D, C> {
    pub(crate) fn new(region: Region, split_dimension: usize, capacity: usize) -> Self {
        PointNode {
            region,
            split_dimension,
            capacity,
            points: Vec::new(),
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

    pub fn points(&self) -> &[Point<D, C>] {
        &self.points
    }

    pub fn categories(&self) -> &HashSet<C> {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if every stored point has the same coordinates.
    ///
    /// Such a leaf cannot be split and is allowed to grow beyond capacity.
    pub fn is_duplicate_cluster(&self) -> bool {
        match self.points.split_first() {
            Some((first, rest)) => rest.iter().all(|p| p.coords() == first.coords()),
            None => true,
        }
    }

    /// Finds the first dimension, starting at the node's split dimension,
    /// along which the points can be separated, and the cutter to use.
    pub(crate) fn split_plan(&self) -> Option<(usize, f64)> {
        let dimensions = self.region.dimensions();
        (0..dimensions)
            .map(|offset| (self.split_dimension + offset) % dimensions)
            .find_map(|dimension| self.mean_cutter(dimension).map(|cutter| (dimension, cutter)))
    }

    // Mean coordinate along `dimension`, kept inside (min, max] so both
    // halves receive at least one point. None when all points coincide on
    // that dimension.
    fn mean_cutter(&self, dimension: usize) -> Option<f64> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for value in self.points.iter().filter_map(|p| p.coord(dimension)) {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }

        if min >= max {
            return None;
        }

        let mean = sum / self.points.len() as f64;
        if min < mean && mean <= max {
            Some(mean)
        } else {
            Some(max)
        }
    }
}

impl<D, C: Clone + Eq + Hash> PointNode<D, C> {
    /// Stores `point` in this leaf.
    ///
    /// Returns [`InsertOutcome::Overflowed`] when the leaf now holds more
    /// points than its capacity and can be split. A leaf that cannot be
    /// split (all points share the same coordinates) absorbs the point and
    /// reports [`InsertOutcome::Inserted`].
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::Domain`] if the point lies outside the leaf's region.
    pub(crate) fn insert(&mut self, point: Point<D, C>) -> KdbResult<InsertOutcome> {
        if !self.region.contains_point(point.coords()) {
            return Err(KdbError::Domain(format!(
                "point {:?} lies outside leaf region {}",
                point.coords(),
                self.region
            )));
        }

        self.absorb(point);

        if self.points.len() <= self.capacity {
            return Ok(InsertOutcome::Inserted);
        }

        if self.split_plan().is_some() {
            Ok(InsertOutcome::Overflowed)
        } else {
            log::debug!(
                "Leaf {} holds {} points at identical coordinates (capacity {})",
                self.region,
                self.points.len(),
                self.capacity
            );
            Ok(InsertOutcome::Inserted)
        }
    }

    pub(crate) fn query<'a>(
        &'a self,
        region: &Region,
        category: Option<&C>,
        results: &mut Vec<&'a Point<D, C>>,
    ) {
        results.extend(self.points.iter().filter(|p| p.matches(region, category)));
    }

    /// Splits the leaf at the mean of its points, cycling past dimensions on
    /// which all points coincide.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::CannotSplit`] if the points coincide on every
    /// dimension.
    pub(crate) fn split(self) -> KdbResult<(PointNode<D, C>, PointNode<D, C>)> {
        let (dimension, cutter) = self.split_plan().ok_or_else(|| {
            KdbError::CannotSplit(format!(
                "all {} points in leaf {} share the same coordinates",
                self.points.len(),
                self.region
            ))
        })?;
        self.split_at(dimension, cutter)
    }

    /// Splits the leaf's region at `cutter` and moves every point into the
    /// half containing it.
    pub(crate) fn split_at(
        self,
        dimension: usize,
        cutter: f64,
    ) -> KdbResult<(PointNode<D, C>, PointNode<D, C>)> {
        log::trace!(
            "Splitting leaf {} ({} points) on dimension {} at {}",
            self.region,
            self.points.len(),
            dimension,
            cutter
        );

        let (low_region, high_region) = self.region.split(dimension, cutter)?;
        let next_dimension = (dimension + 1) % self.region.dimensions();

        let mut low = PointNode::new(low_region, next_dimension, self.capacity);
        let mut high = PointNode::new(high_region, next_dimension, self.capacity);

        for point in self.points {
            if low.region.contains_point(point.coords()) {
                low.absorb(point);
            } else {
                high.absorb(point);
            }
        }

        Ok((low, high))
    }

    // Appends without a capacity check. Used for redistribution, where the
    // halves of a split never exceed what the parent held.
    fn absorb(&mut self, point: Point<D, C>) {
        if let Some(category) = point.category() {
            if !self.categories.contains(category) {
                self.categories.insert(category.clone());
            }
        }
        self.points.push(point);
    }
}
