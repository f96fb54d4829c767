//! KdbIndex trait definition for shared spatial indexing.

use crate::errors::KdbResult;
use crate::point::Point;
use crate::region::Region;

/// A thread-safe point index with category filtering.
///
/// Implementations take `&self` for every operation and handle their own
/// synchronization, so one index can be shared between threads. Query
/// results are returned by value.
pub trait KdbIndex<D, C = String>: Send + Sync {
    /// Adds a point record to the index.
    fn insert(&self, coords: Vec<f64>, data: D, category: Option<C>) -> KdbResult<()>;

    /// Finds the points inside `region`, optionally restricted to `category`.
    fn query(&self, region: &Region, category: Option<&C>) -> KdbResult<Vec<Point<D, C>>>;

    /// Finds the points within Euclidean `radius` of `center`, nearest first.
    fn find_within_distance(
        &self,
        center: &[f64],
        radius: f64,
        category: Option<&C>,
    ) -> KdbResult<Vec<(Point<D, C>, f64)>> {
        // Default implementation filtering the bounding box query
        let window = Region::around(center, radius)?;
        let mut found: Vec<(Point<D, C>, f64)> = self
            .query(&window, category)?
            .into_iter()
            .filter_map(|point| {
                let distance = point.distance_to(center);
                (distance <= radius).then_some((point, distance))
            })
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(found)
    }

    /// Gets the number of stored point records.
    fn size(&self) -> usize;

    /// Removes all points from the index.
    fn clear(&self);
}
