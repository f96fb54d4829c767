use crate::region::Region;

/// A record stored in the tree: coordinates, an opaque payload and an
/// optional category tag.
///
/// Points are immutable once inserted. A point lives in exactly one leaf and
/// is moved, never copied, when that leaf splits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<D, C = String> {
    coords: Vec<f64>,
    data: D,
    category: Option<C>,
}

impl<D, C> Point<D, C> {
    pub fn new(coords: Vec<f64>, data: D, category: Option<C>) -> Self {
        Point {
            coords,
            data,
            category,
        }
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Returns the coordinate on `dimension`, if it exists.
    pub fn coord(&self, dimension: usize) -> Option<f64> {
        self.coords.get(dimension).copied()
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn category(&self) -> Option<&C> {
        self.category.as_ref()
    }

    pub fn into_parts(self) -> (Vec<f64>, D, Option<C>) {
        (self.coords, self.data, self.category)
    }

    /// Euclidean distance between this point and `coords`.
    pub fn distance_to(&self, coords: &[f64]) -> f64 {
        self.coords
            .iter()
            .zip(coords)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl<D, C: PartialEq> Point<D, C> {
    /// Checks the point against a query window and category filter.
    ///
    /// A `None` filter matches every point, tagged or not.
    pub fn matches(&self, region: &Region, category: Option<&C>) -> bool {
        region.contains_point(&self.coords)
            && category.map_or(true, |wanted| self.category.as_ref() == Some(wanted))
    }
}
