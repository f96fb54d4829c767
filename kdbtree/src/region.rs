use std::fmt;
use std::ops::{Range, RangeInclusive};

use crate::errors::{KdbError, KdbResult};

/// A one-dimensional range with an inclusive lower bound.
///
/// The upper bound is either exclusive (`lower..upper`) or inclusive
/// (`lower..=upper`). Splitting a region always produces a half-open low
/// side, so both flavours appear inside a tree even when the domain uses
/// only one of them.
///
/// # Examples
///
/// ```rust
/// use kdbtree::Interval;
///
/// let latitude: Interval = (-90.0..90.0).into();
/// assert!(latitude.contains(-90.0));
/// assert!(!latitude.contains(90.0));
///
/// let closed = Interval::closed(4.0, 6.0);
/// assert!(closed.contains(6.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    lower: f64,
    upper: f64,
    upper_closed: bool,
}

impl Interval {
    /// Creates the interval `[lower, upper)`.
    pub fn half_open(lower: f64, upper: f64) -> Interval {
        Interval {
            lower,
            upper,
            upper_closed: false,
        }
    }

    /// Creates the interval `[lower, upper]`.
    pub fn closed(lower: f64, upper: f64) -> Interval {
        Interval {
            lower,
            upper,
            upper_closed: true,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if the upper bound belongs to the interval.
    pub fn is_upper_closed(&self) -> bool {
        self.upper_closed
    }

    /// Checks that `lower <= upper` and neither bound is NaN.
    pub fn is_valid(&self) -> bool {
        self.lower <= self.upper
    }

    /// Returns `true` if no value lies in the interval.
    pub fn is_empty(&self) -> bool {
        !self.is_valid() || (self.lower == self.upper && !self.upper_closed)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns the geometric center of the interval.
    pub fn midpoint(&self) -> f64 {
        self.lower + (self.upper - self.lower) / 2.0
    }

    /// Checks if a value lies within the interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.reaches(value)
    }

    /// Checks if `other` is fully nested inside this interval.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.lower <= other.lower
            && (other.upper < self.upper
                || (other.upper == self.upper && (self.upper_closed || !other.upper_closed)))
    }

    /// Checks if the two intervals share at least one value.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.reaches(self.lower)
            && self.reaches(other.lower)
    }

    /// Splits at `cutter` into `[lower, cutter)` and `[cutter, upper]`, the
    /// high side keeping this interval's upper bound.
    pub(crate) fn split_at(&self, cutter: f64) -> (Interval, Interval) {
        (
            Interval::half_open(self.lower, cutter),
            Interval {
                lower: cutter,
                upper: self.upper,
                upper_closed: self.upper_closed,
            },
        )
    }

    // whether `value` is below the upper bound
    fn reaches(&self, value: f64) -> bool {
        value < self.upper || (self.upper_closed && value == self.upper)
    }
}

impl From<Range<f64>> for Interval {
    fn from(range: Range<f64>) -> Self {
        Interval::half_open(range.start, range.end)
    }
}

impl From<RangeInclusive<f64>> for Interval {
    fn from(range: RangeInclusive<f64>) -> Self {
        let (lower, upper) = range.into_inner();
        Interval::closed(lower, upper)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let close = if self.upper_closed { ']' } else { ')' };
        write!(f, "[{}, {}{}", self.lower, self.upper, close)
    }
}

/// An axis-aligned hyperrectangle: one [`Interval`] per dimension.
///
/// `Region` is used as the tree's domain, as the bounding box of every
/// node and as the query window.
///
/// # Examples
///
/// ```rust
/// use kdbtree::Region;
///
/// let domain = Region::new(vec![(0.0..10.0).into(), (0.0..10.0).into()]).unwrap();
/// assert!(domain.contains_point(&[5.0, 5.0]));
///
/// let (low, high) = domain.split(0, 5.0).unwrap();
/// assert!(low.contains_point(&[4.9, 9.0]));
/// assert!(high.contains_point(&[5.0, 9.0]));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    intervals: Vec<Interval>,
}

impl Region {
    /// Creates a region from one interval per dimension.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::InvalidRegion`] if `intervals` is empty or any
    /// interval has `lower > upper` or a NaN bound.
    pub fn new(intervals: Vec<Interval>) -> KdbResult<Region> {
        if intervals.is_empty() {
            return Err(KdbError::InvalidRegion(
                "a region needs at least one dimension".into(),
            ));
        }
        if let Some((dimension, interval)) =
            intervals.iter().enumerate().find(|(_, i)| !i.is_valid())
        {
            return Err(KdbError::InvalidRegion(format!(
                "interval {} on dimension {} has lower bound above upper bound",
                interval, dimension
            )));
        }
        Ok(Region { intervals })
    }

    /// Creates the closed box `[c - half_extent, c + half_extent]` around
    /// each center coordinate.
    pub fn around(center: &[f64], half_extent: f64) -> KdbResult<Region> {
        if half_extent.is_nan() || half_extent < 0.0 {
            return Err(KdbError::InvalidRegion(format!(
                "half extent must be non-negative, got {}",
                half_extent
            )));
        }
        Region::new(
            center
                .iter()
                .map(|c| Interval::closed(c - half_extent, c + half_extent))
                .collect(),
        )
    }

    pub fn dimensions(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn interval(&self, dimension: usize) -> Option<&Interval> {
        self.intervals.get(dimension)
    }

    /// Returns the product of all interval widths.
    pub fn volume(&self) -> f64 {
        self.intervals.iter().map(Interval::width).product()
    }

    /// Checks if every coordinate lies within its dimension's interval.
    ///
    /// Coordinates of the wrong dimensionality are never contained.
    pub fn contains_point(&self, coords: &[f64]) -> bool {
        coords.len() == self.intervals.len()
            && self
                .intervals
                .iter()
                .zip(coords)
                .all(|(interval, &value)| interval.contains(value))
    }

    /// Checks if `other` is fully nested inside this region.
    pub fn contains_region(&self, other: &Region) -> bool {
        other.dimensions() == self.dimensions()
            && self
                .intervals
                .iter()
                .zip(&other.intervals)
                .all(|(outer, inner)| outer.contains_interval(inner))
    }

    /// Checks if this region overlaps `other` in every dimension.
    pub fn intersects(&self, other: &Region) -> bool {
        other.dimensions() == self.dimensions()
            && self
                .intervals
                .iter()
                .zip(&other.intervals)
                .all(|(a, b)| a.overlaps(b))
    }

    /// Cuts the region along `dimension` at `cutter`.
    ///
    /// The low region ends (exclusively) at `cutter`, the high region starts
    /// at `cutter`; together they partition this region exactly.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::Domain`] if `dimension` does not exist or
    /// `cutter` lies outside that dimension's bounds.
    pub fn split(&self, dimension: usize, cutter: f64) -> KdbResult<(Region, Region)> {
        let interval = self.interval(dimension).ok_or_else(|| {
            KdbError::Domain(format!(
                "split dimension {} out of range for {}-dimensional region",
                dimension,
                self.dimensions()
            ))
        })?;

        if cutter.is_nan() || cutter < interval.lower() || cutter > interval.upper() {
            return Err(KdbError::Domain(format!(
                "cutter {} lies outside {} on dimension {}",
                cutter, interval, dimension
            )));
        }

        let (low_interval, high_interval) = interval.split_at(cutter);
        let mut low = self.intervals.clone();
        let mut high = self.intervals.clone();
        low[dimension] = low_interval;
        high[dimension] = high_interval;

        Ok((Region { intervals: low }, Region { intervals: high }))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", interval)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lower: f64, upper: f64) -> Region {
        Region::new(vec![(lower..upper).into(), (lower..upper).into()]).unwrap()
    }

    fn closed_square(lower: f64, upper: f64) -> Region {
        Region::new(vec![(lower..=upper).into(), (lower..=upper).into()]).unwrap()
    }

    #[test]
    fn test_interval_contains() {
        let half_open = Interval::half_open(0.0, 10.0);
        assert!(half_open.contains(0.0));
        assert!(half_open.contains(9.999));
        assert!(!half_open.contains(10.0));
        assert!(!half_open.contains(-0.1));

        let closed = Interval::closed(0.0, 10.0);
        assert!(closed.contains(10.0));
        assert!(!closed.contains(10.1));
        assert!(!closed.contains(f64::NAN));
    }

    #[test]
    fn test_interval_from_ranges() {
        let a: Interval = (1.0..2.0).into();
        let b: Interval = (1.0..=2.0).into();
        assert_eq!(a, Interval::half_open(1.0, 2.0));
        assert_eq!(b, Interval::closed(1.0, 2.0));
        assert!(!a.is_upper_closed());
        assert!(b.is_upper_closed());
    }

    #[test]
    fn test_interval_empty_and_valid() {
        assert!(Interval::half_open(5.0, 5.0).is_empty());
        assert!(!Interval::closed(5.0, 5.0).is_empty());
        assert!(!Interval::half_open(6.0, 5.0).is_valid());
        assert!(!Interval::half_open(f64::NAN, 5.0).is_valid());
    }

    #[test]
    fn test_interval_overlaps_respects_open_bound() {
        let low = Interval::half_open(0.0, 5.0);
        let high = Interval::half_open(5.0, 10.0);
        let query = Interval::closed(4.0, 6.0);

        assert!(!low.overlaps(&high));
        assert!(!high.overlaps(&low));
        assert!(low.overlaps(&query));
        assert!(high.overlaps(&query));

        let touching = Interval::closed(0.0, 5.0);
        assert!(touching.overlaps(&high));
        assert!(!Interval::half_open(5.0, 5.0).overlaps(&Interval::closed(0.0, 10.0)));
    }

    #[test]
    fn test_interval_contains_interval() {
        let outer = Interval::half_open(0.0, 10.0);
        assert!(outer.contains_interval(&Interval::half_open(0.0, 5.0)));
        assert!(outer.contains_interval(&Interval::half_open(5.0, 10.0)));
        assert!(!outer.contains_interval(&Interval::closed(5.0, 10.0)));
        assert!(Interval::closed(0.0, 10.0).contains_interval(&Interval::closed(5.0, 10.0)));
        assert!(!outer.contains_interval(&Interval::half_open(-1.0, 5.0)));
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(Interval::half_open(0.0, 10.0).to_string(), "[0, 10)");
        assert_eq!(Interval::closed(-1.5, 2.0).to_string(), "[-1.5, 2]");
    }

    #[test]
    fn test_new_rejects_invalid_regions() {
        assert!(matches!(
            Region::new(Vec::new()),
            Err(KdbError::InvalidRegion(_))
        ));
        assert!(matches!(
            Region::new(vec![(0.0..10.0).into(), Interval::half_open(3.0, 1.0)]),
            Err(KdbError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_contains_point() {
        let region = square(0.0, 10.0);
        assert!(region.contains_point(&[0.0, 0.0]));
        assert!(region.contains_point(&[5.0, 9.5]));
        assert!(!region.contains_point(&[10.0, 5.0]));
        assert!(!region.contains_point(&[11.0, 11.0]));
        assert!(!region.contains_point(&[5.0]));
        assert!(!region.contains_point(&[5.0, 5.0, 5.0]));

        assert!(closed_square(0.0, 10.0).contains_point(&[10.0, 10.0]));
    }

    #[test]
    fn test_contains_region() {
        let outer = square(0.0, 10.0);
        let inner = square(2.0, 8.0);
        let partial = square(5.0, 15.0);

        assert!(outer.contains_region(&inner));
        assert!(outer.contains_region(&outer));
        assert!(!outer.contains_region(&partial));
        assert!(!inner.contains_region(&outer));
        assert!(!outer.contains_region(&closed_square(0.0, 10.0)));
    }

    #[test]
    fn test_intersects() {
        let a = square(0.0, 10.0);
        let b = square(5.0, 15.0);
        let c = square(20.0, 30.0);
        let touching = square(10.0, 20.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        // a is open at 10 so it does not reach the touching square
        assert!(!a.intersects(&touching));
        assert!(closed_square(0.0, 10.0).intersects(&touching));
    }

    #[test]
    fn test_split_partitions_region() {
        let region = square(0.0, 10.0);
        let (low, high) = region.split(0, 4.0).unwrap();

        assert_eq!(low.interval(0), Some(&Interval::half_open(0.0, 4.0)));
        assert_eq!(high.interval(0), Some(&Interval::half_open(4.0, 10.0)));
        assert_eq!(low.interval(1), region.interval(1));
        assert_eq!(high.interval(1), region.interval(1));

        assert!(!low.intersects(&high));
        assert!(region.contains_region(&low));
        assert!(region.contains_region(&high));
        assert_eq!(low.volume() + high.volume(), region.volume());
    }

    #[test]
    fn test_split_keeps_closed_upper_bound() {
        let region = closed_square(0.0, 10.0);
        let (low, high) = region.split(1, 5.0).unwrap();

        assert!(!low.contains_point(&[10.0, 5.0]));
        assert!(high.contains_point(&[10.0, 5.0]));
        assert!(high.contains_point(&[10.0, 10.0]));
        assert!(region.contains_region(&high));
    }

    #[test]
    fn test_split_rejects_bad_cutter() {
        let region = square(0.0, 10.0);
        assert!(matches!(region.split(0, 11.0), Err(KdbError::Domain(_))));
        assert!(matches!(region.split(0, f64::NAN), Err(KdbError::Domain(_))));
        assert!(matches!(region.split(2, 5.0), Err(KdbError::Domain(_))));
    }

    #[test]
    fn test_around() {
        let region = Region::around(&[2.0, -4.0], 0.5).unwrap();
        assert_eq!(region.dimensions(), 2);
        assert!(region.contains_point(&[1.5, -4.5]));
        assert!(region.contains_point(&[2.5, -3.5]));
        assert!(!region.contains_point(&[2.75, -4.0]));

        assert!(Region::around(&[0.0], -1.0).is_err());
        assert!(Region::around(&[], 1.0).is_err());
    }

    #[test]
    fn test_display() {
        let region = Region::new(vec![(-90.0..90.0).into(), (-180.0..=180.0).into()]).unwrap();
        assert_eq!(region.to_string(), "[-90, 90) x [-180, 180]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialization() {
        let region = Region::new(vec![(0.0..10.0).into(), (1.5..=2.5).into()]).unwrap();
        let json = serde_json::to_string(&region).unwrap();
        let deserialized: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(region, deserialized);
    }
}
