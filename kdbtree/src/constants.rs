//! Constants for the KDB-tree implementation.

/// Maximum children per region node before it splits
pub const DEFAULT_REGION_CAPACITY: usize = 5;

/// Maximum points per point node before it splits
pub const DEFAULT_POINT_CAPACITY: usize = 8;

/// Smallest capacity for which splitting converges
pub const MIN_CAPACITY: usize = 2;

/// Split dimension assigned to the root
pub const ROOT_SPLIT_DIMENSION: usize = 0;
