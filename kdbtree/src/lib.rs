//! # KdbTree - In-Memory KDB-Tree Spatial Index
//!
//! This crate provides a KDB-tree: a balanced, multi-dimensional point index
//! over a fixed domain, with optional category tags on every point and
//! category-pruned range queries.
//!
//! ## Features
//!
//! - **Balanced**: The tree grows at the root, so all leaves share one depth
//! - **Disjoint Regions**: Sibling nodes partition their parent's region
//! - **Category Pruning**: Subtrees that hold no point of the wanted category are skipped
//! - **Any Dimensionality**: Fixed per tree by its domain
//! - **Thread Safe Handle**: [`SharedKdbTree`] for concurrent readers and writers
//!
//! ## Quick Start
//!
//! ```rust
//! use kdbtree::{KdbTree, Region};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let domain = Region::new(vec![(-90.0..90.0).into(), (-180.0..180.0).into()])?;
//! let mut tree = KdbTree::new(domain);
//!
//! tree.insert(vec![37.77, -122.42], "Blue Bottle", Some("coffee".to_string()))?;
//! tree.insert(vec![37.78, -122.41], "Philz", Some("coffee".to_string()))?;
//! tree.insert(vec![37.76, -122.43], "Tartine", Some("bakery".to_string()))?;
//!
//! let window = Region::around(&[37.77, -122.42], 0.05)?;
//! let coffee = tree.query(&window, Some(&"coffee".to_string()))?;
//! assert_eq!(coffee.len(), 2);
//!
//! let everything = tree.query(&window, None)?;
//! assert_eq!(everything.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod integrity;
pub mod kdb_index;
pub mod node;
pub mod point;
pub mod region;
pub mod shared;
pub mod stats;
pub mod tree;

pub use config::{KdbTreeBuilder, TreeConfig};
pub use errors::{KdbError, KdbResult};
pub use integrity::IntegrityReport;
pub use kdb_index::KdbIndex;
pub use node::{Node, PointNode, RegionNode};
pub use point::Point;
pub use region::{Interval, Region};
pub use shared::SharedKdbTree;
pub use stats::TreeStats;
pub use tree::KdbTree;
