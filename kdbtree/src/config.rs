//! Configuration management for KDB-trees.

use crate::constants::{DEFAULT_POINT_CAPACITY, DEFAULT_REGION_CAPACITY, MIN_CAPACITY};
use crate::errors::{KdbError, KdbResult};
use crate::region::Region;
use crate::tree::KdbTree;
use std::hash::Hash;
use std::marker::PhantomData;

/// Capacity limits of a tree.
///
/// # Examples
///
/// ```rust
/// use kdbtree::TreeConfig;
///
/// let config = TreeConfig::default();
/// assert_eq!(config.region_capacity, 5);
/// assert_eq!(config.point_capacity, 8);
///
/// assert!(TreeConfig { region_capacity: 1, point_capacity: 8 }.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeConfig {
    /// Maximum children of a region node before it splits
    pub region_capacity: usize,
    /// Maximum points of a point node before it splits
    pub point_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            region_capacity: DEFAULT_REGION_CAPACITY,
            point_capacity: DEFAULT_POINT_CAPACITY,
        }
    }
}

impl TreeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::Configuration`] if either capacity is below 2.
    pub fn new(region_capacity: usize, point_capacity: usize) -> KdbResult<Self> {
        let config = TreeConfig {
            region_capacity,
            point_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both capacities allow splitting to converge.
    pub fn validate(&self) -> KdbResult<()> {
        if self.region_capacity < MIN_CAPACITY {
            return Err(KdbError::Configuration(format!(
                "region capacity must be at least {}, got {}",
                MIN_CAPACITY, self.region_capacity
            )));
        }
        if self.point_capacity < MIN_CAPACITY {
            return Err(KdbError::Configuration(format!(
                "point capacity must be at least {}, got {}",
                MIN_CAPACITY, self.point_capacity
            )));
        }
        Ok(())
    }
}

/// Builder for creating a [`KdbTree`].
///
/// Capacities are validated when [`build`](KdbTreeBuilder::build) is called.
///
/// # Examples
///
/// ```rust
/// use kdbtree::{KdbTree, Region};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let domain = Region::new(vec![(-90.0..90.0).into(), (-180.0..180.0).into()])?;
/// let tree: KdbTree<&str> = KdbTree::builder(domain)
///     .region_capacity(4)
///     .point_capacity(16)
///     .build()?;
/// assert_eq!(tree.config().point_capacity, 16);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KdbTreeBuilder<D, C = String> {
    domain: Region,
    config: TreeConfig,
    _marker: PhantomData<fn() -> (D, C)>,
}

impl<D, C: Clone + Eq + Hash> KdbTreeBuilder<D, C> {
    /// Creates a builder over `domain` with the default capacities.
    pub fn new(domain: Region) -> Self {
        KdbTreeBuilder {
            domain,
            config: TreeConfig::default(),
            _marker: PhantomData,
        }
    }

    pub fn region_capacity(mut self, region_capacity: usize) -> Self {
        self.config.region_capacity = region_capacity;
        self
    }

    pub fn point_capacity(mut self, point_capacity: usize) -> Self {
        self.config.point_capacity = point_capacity;
        self
    }

    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and creates an empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`KdbError::Configuration`] if a capacity is below 2.
    pub fn build(self) -> KdbResult<KdbTree<D, C>> {
        KdbTree::with_config(self.domain, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Region {
        Region::new(vec![(0.0..10.0).into(), (0.0..10.0).into()]).unwrap()
    }

    #[test]
    fn test_default_matches_constants() {
        let config = TreeConfig::default();
        assert_eq!(config.region_capacity, DEFAULT_REGION_CAPACITY);
        assert_eq!(config.point_capacity, DEFAULT_POINT_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_validates() {
        assert!(TreeConfig::new(2, 2).is_ok());
        assert!(matches!(
            TreeConfig::new(1, 2),
            Err(KdbError::Configuration(_))
        ));
        assert!(matches!(
            TreeConfig::new(2, 0),
            Err(KdbError::Configuration(_))
        ));
    }

    #[test]
    fn test_builder() {
        let tree: KdbTree<u32> = KdbTreeBuilder::new(domain())
            .region_capacity(3)
            .point_capacity(4)
            .build()
            .unwrap();
        assert_eq!(tree.config(), &TreeConfig::new(3, 4).unwrap());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_builder_with_config() {
        let config = TreeConfig::new(6, 10).unwrap();
        let tree: KdbTree<u32> = KdbTreeBuilder::new(domain())
            .point_capacity(3)
            .config(config)
            .build()
            .unwrap();
        assert_eq!(tree.config(), &config);

        let result: KdbResult<KdbTree<u32>> = KdbTreeBuilder::new(domain())
            .config(TreeConfig {
                region_capacity: 1,
                point_capacity: 10,
            })
            .build();
        assert!(matches!(result, Err(KdbError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_small_capacity() {
        let result: KdbResult<KdbTree<u32>> =
            KdbTreeBuilder::new(domain()).point_capacity(1).build();
        assert!(matches!(result, Err(KdbError::Configuration(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialization() {
        let config = TreeConfig::new(3, 12).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"region_capacity":3,"point_capacity":12}"#);
        let deserialized: TreeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
