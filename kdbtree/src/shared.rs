//! Thread-safe handle over a [`KdbTree`].

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::KdbResult;
use crate::integrity::IntegrityReport;
use crate::kdb_index::KdbIndex;
use crate::point::Point;
use crate::region::Region;
use crate::stats::TreeStats;
use crate::tree::KdbTree;

/// A cloneable, thread-safe KDB-tree.
///
/// Inserts hold the write lock for the whole insert, splits and root
/// promotion included, so readers only ever see complete trees. Queries run
/// concurrently under the read lock and return owned copies of the matches.
///
/// # Examples
///
/// ```rust
/// use kdbtree::{KdbIndex, KdbTree, Region, SharedKdbTree};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let domain = Region::new(vec![(0.0..10.0).into(), (0.0..10.0).into()])?;
/// let index: SharedKdbTree<u32> = SharedKdbTree::new(KdbTree::new(domain));
///
/// let writer = index.clone();
/// std::thread::spawn(move || writer.insert(vec![1.0, 1.0], 7, None))
///     .join()
///     .unwrap()?;
///
/// let near = index.find_within_distance(&[1.5, 1.0], 1.0, None)?;
/// assert_eq!(near.len(), 1);
/// assert_eq!(*near[0].0.data(), 7);
/// # Ok(())
/// # }
/// ```
pub struct SharedKdbTree<D, C = String> {
    inner: Arc<RwLock<KdbTree<D, C>>>,
}

impl<D, C> Clone for SharedKdbTree<D, C> {
    fn clone(&self) -> Self {
        SharedKdbTree {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, C: Clone + Eq + Hash> SharedKdbTree<D, C> {
    pub fn new(tree: KdbTree<D, C>) -> Self {
        SharedKdbTree {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Runs `f` against the tree under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&KdbTree<D, C>) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.read().stats()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.inner.read().check_integrity()
    }
}

impl<D, C: Clone + Eq + Hash> From<KdbTree<D, C>> for SharedKdbTree<D, C> {
    fn from(tree: KdbTree<D, C>) -> Self {
        SharedKdbTree::new(tree)
    }
}

impl<D, C> KdbIndex<D, C> for SharedKdbTree<D, C>
where
    D: Clone + Send + Sync,
    C: Clone + Eq + Hash + Send + Sync,
{
    fn insert(&self, coords: Vec<f64>, data: D, category: Option<C>) -> KdbResult<()> {
        self.inner.write().insert(coords, data, category)
    }

    fn query(&self, region: &Region, category: Option<&C>) -> KdbResult<Vec<Point<D, C>>> {
        let tree = self.inner.read();
        let found = tree.query(region, category)?;
        Ok(found.into_iter().cloned().collect())
    }

    fn size(&self) -> usize {
        self.inner.read().len()
    }

    fn clear(&self) {
        self.inner.write().clear();
    }
}
