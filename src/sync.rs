//! Sharing a built KDTree between threads while rebuilding it.
//!
//! A [`KDTree`] that is no longer mutated can be queried from any number of threads without
//! locking. [`SharedKDTree`] extends that to trees that are rebuilt over time: a new tree is built
//! off to the side and swapped in atomically, and queries already running finish against the tree
//! they started on.

use std::sync::Arc;

use arc_swap::ArcSwap;
use log::debug;

use crate::error::{Result, SpatialIndexError};
use crate::kdtree::KDTree;
use crate::pair::CoordinatePair;
use crate::r#trait::SpatialIndex;
use crate::r#type::IndexableNum;
use crate::vector::Vector;

/// An atomically replaceable snapshot of a built [`KDTree`].
#[derive(Debug)]
pub struct SharedKDTree<E, N: IndexableNum = f64> {
    current: ArcSwap<KDTree<E, N>>,
}

impl<E: Clone, N: IndexableNum> SharedKDTree<E, N> {
    /// Wrap a built tree.
    ///
    /// Fails with [`NotBuilt`][SpatialIndexError::NotBuilt] if `tree` requires a build.
    pub fn new(tree: KDTree<E, N>) -> Result<Self> {
        ensure_built(&tree)?;
        Ok(Self {
            current: ArcSwap::from_pointee(tree),
        })
    }

    /// Replace the current tree with `tree`, returning the previous snapshot.
    ///
    /// Queries holding the previous snapshot are unaffected. Fails with
    /// [`NotBuilt`][SpatialIndexError::NotBuilt] if `tree` requires a build, leaving the current
    /// tree in place.
    pub fn publish(&self, tree: KDTree<E, N>) -> Result<Arc<KDTree<E, N>>> {
        ensure_built(&tree)?;
        debug!("publishing kd-tree snapshot of {} items", tree.count());
        Ok(self.current.swap(Arc::new(tree)))
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<KDTree<E, N>> {
        self.current.load_full()
    }

    /// The item closest to `probe` in the current snapshot.
    pub fn nearest(&self, probe: &Vector<N>) -> Result<Option<CoordinatePair<E, N>>> {
        self.current.load().nearest(probe)
    }

    /// Up to `k` items closest to `probe` in the current snapshot, by ascending distance.
    pub fn nearest_k(&self, probe: &Vector<N>, k: usize) -> Result<Vec<CoordinatePair<E, N>>> {
        self.current.load().nearest_k(probe, k)
    }
}

fn ensure_built<E: Clone, N: IndexableNum>(tree: &KDTree<E, N>) -> Result<()> {
    if tree.build_required() {
        return Err(SpatialIndexError::NotBuilt);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::thread;

    use super::*;

    fn built(points: &[[f64; 2]], tag: &'static str) -> KDTree<&'static str> {
        let mut tree = KDTree::new(2);
        for p in points {
            tree.add(&Vector::from(*p), tag).unwrap();
        }
        tree.build();
        tree
    }

    #[test]
    fn rejects_unbuilt_trees() {
        let tree: KDTree<&str> = KDTree::new(2);
        assert_eq!(
            SharedKDTree::new(tree).err(),
            Some(SpatialIndexError::NotBuilt)
        );

        let shared = SharedKDTree::new(built(&[[0., 0.]], "old")).unwrap();
        let mut unbuilt = KDTree::new(2);
        unbuilt.add(&Vector::from([1., 1.]), "new").unwrap();
        assert!(shared.publish(unbuilt).is_err());

        let found = shared.nearest(&Vector::from([1., 1.])).unwrap().unwrap();
        assert_eq!(*found.value(), "old");
    }

    #[test]
    fn snapshots_survive_publish() {
        let shared = SharedKDTree::new(built(&[[0., 0.], [10., 10.]], "old")).unwrap();
        let before = shared.snapshot();

        let previous = shared.publish(built(&[[5., 5.]], "new")).unwrap();
        assert!(Arc::ptr_eq(&before, &previous));

        let probe = Vector::from([9., 9.]);
        let old = before.nearest(&probe).unwrap().unwrap();
        assert_eq!(old.location().as_slice(), &[10., 10.]);
        assert_eq!(*old.value(), "old");

        let new = shared.nearest(&probe).unwrap().unwrap();
        assert_eq!(*new.value(), "new");
        assert_eq!(shared.nearest_k(&probe, 5).unwrap().len(), 1);
        assert!(format!("{shared:?}").starts_with("SharedKDTree"));
    }

    #[test]
    fn concurrent_queries_during_publish() {
        let shared = Arc::new(SharedKDTree::new(built(&[[0., 0.]], "a")).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let found = shared.nearest(&Vector::from([0., 0.])).unwrap().unwrap();
                        assert!(["a", "b"].contains(found.value()));
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let tag = if i % 2 == 0 { "b" } else { "a" };
            shared.publish(built(&[[0., 0.]], tag)).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
