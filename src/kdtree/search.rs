//! Nearest neighbor and radius queries against a built KDTree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo_traits::CoordTrait;
use log::trace;

use crate::error::{Result, SpatialIndexError};
use crate::kdtree::node::Node;
use crate::kdtree::KDTree;
use crate::pair::CoordinatePair;
use crate::r#type::IndexableNum;
use crate::vector::Vector;

/// A stored item found by a query, along with its distance from the probe.
#[derive(Debug)]
pub struct Neighbor<'a, E, N: IndexableNum> {
    /// The stored item.
    pub pair: &'a CoordinatePair<E, N>,
    /// Euclidean distance from the probe, over the indexed components.
    pub distance: f64,
}

impl<E, N: IndexableNum> Clone for Neighbor<'_, E, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, N: IndexableNum> Copy for Neighbor<'_, E, N> {}

impl<E, N: IndexableNum> PartialEq for Neighbor<'_, E, N> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl<E, N: IndexableNum> Eq for Neighbor<'_, E, N> {}

impl<E, N: IndexableNum> Ord for Neighbor<'_, E, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Stored coordinates are finite, so distances are never NaN
        self.distance.total_cmp(&other.distance)
    }
}

impl<E, N: IndexableNum> PartialOrd for Neighbor<'_, E, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E, N: IndexableNum> KDTree<E, N> {
    fn searchable_root(&self, probe: &Vector<N>) -> Result<Option<&Node<E, N>>> {
        if !self.built {
            return Err(SpatialIndexError::NotBuilt);
        }
        self.check_dimension(probe)?;
        Ok(self.root.as_deref())
    }

    /// The stored item closest to `probe`, without copying it.
    ///
    /// Returns `Ok(None)` if the tree was built over no items. When several items are equally
    /// close, which one is returned is unspecified.
    pub fn nearest_neighbor(&self, probe: &Vector<N>) -> Result<Option<Neighbor<'_, E, N>>> {
        let Some(root) = self.searchable_root(probe)? else {
            return Ok(None);
        };

        let mut best: Option<Neighbor<'_, E, N>> = None;
        let mut best_distance = f64::INFINITY;
        let mut visited = 0usize;

        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            visited += 1;
            let bound = current.distance_bound(probe, self.dim);
            match current {
                Node::Leaf(pair) => {
                    if bound > best_distance {
                        continue;
                    }
                    best_distance = bound;
                    best = Some(Neighbor {
                        pair,
                        distance: bound,
                    });
                }
                Node::Internal { .. } => {
                    let Some((near, far)) = current.children_by_side(probe) else {
                        continue;
                    };
                    // Note: pushed before `near` so that the near side is explored first
                    if bound < best_distance {
                        stack.push(far);
                    }
                    stack.push(near);
                }
            }
        }

        trace!("nearest: visited {visited} nodes");
        Ok(best)
    }

    /// Up to `k` stored items closest to `probe`, by ascending distance, without copying them.
    ///
    /// A bounded max-heap holds the best `k` candidates so far. Until it is full every leaf is a
    /// candidate and no branch is pruned. Once it is full, the distance of its worst candidate
    /// replaces the single best distance in the pruning rule.
    pub fn nearest_neighbors(&self, probe: &Vector<N>, k: usize) -> Result<Vec<Neighbor<'_, E, N>>> {
        let Some(root) = self.searchable_root(probe)? else {
            return Ok(vec![]);
        };
        if k == 0 {
            return Ok(vec![]);
        }

        let mut heap: BinaryHeap<Neighbor<'_, E, N>> = BinaryHeap::with_capacity(k + 1);

        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let bound = current.distance_bound(probe, self.dim);
            match current {
                Node::Leaf(pair) => {
                    if heap.len() == k && bound >= kth_distance(&heap, k) {
                        continue;
                    }
                    heap.push(Neighbor {
                        pair,
                        distance: bound,
                    });
                    if heap.len() > k {
                        heap.pop();
                    }
                }
                Node::Internal { .. } => {
                    let Some((near, far)) = current.children_by_side(probe) else {
                        continue;
                    };
                    if heap.len() < k || bound < kth_distance(&heap, k) {
                        stack.push(far);
                    }
                    stack.push(near);
                }
            }
        }

        Ok(heap.into_sorted_vec())
    }

    /// All stored items within `radius` of `probe` (inclusive), by ascending distance.
    pub fn within(&self, probe: &Vector<N>, radius: f64) -> Result<Vec<Neighbor<'_, E, N>>> {
        let Some(root) = self.searchable_root(probe)? else {
            return Ok(vec![]);
        };

        let mut result = vec![];
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let bound = current.distance_bound(probe, self.dim);
            match current {
                Node::Leaf(pair) => {
                    if bound <= radius {
                        result.push(Neighbor {
                            pair,
                            distance: bound,
                        });
                    }
                }
                Node::Internal { .. } => {
                    let Some((near, far)) = current.children_by_side(probe) else {
                        continue;
                    };
                    stack.push(near);
                    if bound <= radius {
                        stack.push(far);
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// The stored item closest to a geo-traits coordinate.
    ///
    /// The coordinate's components (x, y, then z and/or m where present) form the probe vector.
    pub fn nearest_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
    ) -> Result<Option<Neighbor<'_, E, N>>> {
        let probe = Vector::new(
            (0..coord.dim().size())
                .map(|n| coord.nth_or_panic(n))
                .collect(),
        );
        self.nearest_neighbor(&probe)
    }
}

/// The distance of the k-th best candidate. Only meaningful once `k` candidates are known.
#[inline]
fn kth_distance<E, N: IndexableNum>(heap: &BinaryHeap<Neighbor<'_, E, N>>, k: usize) -> f64 {
    debug_assert_eq!(heap.len(), k);
    heap.peek().map_or(f64::INFINITY, |worst| worst.distance)
}

#[cfg(feature = "rayon")]
impl<E: Clone + Send + Sync, N: IndexableNum> KDTree<E, N> {
    /// Answer [`nearest`][crate::SpatialIndex::nearest] for many probes in parallel.
    ///
    /// Results are in the same order as `probes`.
    pub fn nearest_batch(&self, probes: &[Vector<N>]) -> Result<Vec<Option<CoordinatePair<E, N>>>> {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

        probes
            .par_iter()
            .map(|probe| -> Result<_> {
                Ok(self
                    .nearest_neighbor(probe)?
                    .map(|neighbor| neighbor.pair.clone()))
            })
            .collect()
    }
}
