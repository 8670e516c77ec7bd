use log::debug;

use crate::error::{Result, SpatialIndexError};
use crate::kdtree::builder::build_tree;
use crate::kdtree::node::{teardown, Node, TreeStats};
use crate::pair::CoordinatePair;
use crate::r#trait::SpatialIndex;
use crate::r#type::IndexableNum;
use crate::vector::Vector;

/// A K-D tree keyed by n-dimensional vectors.
///
/// Items are buffered with [`add`][SpatialIndex::add] and become searchable once
/// [`build`][SpatialIndex::build] materializes the tree. Any later `add` invalidates the tree
/// until the next build. Once built and no longer mutated, the tree can be shared across threads
/// and queried concurrently.
///
/// ```
/// use vector_index::kdtree::KDTree;
/// use vector_index::{SpatialIndex, Vector};
///
/// let mut tree = KDTree::new(2);
/// tree.add(&Vector::from([1., 1.]), "A").unwrap();
/// tree.add(&Vector::from([5., 5.]), "B").unwrap();
/// tree.add(&Vector::from([1., 5.]), "C").unwrap();
/// tree.build();
///
/// let nearest = tree.nearest(&Vector::from([0., 0.])).unwrap().unwrap();
/// assert_eq!(*nearest.value(), "A");
/// ```
#[derive(Debug)]
pub struct KDTree<E, N: IndexableNum = f64> {
    pub(crate) dim: usize,
    pub(crate) pending: Vec<CoordinatePair<E, N>>,
    pub(crate) root: Option<Box<Node<E, N>>>,
    pub(crate) built: bool,
}

impl<E, N: IndexableNum> KDTree<E, N> {
    /// Create a new, empty tree searching over the first `dim` components of its vectors.
    pub fn new(dim: usize) -> Self {
        Self::with_capacity(dim, 0)
    }

    /// Create a new, empty tree with room for `capacity` items before reallocating.
    pub fn with_capacity(dim: usize, capacity: usize) -> Self {
        assert!(dim > 0, "dimension must be at least 1");

        Self {
            dim,
            pending: Vec::with_capacity(capacity),
            root: None,
            built: false,
        }
    }

    /// The number of nodes in the built tree, leaves included.
    ///
    /// Returns `None` while a build is required.
    pub fn node_count(&self) -> Option<usize> {
        self.stats().map(|stats| stats.nodes)
    }

    /// The number of levels of the built tree, from the root to the deepest leaf.
    ///
    /// The split threshold is the mean rather than the median, so this can approach the number
    /// of items for skewed inputs. Returns `None` while a build is required.
    pub fn depth(&self) -> Option<usize> {
        self.stats().map(|stats| stats.depth)
    }

    fn stats(&self) -> Option<TreeStats> {
        if !self.built {
            return None;
        }
        Some(
            self.root
                .as_deref()
                .map(TreeStats::of)
                .unwrap_or_default(),
        )
    }

    /// Ensure `vector` can be stored or used as a probe by this tree.
    pub(crate) fn check_dimension(&self, vector: &Vector<N>) -> Result<()> {
        if vector.len() < self.dim {
            return Err(SpatialIndexError::InvalidDimension {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn drop_tree(&mut self) {
        self.built = false;
        if let Some(root) = self.root.take() {
            teardown(root);
        }
    }
}

impl<E: Clone, N: IndexableNum> SpatialIndex<E, N> for KDTree<E, N> {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn build_required(&self) -> bool {
        !self.built
    }

    fn count(&self) -> usize {
        self.pending.len()
    }

    fn add(&mut self, vector: &Vector<N>, value: E) -> Result<()> {
        self.check_dimension(vector)?;
        if let Some(axis) = vector.as_slice()[..self.dim]
            .iter()
            .position(|c| !c.is_finite())
        {
            return Err(SpatialIndexError::NonFiniteCoordinate { axis });
        }

        self.pending.push(CoordinatePair::new(value, vector));
        self.drop_tree();
        Ok(())
    }

    fn build(&mut self) {
        self.drop_tree();
        self.root = build_tree(&self.pending, self.dim);
        self.built = true;

        if log::log_enabled!(log::Level::Debug) {
            let stats = self.stats().unwrap_or_default();
            debug!(
                "built kd-tree over {} items: {} nodes, depth {}",
                self.pending.len(),
                stats.nodes,
                stats.depth
            );
        }
    }

    fn clear(&mut self) {
        debug!("clearing kd-tree of {} items", self.pending.len());
        self.pending.clear();
        self.drop_tree();
    }

    fn nearest(&self, probe: &Vector<N>) -> Result<Option<CoordinatePair<E, N>>> {
        Ok(self
            .nearest_neighbor(probe)?
            .map(|neighbor| neighbor.pair.clone()))
    }

    fn nearest_k(&self, probe: &Vector<N>, k: usize) -> Result<Vec<CoordinatePair<E, N>>> {
        Ok(self
            .nearest_neighbors(probe, k)?
            .into_iter()
            .map(|neighbor| neighbor.pair.clone())
            .collect())
    }

    fn pairs<'a>(&'a self) -> impl Iterator<Item = &'a CoordinatePair<E, N>>
    where
        E: 'a,
    {
        self.pending.iter()
    }
}

impl<E, N: IndexableNum> Drop for KDTree<E, N> {
    fn drop(&mut self) {
        self.drop_tree();
    }
}
