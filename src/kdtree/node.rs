//! Nodes of the K-D tree.

use crate::pair::CoordinatePair;
use crate::r#type::IndexableNum;
use crate::vector::Vector;

/// A node in the KDTree.
///
/// Children are exclusively owned by their parent, and the whole tree is replaced at once on
/// rebuild.
#[derive(Debug)]
pub(crate) enum Node<E, N: IndexableNum> {
    /// A single stored item.
    Leaf(CoordinatePair<E, N>),

    /// A split of the remaining items along one axis.
    ///
    /// Items with `vector[axis] > threshold` are stored under `right`, all others under `left`.
    /// Coincident items are the exception: they are split in halves and both halves lie exactly
    /// on the threshold.
    Internal {
        axis: usize,
        threshold: f64,
        left: Box<Node<E, N>>,
        right: Box<Node<E, N>>,
    },
}

impl<E, N: IndexableNum> Node<E, N> {
    /// A lower bound on the distance from `probe` to anything stored under this node.
    ///
    /// For a leaf this is the true distance over the first `dim` components. For an internal node
    /// it is the distance from `probe` to the splitting hyperplane, which bounds the distance to
    /// any item on the far side of the split.
    #[inline]
    pub(crate) fn distance_bound(&self, probe: &Vector<N>, dim: usize) -> f64 {
        match self {
            Node::Leaf(pair) => pair.vector().distance_prefix(probe, dim),
            Node::Internal {
                axis, threshold, ..
            } => (probe[*axis].as_f64() - threshold).abs(),
        }
    }

    /// The children of an internal node ordered `(near, far)` relative to `probe`.
    ///
    /// Returns `None` for a leaf.
    #[inline]
    pub(crate) fn children_by_side(&self, probe: &Vector<N>) -> Option<(&Self, &Self)> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal {
                axis,
                threshold,
                left,
                right,
            } => {
                if probe[*axis].as_f64() > *threshold {
                    Some((&**right, &**left))
                } else {
                    Some((&**left, &**right))
                }
            }
        }
    }
}

/// Drop a tree without recursing once per level.
///
/// Degenerate inputs can produce trees as deep as they are large, and the default recursive drop
/// of nested boxes would then exhaust the call stack.
pub(crate) fn teardown<E, N: IndexableNum>(root: Box<Node<E, N>>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Node::Internal { left, right, .. } = *node {
            stack.push(left);
            stack.push(right);
        }
    }
}

/// Summary statistics of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TreeStats {
    /// Total number of nodes, leaves included.
    pub(crate) nodes: usize,
    /// Number of levels from the root to the deepest leaf, root included.
    pub(crate) depth: usize,
}

impl TreeStats {
    pub(crate) fn of<E, N: IndexableNum>(root: &Node<E, N>) -> Self {
        let mut stats = TreeStats::default();
        let mut stack = vec![(root, 1)];
        while let Some((node, level)) = stack.pop() {
            stats.nodes += 1;
            stats.depth = stats.depth.max(level);
            if let Node::Internal { left, right, .. } = node {
                stack.push((&**left, level + 1));
                stack.push((&**right, level + 1));
            }
        }
        stats
    }
}
