//! Mean-split construction of the K-D tree.

use log::trace;

use crate::kdtree::node::Node;
use crate::pair::CoordinatePair;
use crate::r#type::IndexableNum;

/// How a working set is divided along one axis.
#[derive(Debug, Clone, Copy)]
enum Split {
    /// Items at or below the threshold go left, the rest go right.
    At(f64),
    /// Every item shares the same value on this axis.
    Constant(f64),
}

enum Job<E, N: IndexableNum> {
    /// Build the subtree holding `items`, splitting on axis `level % dim`.
    ///
    /// `stalled` counts the consecutive axes that could not separate these items.
    Partition {
        items: Vec<CoordinatePair<E, N>>,
        level: usize,
        stalled: usize,
    },
    /// Pop the two most recently built subtrees and join them under a new internal node.
    Join { axis: usize, threshold: f64 },
}

/// Build a tree over a copy of `pairs`.
///
/// Returns `None` if `pairs` is empty. Each level splits on the axis `level % dim`, at the
/// arithmetic mean of the items' values on that axis. The mean is not the median, so skewed
/// inputs give unbalanced trees.
///
/// The work list replaces recursion, so unbalanced trees cannot exhaust the call stack.
pub(crate) fn build_tree<E: Clone, N: IndexableNum>(
    pairs: &[CoordinatePair<E, N>],
    dim: usize,
) -> Option<Box<Node<E, N>>> {
    debug_assert!(dim > 0);
    if pairs.is_empty() {
        return None;
    }

    let mut jobs = vec![Job::Partition {
        items: pairs.to_vec(),
        level: 0,
        stalled: 0,
    }];
    let mut built: Vec<Box<Node<E, N>>> = Vec::new();

    while let Some(job) = jobs.pop() {
        match job {
            Job::Join { axis, threshold } => {
                // right was pushed last
                let right = built.pop()?;
                let left = built.pop()?;
                built.push(Box::new(Node::Internal {
                    axis,
                    threshold,
                    left,
                    right,
                }));
            }
            Job::Partition {
                mut items,
                level,
                stalled,
            } => {
                if items.len() == 1 {
                    built.extend(items.pop().map(|pair| Box::new(Node::Leaf(pair))));
                    continue;
                }

                let axis = level % dim;
                match choose_split(&items, axis) {
                    Split::At(threshold) => {
                        let (left, right): (Vec<_>, Vec<_>) = items
                            .into_iter()
                            .partition(|pair| pair.vector()[axis].as_f64() <= threshold);
                        push_children(&mut jobs, axis, threshold, (left, right), level, 0);
                    }
                    Split::Constant(value) if stalled + 1 >= dim => {
                        // the items coincide on every axis, any halving is as good as another
                        trace!(
                            "splitting {} coincident items in halves on axis {axis}",
                            items.len()
                        );
                        let right = items.split_off(items.len() / 2);
                        push_children(&mut jobs, axis, value, (items, right), level, stalled + 1);
                    }
                    Split::Constant(_) => {
                        jobs.push(Job::Partition {
                            items,
                            level: level + 1,
                            stalled: stalled + 1,
                        });
                    }
                }
            }
        }
    }

    debug_assert_eq!(built.len(), 1);
    built.pop()
}

fn push_children<E, N: IndexableNum>(
    jobs: &mut Vec<Job<E, N>>,
    axis: usize,
    threshold: f64,
    (left, right): (Vec<CoordinatePair<E, N>>, Vec<CoordinatePair<E, N>>),
    level: usize,
    stalled: usize,
) {
    debug_assert!(!left.is_empty() && !right.is_empty());
    // Note: these are pushed in backwards order to what gets popped
    jobs.push(Job::Join { axis, threshold });
    jobs.push(Job::Partition {
        items: right,
        level: level + 1,
        stalled,
    });
    jobs.push(Job::Partition {
        items: left,
        level: level + 1,
        stalled,
    });
}

/// Pick the threshold for `items` along `axis`.
///
/// The threshold is the running mean of the axis values. When rounding leaves every item at or
/// below the mean even though the values differ, the axis minimum is used instead so that both
/// sides stay non-empty.
///
/// The mean is updated as `mean + value / k - mean / k`, which cannot overflow for finite values
/// even when they span more than `f64::MAX`.
fn choose_split<E, N: IndexableNum>(items: &[CoordinatePair<E, N>], axis: usize) -> Split {
    let mut mean = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (i, pair) in items.iter().enumerate() {
        let value = pair.vector()[axis].as_f64();
        let count = (i + 1) as f64;
        mean += value / count - mean / count;
        min = min.min(value);
        max = max.max(value);
    }

    if min == max {
        Split::Constant(min)
    } else if min <= mean && mean < max {
        Split::At(mean)
    } else {
        trace!("mean {mean} does not separate {} items on axis {axis}", items.len());
        Split::At(min)
    }
}
