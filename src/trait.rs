use crate::error::Result;
use crate::pair::CoordinatePair;
use crate::r#type::IndexableNum;
use crate::vector::Vector;

/// The capability contract shared by spatial index strategies.
///
/// Items are buffered with [`add`][Self::add] and only become searchable after
/// [`build`][Self::build]. Querying while [`build_required`][Self::build_required] is `true` fails
/// with [`NotBuilt`][crate::SpatialIndexError::NotBuilt].
pub trait SpatialIndex<E, N: IndexableNum> {
    /// The number of vector components this index searches over.
    fn dimension(&self) -> usize;

    /// Returns `true` until the first successful build, and again after any mutation.
    fn build_required(&self) -> bool;

    /// The number of items added since the index was created or last cleared.
    fn count(&self) -> usize;

    /// Returns `true` if no items have been added.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Buffer a new item.
    ///
    /// Fails with [`InvalidDimension`][crate::SpatialIndexError::InvalidDimension] if `vector`
    /// has fewer components than [`dimension`][Self::dimension].
    fn add(&mut self, vector: &Vector<N>, value: E) -> Result<()>;

    /// Make all buffered items searchable, replacing any previous structure.
    fn build(&mut self);

    /// Remove all items and any built structure.
    fn clear(&mut self);

    /// The item closest to `probe`, or `None` if the index holds no items.
    fn nearest(&self, probe: &Vector<N>) -> Result<Option<CoordinatePair<E, N>>>;

    /// Up to `k` items closest to `probe`, by ascending distance.
    fn nearest_k(&self, probe: &Vector<N>, k: usize) -> Result<Vec<CoordinatePair<E, N>>>;

    /// All items, in insertion order.
    fn pairs<'a>(&'a self) -> impl Iterator<Item = &'a CoordinatePair<E, N>>
    where
        E: 'a;

    /// The values of all items, in insertion order.
    fn values<'a>(&'a self) -> impl Iterator<Item = &'a E>
    where
        E: 'a,
    {
        self.pairs().map(|pair| pair.value())
    }

    /// Copies of the vectors of all items, in insertion order.
    fn vectors<'a>(&'a self) -> impl Iterator<Item = Vector<N>> + 'a
    where
        E: 'a,
    {
        self.pairs().map(|pair| pair.location())
    }
}
