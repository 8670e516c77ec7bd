use std::fmt::Debug;

use num_traits::{Float, NumCast, ToPrimitive};

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Splitting thresholds and
/// distances are always computed in `f64`, so only floating point scalars that widen losslessly
/// are accepted.
pub trait IndexableNum:
    private::Sealed + Float + NumCast + ToPrimitive + Debug + Send + Sync + 'static
{
    /// Widen this value to `f64`.
    #[inline]
    fn as_f64(self) -> f64 {
        // f32 and f64 always widen to f64
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl IndexableNum for f32 {}

impl IndexableNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
