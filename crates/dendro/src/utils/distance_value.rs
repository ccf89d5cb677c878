//! Traits for types that can be used as distance values.

use core::fmt::{Debug, Display};

/// A trait for types that can be used as distance values in linkage algorithms.
///
/// Single linkage only ever compares and copies distances, so any ordered
/// numeric type works, including the integer types. The `Bounded` requirement
/// supplies the sentinel used for "not yet merged" entries, and the primitive
/// conversions support the on-disk representation of linkage matrices.
///
/// We provide a blanket implementation for all types that satisfy the trait
/// bounds. This includes all primitive numeric types.
#[must_use]
pub trait DistanceValue:
    PartialOrd
    + Copy
    + Display
    + Debug
    + num_traits::Num
    + num_traits::Bounded
    + num_traits::ToPrimitive
    + num_traits::FromPrimitive
{
    /// Whether the value lies within the bounds of its type.
    ///
    /// NaN and the infinities fail this; every value of an integer type
    /// passes.
    #[must_use]
    fn is_finite(self) -> bool {
        (Self::min_value()..=Self::max_value()).contains(&self)
    }
}

/// Blanket implementation of `DistanceValue` for all types that satisfy the trait bounds.
impl<T> DistanceValue for T where
    T: PartialOrd
        + Copy
        + Display
        + Debug
        + num_traits::Num
        + num_traits::Bounded
        + num_traits::ToPrimitive
        + num_traits::FromPrimitive
{
}

/// A trait for types that can be used as distance values in linkage algorithms
/// that average distances, such as UPGMA.
///
/// We provide a blanket implementation for all types that satisfy the trait
/// bounds. This includes all primitive float types.
pub trait FloatDistanceValue: DistanceValue + num_traits::Float {
    /// The weight of a cluster of `size` items in a Lance-Williams update.
    fn from_cluster_size(size: usize) -> Self {
        Self::from_usize(size).unwrap_or_else(|| unreachable!("cluster sizes are representable in any float type"))
    }
}

impl<T> FloatDistanceValue for T where T: DistanceValue + num_traits::Float {}
