use core::fmt;
use core::hash::Hash;

use crate::encoding::BeBytes;

/// A trait for time-ordered identifiers that wrap a primitive scalar.
///
/// This abstracts over the raw scalar behind an ID (`i64` for
/// [`CompactId`], `u128` for [`WideId`]). Every bit pattern of the raw scalar
/// is a valid identifier, so conversion in both directions is infallible.
///
/// [`CompactId`]: crate::CompactId
/// [`WideId`]: crate::WideId
pub trait Id:
    Copy + Clone + fmt::Display + PartialOrd + Ord + PartialEq + Eq + Hash + fmt::Debug
{
    /// Scalar type backing the identifier.
    type Ty: Copy + Clone + fmt::Debug + fmt::LowerHex + Eq + Hash + BeBytes;

    /// Milliseconds since the Unix epoch embedded in the identifier.
    fn timestamp_millis(&self) -> i64;

    /// Converts this type into its raw type representation
    fn to_raw(&self) -> Self::Ty;

    /// Converts a raw type into this type
    fn from_raw(raw: Self::Ty) -> Self;
}
