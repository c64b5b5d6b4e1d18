/// A trait for random sources that return random integers.
///
/// Wide identifiers draw their random field from a `RandSource<u128>`, so a
/// cryptographically secure generator can be swapped for a deterministic one
/// in tests.
///
/// # Example
/// ```
/// use timeid::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u128> for FixedRand {
///     fn rand(&self) -> u128 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&self) -> T;
}

impl<T, R> RandSource<T> for &R
where
    R: RandSource<T> + ?Sized,
{
    fn rand(&self) -> T {
        (**self).rand()
    }
}
