use core::{cmp::Ordering, fmt, str::FromStr};

use crate::{EncodeExt, Error, Id, Result, rand::RandSource};

/// A 128-bit time-ordered identifier with 86 bits of randomness.
///
/// - 42 bits timestamp (signed milliseconds since the Unix epoch, truncated)
/// - 86 bits random
///
/// ```text
///  Bit Index:  127            86 85           0
///              +----------------+-------------+
///  Field:      | timestamp (42) | random (86) |
///              +----------------+-------------+
///              |<-- MSB -- 128 bits -- LSB -->|
/// ```
///
/// The field boundary falls inside byte 5 of the binary form: its top two
/// bits belong to the timestamp and its low six bits to the random field.
/// Because `42 = 7 * 6`, the first seven base64 characters encode only time
/// and the remaining fifteen encode only randomness.
///
/// Uniqueness is probabilistic. Two identifiers minted for the same
/// millisecond collide only if their 86 random bits do.
///
/// Identifiers order by timestamp first and by the full raw value second.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WideId {
    id: u128,
}

impl WideId {
    pub const TIMESTAMP_BITS: u32 = 42;
    pub const RANDOM_BITS: u32 = 86;

    pub const RANDOM_SHIFT: u32 = 0;
    pub const TIMESTAMP_SHIFT: u32 = Self::RANDOM_SHIFT + Self::RANDOM_BITS;

    pub const RANDOM_MASK: u128 = (1 << Self::RANDOM_BITS) - 1;
    /// Every bit position owned by the timestamp, in place.
    pub const TIMESTAMP_MASK: u128 = !Self::RANDOM_MASK;

    /// Number of leading base64 characters that encode only the timestamp.
    pub const TIME_BASE64_CHARS: usize = (Self::TIMESTAMP_BITS / 6) as usize;

    /// Builds an identifier from a timestamp and random bits.
    ///
    /// The timestamp keeps its low 42 bits; the random value keeps its low 86
    /// bits. Neither input can make construction fail.
    #[must_use]
    pub const fn from(timestamp: i64, random: u128) -> Self {
        let t = (timestamp as u128) << Self::TIMESTAMP_SHIFT;
        let r = (random & Self::RANDOM_MASK) << Self::RANDOM_SHIFT;
        Self { id: t | r }
    }

    /// Generates a `WideId` for the current wall-clock millisecond using the
    /// built-in [`ThreadRandom`] generator.
    ///
    /// [`ThreadRandom`]: crate::ThreadRandom
    #[cfg_attr(docsrs, doc(cfg(feature = "thread-random")))]
    #[cfg(feature = "thread-random")]
    #[must_use]
    pub fn now() -> Self {
        use crate::time::{SystemClock, TimeSource};
        Self::from_timestamp(SystemClock.current_millis())
    }

    /// Generates a `WideId` for `timestamp` using the built-in
    /// [`ThreadRandom`] generator.
    ///
    /// [`ThreadRandom`]: crate::ThreadRandom
    #[cfg_attr(docsrs, doc(cfg(feature = "thread-random")))]
    #[cfg(feature = "thread-random")]
    #[must_use]
    pub fn from_timestamp(timestamp: i64) -> Self {
        Self::from_timestamp_and_rand(timestamp, &crate::rand::ThreadRandom)
    }

    /// Generates a `WideId` for `timestamp` from a caller supplied
    /// [`RandSource`].
    ///
    /// Production callers should pass a cryptographically secure source;
    /// tests can pass a fixed one to get reproducible identifiers.
    ///
    /// # Example
    /// ```
    /// use timeid::{RandSource, WideId};
    ///
    /// struct FixedRand;
    /// impl RandSource<u128> for FixedRand {
    ///     fn rand(&self) -> u128 {
    ///         42
    ///     }
    /// }
    ///
    /// let id = WideId::from_timestamp_and_rand(1_000, &FixedRand);
    /// assert_eq!(id.timestamp_millis(), 1_000);
    /// assert_eq!(id.random(), 42);
    /// ```
    #[must_use]
    pub fn from_timestamp_and_rand<R>(timestamp: i64, rng: &R) -> Self
    where
        R: RandSource<u128>,
    {
        Self::from(timestamp, rng.rand())
    }

    /// Extracts the timestamp, sign-extended from 42 bits.
    #[must_use]
    pub const fn timestamp_millis(&self) -> i64 {
        let high = (self.id >> 64) as u64 as i64;
        high >> (Self::TIMESTAMP_SHIFT - 64)
    }

    /// Extracts the 86 random bits.
    #[must_use]
    pub const fn random(&self) -> u128 {
        (self.id >> Self::RANDOM_SHIFT) & Self::RANDOM_MASK
    }

    /// Returns the binary form with every random bit cleared.
    #[must_use]
    pub const fn time_only_bytes(&self) -> [u8; 16] {
        (self.id & Self::TIMESTAMP_MASK).to_be_bytes()
    }

    /// Returns the binary form with every timestamp bit cleared, including the
    /// two timestamp bits of the shared byte.
    ///
    /// OR-ing this with [`Self::time_only_bytes`] of any identifier yields a
    /// valid binary form carrying that identifier's timestamp and this
    /// identifier's randomness.
    #[must_use]
    pub const fn random_only_bytes(&self) -> [u8; 16] {
        (self.id & Self::RANDOM_MASK).to_be_bytes()
    }

    /// Returns the trailing fifteen characters of [`EncodeExt::to_base64`],
    /// which depend only on the random field.
    #[must_use]
    pub fn rng_bits_as_base64(&self) -> String {
        let mut full = self.to_base64();
        full.split_off(Self::TIME_BASE64_CHARS)
    }

    /// Maps the random field onto `[0, 1)`.
    ///
    /// The low 53 random bits become the mantissa of an `f64`, so the result is
    /// uniformly distributed on a grid of `2^-53`. Sorting a keyed collection by
    /// this value and taking the first `k` entries yields an unweighted random
    /// sample.
    #[must_use]
    pub fn as_uniform_random(&self) -> f64 {
        const MANTISSA_BITS: u32 = f64::MANTISSA_DIGITS;
        let bits = (self.random() & ((1 << MANTISSA_BITS) - 1)) as u64;
        bits as f64 / (1_u64 << MANTISSA_BITS) as f64
    }

    /// Converts this type into its raw type representation
    #[must_use]
    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    /// Converts a raw type into this type
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self { id: raw }
    }
}

impl Id for WideId {
    type Ty = u128;

    fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis()
    }

    fn to_raw(&self) -> Self::Ty {
        self.to_raw()
    }

    fn from_raw(raw: Self::Ty) -> Self {
        Self::from_raw(raw)
    }
}

impl Ord for WideId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp_millis()
            .cmp(&other.timestamp_millis())
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for WideId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Displays the 22-character URL-safe base64 form, which is safe to use as a
/// file name.
impl fmt::Display for WideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for WideId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl fmt::Debug for WideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WideId")
            .field("id", &format_args!("0x{:032x}", self.id))
            .field("timestamp", &self.timestamp_millis())
            .field("random", &format_args!("0x{:022x}", self.random()))
            .finish()
    }
}
