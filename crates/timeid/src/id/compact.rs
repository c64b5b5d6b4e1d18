use core::{fmt, str::FromStr};

use crate::{EncodeExt, Error, Id, Result, bits::mask_of};

/// A 64-bit time-ordered identifier.
///
/// - 43 bits timestamp (signed milliseconds since the Unix epoch)
/// - 21 bits tail (opaque payload: shard index and counter, or hash bits)
///
/// ```text
///  Bit Index:  63             21 20          0
///              +----------------+------------+
///  Field:      | timestamp (43) | tail (21)  |
///              +----------------+------------+
///              |<-- MSB -- 64 bits -- LSB -->|
/// ```
///
/// The raw value is stored as a two's complement `i64` and the timestamp is
/// recovered with an arithmetic shift, so identifiers minted before 1970 stay
/// orderable. Ordering by the raw value is ordering by `(timestamp, tail)`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CompactId {
    id: i64,
}

impl CompactId {
    pub const TIMESTAMP_BITS: u32 = 43;
    pub const TAIL_BITS: u32 = 21;

    pub const TAIL_MASK: u64 = mask_of(Self::TAIL_BITS);

    /// Smallest timestamp the 43-bit field can hold.
    pub const MIN_TIMESTAMP: i64 = -(1 << (Self::TIMESTAMP_BITS - 1));
    /// Largest timestamp the 43-bit field can hold.
    pub const MAX_TIMESTAMP: i64 = (1 << (Self::TIMESTAMP_BITS - 1)) - 1;

    /// Packs a timestamp and a tail value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `tail` does not fit in 21 bits or
    /// `timestamp` lies outside [`Self::MIN_TIMESTAMP`]..=[`Self::MAX_TIMESTAMP`].
    ///
    /// # Example
    /// ```
    /// use timeid::CompactId;
    ///
    /// let id = CompactId::new(1_700_000_000_000, 0b1010101011101).unwrap();
    /// assert_eq!(id.timestamp_millis(), 1_700_000_000_000);
    /// assert_eq!(id.tail_bits(), 0b1010101011101);
    /// assert!(CompactId::new(0, 1 << 21).is_err());
    /// ```
    pub fn new(timestamp: i64, tail: u64) -> Result<Self> {
        if tail > Self::TAIL_MASK {
            return Err(Error::invalid_argument(format!(
                "tail {tail} does not fit in {} bits",
                Self::TAIL_BITS
            )));
        }
        if !(Self::MIN_TIMESTAMP..=Self::MAX_TIMESTAMP).contains(&timestamp) {
            return Err(Error::invalid_argument(format!(
                "timestamp {timestamp} does not fit in {} bits",
                Self::TIMESTAMP_BITS
            )));
        }
        Ok(Self::from_parts(timestamp, tail))
    }

    /// Packs fields that are already known to be in range.
    pub(crate) const fn from_parts(timestamp: i64, tail: u64) -> Self {
        debug_assert!(tail <= Self::TAIL_MASK, "tail overflow");
        Self {
            id: (timestamp << Self::TAIL_BITS) | tail as i64,
        }
    }

    /// Creates an identifier for the current wall-clock millisecond with the
    /// given tail.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn now(tail: u64) -> Result<Self> {
        use crate::time::{SystemClock, TimeSource};
        Self::new(SystemClock.current_millis(), tail)
    }

    /// Extracts the timestamp, sign-extended from 43 bits.
    #[must_use]
    pub const fn timestamp_millis(&self) -> i64 {
        self.id >> Self::TAIL_BITS
    }

    /// Extracts the 21 low-order tail bits.
    #[must_use]
    pub const fn tail_bits(&self) -> u64 {
        self.id as u64 & Self::TAIL_MASK
    }

    /// Returns this identifier's timestamp as a [`std::time::SystemTime`].
    #[must_use]
    pub fn datetime(&self) -> std::time::SystemTime {
        let ms = self.timestamp_millis();
        let offset = core::time::Duration::from_millis(ms.unsigned_abs());
        if ms < 0 {
            std::time::UNIX_EPOCH - offset
        } else {
            std::time::UNIX_EPOCH + offset
        }
    }

    /// Converts this type into its raw type representation
    #[must_use]
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Converts a raw type into this type
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }
}

impl Id for CompactId {
    type Ty = i64;

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

/// Displays the 16-character lowercase hex form, which is safe to use as a
/// file name.
impl fmt::Display for CompactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CompactId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for CompactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactId")
            .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
            .field("timestamp", &self.timestamp_millis())
            .field("tail", &format_args!("0b{:021b}", self.tail_bits()))
            .finish()
    }
}
