use crate::{CompactId, Result, bits::hash64};

impl CompactId {
    /// Builds an identifier whose tail is derived from `content`.
    ///
    /// The tail is the low 21 bits of the content hash, so the same
    /// `(timestamp, content)` pair always yields the same identifier. This is
    /// meant for idempotent keys such as deduplicating a message that may be
    /// delivered more than once. Distinct content at the same millisecond
    /// collides with probability `2^-21` per pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `timestamp` does not fit in 43
    /// bits.
    ///
    /// # Example
    /// ```
    /// use timeid::CompactId;
    ///
    /// let a = CompactId::derive_from(1_000, b"order:42").unwrap();
    /// let b = CompactId::derive_from(1_000, b"order:42").unwrap();
    /// assert_eq!(a, b);
    /// ```
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn derive_from(timestamp: i64, content: &[u8]) -> Result<Self> {
        Self::from_hash(timestamp, hash64(content))
    }

    /// Builds an identifier from a caller supplied 64-bit hash, keeping its low
    /// 21 bits as the tail.
    ///
    /// # Errors
    ///
    /// Same as [`Self::derive_from`].
    pub fn from_hash(timestamp: i64, hash: u64) -> Result<Self> {
        Self::new(timestamp, hash & Self::TAIL_MASK)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CompactId, Error, bits::hash64};

    #[test]
    fn same_input_same_id() {
        let a = CompactId::derive_from(0, b"hello").unwrap();
        let b = CompactId::derive_from(0, b"hello").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_raw(), b.to_raw());
        assert_eq!(a.tail_bits(), hash64(b"hello") & CompactId::TAIL_MASK);
    }

    #[test]
    fn different_content_different_tail() {
        let a = CompactId::derive_from(0, b"hello").unwrap();
        let b = CompactId::derive_from(0, b"goodbye").unwrap();
        assert_eq!(a.timestamp_millis(), b.timestamp_millis());
        assert_ne!(a.tail_bits(), b.tail_bits());
    }

    #[test]
    fn tail_is_independent_of_time() {
        let base = CompactId::derive_from(0, b"hello").unwrap();
        let later = CompactId::derive_from(100, b"hello").unwrap();
        assert_eq!(later.timestamp_millis(), 100);
        assert_eq!(base.tail_bits(), later.tail_bits());
        assert!(base < later);
    }

    #[test]
    fn hash_keeps_low_21_bits() {
        let hash = 0b1011_0100_1000_1011_1110_0101_1010_1001_0011_0001_0011_1000_0000_1100_1110_1000;
        let id = CompactId::from_hash(0, hash).unwrap();
        assert_eq!(format!("{:b}", id.tail_bits()), "110000000110011101000");
    }

    #[test]
    fn timestamp_range_is_checked() {
        assert!(matches!(
            CompactId::derive_from(i64::MAX, b"x"),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
