/// A result type defaulting to the crate-wide [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `timeid` can produce.
///
/// None of these are retried internally. [`Error::BudgetExhausted`] is the
/// only variant a caller is expected to recover from, by asking again with a
/// later timestamp.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A constructor or helper received parameters outside its domain, such as
    /// a zero bit width or a shard index that does not fit the team.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human readable description of the rejected parameter.
        reason: String,
    },

    /// Decoding bytes, hex, or base64 into an identifier failed.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] EncodingError),

    /// A shard already issued every tail value it owns for `timestamp`.
    #[error("id budget of {limit} exhausted for timestamp {timestamp}")]
    BudgetExhausted {
        /// The millisecond that ran out of identifiers.
        timestamp: i64,
        /// How many identifiers the shard may issue per millisecond.
        limit: u64,
    },

    /// A bounded counter store was asked for a timestamp it already evicted.
    ///
    /// Restarting that counter at zero could re-issue an identifier handed
    /// out before the eviction, so the request is refused instead.
    #[error("counter for timestamp {timestamp} was evicted")]
    StaleKey {
        /// The retired timestamp key.
        timestamp: i64,
    },

    /// A counter lock was poisoned by a thread that panicked while holding
    /// it.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists
    /// without the `parking-lot` feature.
    #[cfg(not(feature = "parking-lot"))]
    #[error("counter lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Reasons a textual or binary identifier could not be decoded.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum EncodingError {
    /// The input had the wrong number of bytes or characters.
    #[error("invalid length: expected {expected}, got {len}")]
    InvalidLength {
        /// Required length for the identifier type and encoding.
        expected: usize,
        /// Length that was supplied.
        len: usize,
    },

    /// The input contained characters outside the lowercase/uppercase hex
    /// alphabet.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The input was not canonical, unpadded, URL-safe base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
