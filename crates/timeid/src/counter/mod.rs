//! Per-millisecond counters backing [`ShardedIdFactory`].
//!
//! A [`CounterStore`] hands out `0, 1, 2, ...` for each timestamp key. Keys
//! are independent of one another. Both variants are internally
//! synchronized: the read-and-increment, the recency refresh, and any
//! eviction happen under one lock, so concurrent callers never observe a
//! duplicate count or a half-evicted key.
//!
//! [`ShardedIdFactory`]: crate::ShardedIdFactory

mod bounded;
mod unbounded;

pub use bounded::*;
pub use unbounded::*;

use crate::Result;

/// The counting strategy used by a shard.
///
/// Only two strategies exist, so this is a closed enum rather than a trait;
/// matching on it makes the [`Error::StaleKey`] path of the bounded variant
/// explicit.
///
/// [`Error::StaleKey`]: crate::Error::StaleKey
#[derive(Debug)]
pub enum CounterStore {
    /// Keeps every key for the lifetime of the store.
    Unbounded(UnboundedCounter),
    /// Keeps a fixed number of live keys and retires the least recently used.
    Bounded(BoundedCounter),
}

impl CounterStore {
    /// Creates an [`UnboundedCounter`] store.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::Unbounded(UnboundedCounter::new())
    }

    /// Creates a [`BoundedCounter`] store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `capacity` is `0`.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn bounded(capacity: usize) -> Result<Self> {
        BoundedCounter::new(capacity).map(Self::Bounded)
    }

    /// Returns the next count for `timestamp`.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleKey`] if a bounded store already evicted `timestamp`
    /// - `Error::LockPoisoned` if the lock was poisoned (std mutex only)
    ///
    /// [`Error::StaleKey`]: crate::Error::StaleKey
    #[inline]
    pub fn next_count(&self, timestamp: i64) -> Result<u64> {
        match self {
            Self::Unbounded(counter) => counter.next_count(timestamp),
            Self::Bounded(counter) => counter.next_count(timestamp),
        }
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::unbounded()
    }
}
