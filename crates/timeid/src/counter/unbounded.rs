use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Result, mutex::Mutex, mutex::lock};

/// A counter store that remembers every timestamp it has ever seen.
///
/// Memory grows with the number of distinct milliseconds requested for the
/// lifetime of the store. Prefer [`BoundedCounter`] for long-running
/// producers.
///
/// [`BoundedCounter`]: crate::BoundedCounter
#[derive(Debug, Default)]
pub struct UnboundedCounter {
    counts: Mutex<HashMap<i64, u64>>,
}

impl UnboundedCounter {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `0, 1, 2, ...` on successive calls for the same `timestamp`.
    ///
    /// # Errors
    ///
    /// Only fails if the lock was poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_count(&self, timestamp: i64) -> Result<u64> {
        let mut counts = lock(&self.counts)?;
        let next = counts.entry(timestamp).or_insert(0);
        let count = *next;
        *next += 1;
        Ok(count)
    }

    /// Number of timestamps tracked.
    ///
    /// # Errors
    ///
    /// Only fails if the lock was poisoned.
    pub fn tracked_keys(&self) -> Result<usize> {
        Ok(lock(&self.counts)?.len())
    }
}
