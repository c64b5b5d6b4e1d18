use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

use crate::{Error, Result, mutex::Mutex, mutex::lock};

/// A counter store that tracks at most `capacity` live timestamps.
///
/// When a new timestamp would exceed the capacity, the least recently used
/// live timestamp is evicted and *retired*. Asking for a retired timestamp
/// fails with [`Error::StaleKey`] instead of restarting its count at zero,
/// which could re-issue an identifier handed out before the eviction.
///
/// Requests are expected to arrive in roughly non-decreasing timestamp order,
/// so in steady state only the oldest milliseconds are evicted.
#[derive(Debug)]
pub struct BoundedCounter {
    capacity: usize,
    state: Mutex<LruCounts>,
}

impl BoundedCounter {
    /// Creates an empty store holding at most `capacity` live timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `capacity` is `0`.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument(
                "bounded counter capacity must be at least 1",
            ));
        }
        Ok(Self {
            capacity,
            state: Mutex::new(LruCounts::new(capacity)),
        })
    }

    /// Returns `0, 1, 2, ...` on successive calls for the same `timestamp` and
    /// marks it as most recently used.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleKey`] if `timestamp` was evicted earlier
    /// - [`Error::LockPoisoned`] if the lock was poisoned (std mutex only)
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_count(&self, timestamp: i64) -> Result<u64> {
        lock(&self.state)?.next_count(timestamp)
    }

    /// Maximum number of live timestamps.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live timestamps.
    ///
    /// # Errors
    ///
    /// Only fails if the lock was poisoned.
    pub fn tracked_keys(&self) -> Result<usize> {
        Ok(lock(&self.state)?.live.len())
    }

    /// Whether `timestamp` was evicted and can no longer be counted.
    ///
    /// # Errors
    ///
    /// Only fails if the lock was poisoned.
    pub fn is_retired(&self, timestamp: i64) -> Result<bool> {
        Ok(lock(&self.state)?.retired.contains(timestamp))
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    next: u64,
    touched: u64,
}

/// Live counts indexed twice: by timestamp for lookup and by last-touch tick
/// for eviction order. Ticks are unique and strictly increasing, so the first
/// entry of `recency` is always the least recently used key.
#[derive(Debug)]
struct LruCounts {
    capacity: usize,
    tick: u64,
    live: HashMap<i64, Slot>,
    recency: BTreeMap<u64, i64>,
    retired: RetiredRanges,
}

impl LruCounts {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            live: HashMap::with_capacity(capacity),
            recency: BTreeMap::new(),
            retired: RetiredRanges::default(),
        }
    }

    fn next_count(&mut self, timestamp: i64) -> Result<u64> {
        self.tick += 1;
        let tick = self.tick;

        if let Some(slot) = self.live.get_mut(&timestamp) {
            self.recency.remove(&slot.touched);
            self.recency.insert(tick, timestamp);
            slot.touched = tick;
            let count = slot.next;
            slot.next += 1;
            return Ok(count);
        }

        if self.retired.contains(timestamp) {
            return Err(Error::StaleKey { timestamp });
        }

        if self.live.len() >= self.capacity {
            self.evict_oldest();
        }
        self.live.insert(
            timestamp,
            Slot {
                next: 1,
                touched: tick,
            },
        );
        self.recency.insert(tick, timestamp);
        Ok(0)
    }

    fn evict_oldest(&mut self) {
        if let Some((_, oldest)) = self.recency.pop_first() {
            self.live.remove(&oldest);
            self.retired.insert(oldest);
            #[cfg(feature = "tracing")]
            debug!(timestamp = oldest, "evicted counter");
        }
    }
}

/// Retired timestamps stored as disjoint inclusive ranges, `start -> end`.
///
/// Adjacent ranges are merged on insert, so a store fed increasing
/// consecutive timestamps keeps a single range no matter how many keys it
/// has retired. Timestamps between two ranges were never seen and stay
/// available.
#[derive(Debug, Default)]
struct RetiredRanges {
    ranges: BTreeMap<i64, i64>,
}

impl RetiredRanges {
    fn contains(&self, timestamp: i64) -> bool {
        self.ranges
            .range(..=timestamp)
            .next_back()
            .is_some_and(|(_, &end)| timestamp <= end)
    }

    fn insert(&mut self, timestamp: i64) {
        if self.contains(timestamp) {
            return;
        }

        let left = timestamp.checked_sub(1).and_then(|before| {
            self.ranges
                .range(..=before)
                .next_back()
                .filter(|(_, end)| **end == before)
                .map(|(start, _)| *start)
        });
        let start = match left {
            Some(left_start) => {
                self.ranges.remove(&left_start);
                left_start
            }
            None => timestamp,
        };
        let end = timestamp
            .checked_add(1)
            .and_then(|after| self.ranges.remove(&after))
            .unwrap_or(timestamp);

        self.ranges.insert(start, end);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.ranges.len()
    }
}
