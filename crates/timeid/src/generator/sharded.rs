#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

use crate::{
    CompactId, CounterStore, Error, Result, ShardIdentity, ShardMember,
    time::{SystemClock, TimeSource},
};

/// Issues [`CompactId`]s for one shard of a team.
///
/// Each identifier's tail holds this shard's index in its high bits and a
/// per-millisecond counter in its low bits. Shards in the same team write
/// disjoint tail ranges, so they can run on different machines without ever
/// talking to each other.
///
/// A shard may issue [`Self::per_instant_limit`] identifiers per millisecond.
/// Past that, [`Self::generate`] fails with [`Error::BudgetExhausted`] and the
/// caller must move on to a later timestamp; no retry happens here.
///
/// The factory is `Sync`: the counter store serializes concurrent calls.
///
/// # Example
/// ```
/// use timeid::ShardedIdFactory;
///
/// let factory = ShardedIdFactory::new(1, 2).unwrap();
/// let id = factory.generate(1_000).unwrap();
///
/// assert_eq!(id.timestamp_millis(), 1_000);
/// assert_eq!(id.tail_bits(), 1 << 20);
/// ```
#[derive(Debug)]
pub struct ShardedIdFactory<T = SystemClock>
where
    T: TimeSource<i64>,
{
    shard: ShardIdentity,
    counter: CounterStore,
    time: T,
}

impl ShardedIdFactory {
    /// Creates a factory for `shard_index` in a team of `team_size`, backed by
    /// an unbounded counter store and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `team_size` is `0` or too large
    /// for the 21-bit tail, or if `shard_index >= team_size`.
    pub fn new(shard_index: u32, team_size: u32) -> Result<Self> {
        Self::with_counter(shard_index, team_size, CounterStore::default())
    }

    /// Like [`Self::new`] with an explicit counter store.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_counter(shard_index: u32, team_size: u32, counter: CounterStore) -> Result<Self> {
        let shard = ShardIdentity::new(shard_index, team_size)?;
        Ok(Self::from_components(shard, counter, SystemClock))
    }

    /// Creates a factory for a member of a statically known team.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn for_member<S: ShardMember>(member: &S) -> Result<Self> {
        let shard = ShardIdentity::for_member(member)?;
        Ok(Self::from_components(shard, CounterStore::default(), SystemClock))
    }
}

impl<T> ShardedIdFactory<T>
where
    T: TimeSource<i64>,
{
    /// Creates a factory from already validated parts and a custom time
    /// source.
    pub fn from_components(shard: ShardIdentity, counter: CounterStore, time: T) -> Self {
        Self {
            shard,
            counter,
            time,
        }
    }

    /// Issues the next identifier for `timestamp`.
    ///
    /// # Errors
    ///
    /// - [`Error::BudgetExhausted`] once this shard issued
    ///   [`Self::per_instant_limit`] identifiers for `timestamp`
    /// - [`Error::StaleKey`] if a bounded counter store already evicted
    ///   `timestamp`
    /// - [`Error::InvalidArgument`] if `timestamp` does not fit the 43-bit
    ///   field of a [`CompactId`]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self, timestamp: i64) -> Result<CompactId> {
        if !(CompactId::MIN_TIMESTAMP..=CompactId::MAX_TIMESTAMP).contains(&timestamp) {
            return Err(Error::invalid_argument(format!(
                "timestamp {timestamp} does not fit in {} bits",
                CompactId::TIMESTAMP_BITS
            )));
        }

        let count = self.counter.next_count(timestamp)?;
        let limit = self.per_instant_limit();
        if count >= limit {
            return Err(Self::cold_budget_exhausted(timestamp, limit));
        }
        Ok(CompactId::from_parts(timestamp, self.shard.tail_for(count)))
    }

    /// Issues the next identifier for the current millisecond of this
    /// factory's time source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`].
    pub fn next_id(&self) -> Result<CompactId> {
        self.generate(self.time.current_millis())
    }

    #[cold]
    #[inline(never)]
    fn cold_budget_exhausted(timestamp: i64, limit: u64) -> Error {
        #[cfg(feature = "tracing")]
        debug!(timestamp, limit, "shard id budget exhausted");
        Error::BudgetExhausted { timestamp, limit }
    }

    #[must_use]
    pub const fn shard(&self) -> &ShardIdentity {
        &self.shard
    }

    #[must_use]
    pub const fn counter(&self) -> &CounterStore {
        &self.counter
    }

    #[must_use]
    pub const fn shard_index(&self) -> u32 {
        self.shard.shard_index()
    }

    #[must_use]
    pub const fn team_size(&self) -> u32 {
        self.shard.team_size()
    }

    #[must_use]
    pub const fn shard_bits(&self) -> u32 {
        self.shard.shard_bits()
    }

    #[must_use]
    pub const fn tail_budget_bits(&self) -> u32 {
        self.shard.tail_budget_bits()
    }

    #[must_use]
    pub const fn per_instant_limit(&self) -> u64 {
        self.shard.per_instant_limit()
    }
}
