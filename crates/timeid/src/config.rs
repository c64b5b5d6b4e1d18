use crate::{CounterStore, Result, ShardIdentity, ShardedIdFactory};

/// Deployment settings for one [`ShardedIdFactory`].
///
/// Every producer in a team is expected to load the same `team_size` and a
/// distinct `shard_index`, typically from a config file or environment.
///
/// # Example
/// ```
/// use timeid::{CounterConfig, FactoryConfig};
///
/// let config = FactoryConfig {
///     shard_index: 2,
///     team_size: 3,
///     counter: CounterConfig::Bounded { capacity: 1_024 },
/// };
/// let factory = config.build().unwrap();
/// assert_eq!(factory.per_instant_limit(), 1 << 19);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct FactoryConfig {
    /// Zero-based position of this producer in its team.
    ///
    /// Must be unique within the team and below `team_size`.
    pub shard_index: u32,

    /// Number of producers sharing the identifier space.
    ///
    /// Larger teams leave fewer tail bits for each shard's per-millisecond
    /// counter. At most 2^21.
    pub team_size: u32,

    /// Counter strategy; unbounded when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub counter: CounterConfig,
}

/// Which [`CounterStore`] variant a factory uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CounterConfig {
    /// Remembers every timestamp for the lifetime of the factory.
    #[default]
    Unbounded,
    Bounded {
        /// Live timestamps kept before the least recently used is retired.
        capacity: usize,
    },
}

impl CounterConfig {
    /// Builds an empty store of the configured kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a zero `capacity`.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn build(&self) -> Result<CounterStore> {
        match *self {
            Self::Unbounded => Ok(CounterStore::unbounded()),
            Self::Bounded { capacity } => CounterStore::bounded(capacity),
        }
    }
}

impl FactoryConfig {
    /// Validates the settings and builds a factory on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the shard does not fit the team
    /// or the counter capacity is zero.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn build(&self) -> Result<ShardedIdFactory> {
        let shard = ShardIdentity::new(self.shard_index, self.team_size)?;
        let counter = self.counter.build()?;
        Ok(ShardedIdFactory::from_components(
            shard,
            counter,
            crate::SystemClock,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn builds_each_counter_kind() {
        let mut config = FactoryConfig {
            shard_index: 0,
            team_size: 2,
            counter: CounterConfig::default(),
        };
        let factory = config.build().unwrap();
        assert!(matches!(factory.counter(), CounterStore::Unbounded(_)));
        assert_eq!(factory.tail_budget_bits(), 20);

        config.counter = CounterConfig::Bounded { capacity: 8 };
        let factory = config.build().unwrap();
        match factory.counter() {
            CounterStore::Bounded(counter) => assert_eq!(counter.capacity(), 8),
            other => panic!("unexpected store {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_settings() {
        let config = FactoryConfig {
            shard_index: 3,
            team_size: 3,
            counter: CounterConfig::Unbounded,
        };
        assert!(matches!(
            config.build(),
            Err(Error::InvalidArgument { .. })
        ));

        let config = FactoryConfig {
            shard_index: 0,
            team_size: 1,
            counter: CounterConfig::Bounded { capacity: 0 },
        };
        assert!(matches!(
            config.build(),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_from_json() {
        let config: FactoryConfig = serde_json::from_str(
            r#"{"shard_index":1,"team_size":4,"counter":{"kind":"bounded","capacity":64}}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            FactoryConfig {
                shard_index: 1,
                team_size: 4,
                counter: CounterConfig::Bounded { capacity: 64 },
            }
        );

        let config: FactoryConfig =
            serde_json::from_str(r#"{"shard_index":0,"team_size":1}"#).unwrap();
        assert_eq!(config.counter, CounterConfig::Unbounded);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"shard_index":0,"team_size":1,"counter":{"kind":"unbounded"}}"#
        );

        assert!(serde_json::from_str::<FactoryConfig>(r#"{"shard_index":0}"#).is_err());
    }
}
