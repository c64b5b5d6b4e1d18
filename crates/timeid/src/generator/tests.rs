use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};
use std::thread::scope;

use crate::{
    CompactId, CounterStore, Error, ShardIdentity, ShardMember, ShardedIdFactory, TimeSource,
};

const EPOCH: i64 = 0;

struct MockTime {
    millis: i64,
}

impl TimeSource<i64> for MockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

trait ResultExt {
    fn unwrap_exhausted(self) -> u64;
}

impl ResultExt for crate::Result<CompactId> {
    fn unwrap_exhausted(self) -> u64 {
        match self {
            Err(Error::BudgetExhausted { limit, .. }) => limit,
            other => panic!("expected budget exhaustion, got {other:?}"),
        }
    }
}

fn assert_split(factory: &ShardedIdFactory, shard_bits: u32, budget_bits: u32, limit: u64) {
    assert_eq!(factory.shard_bits(), shard_bits);
    assert_eq!(factory.tail_budget_bits(), budget_bits);
    assert_eq!(factory.per_instant_limit(), limit);
}

#[test]
fn bit_split_for_one_shard() {
    let factory = ShardedIdFactory::new(0, 1).unwrap();
    assert_eq!(factory.shard_index(), 0);
    assert_split(&factory, 0, 21, 2_097_152);
}

#[test]
fn bit_split_for_two_shards() {
    let factory = ShardedIdFactory::new(0, 2).unwrap();
    assert_split(&factory, 1, 20, 1_048_576);
}

#[test]
fn bit_split_for_three_and_four_shards() {
    let factory = ShardedIdFactory::new(2, 3).unwrap();
    assert_eq!(factory.shard_index(), 2);
    assert_split(&factory, 2, 19, 524_288);

    let factory = ShardedIdFactory::new(0, 4).unwrap();
    assert_split(&factory, 2, 19, 524_288);
}

#[test]
fn shard_index_must_be_below_team_size() {
    assert!(ShardedIdFactory::new(0, 1).is_ok());
    assert!(matches!(
        ShardedIdFactory::new(1, 1),
        Err(Error::InvalidArgument { .. })
    ));

    assert!(ShardedIdFactory::new(4, 5).is_ok());
    assert!(matches!(
        ShardedIdFactory::new(5, 5),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn team_size_is_validated() {
    assert!(matches!(
        ShardedIdFactory::new(0, 0),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(ShardedIdFactory::new(0, ShardIdentity::MAX_TEAM_SIZE).is_ok());
    assert!(matches!(
        ShardedIdFactory::new(0, ShardIdentity::MAX_TEAM_SIZE + 1),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn one_bit_budget_for_first_of_a_million_shards() {
    let factory = ShardedIdFactory::new(0, 1_048_576).unwrap();

    let id0 = factory.generate(EPOCH).unwrap();
    let id1 = factory.generate(EPOCH).unwrap();

    assert_eq!(id0.tail_bits(), 0);
    assert_eq!(id1.tail_bits(), 1);
    assert_eq!(factory.generate(EPOCH).unwrap_exhausted(), 2);
}

#[test]
fn one_bit_budget_for_last_of_a_million_shards() {
    let factory = ShardedIdFactory::new(1_048_575, 1_048_576).unwrap();
    assert_eq!(factory.tail_budget_bits(), 1);

    let id0 = factory.generate(EPOCH).unwrap();
    let id1 = factory.generate(EPOCH).unwrap();

    assert_eq!(format!("{:b}", id0.tail_bits()), "111111111111111111110");
    assert_eq!(format!("{:b}", id1.tail_bits()), "111111111111111111111");
    assert_eq!(id0.tail_bits(), 2_097_150);
    assert_eq!(id1.tail_bits(), 2_097_151);

    assert!(matches!(
        factory.generate(EPOCH),
        Err(Error::BudgetExhausted {
            timestamp: EPOCH,
            limit: 2
        })
    ));
}

#[test]
fn two_bit_budget() {
    // 524_288 = 2^19
    let factory = ShardedIdFactory::new(0, 524_288).unwrap();
    assert_eq!(factory.tail_budget_bits(), 2);

    for expected in 0..4 {
        assert_eq!(factory.generate(EPOCH).unwrap().tail_bits(), expected);
    }
    assert_eq!(factory.generate(EPOCH).unwrap_exhausted(), 4);
}

#[test]
fn exhaustion_is_per_millisecond() {
    let factory = ShardedIdFactory::new(3, 4).unwrap();
    for _ in 0..factory.per_instant_limit() {
        factory.generate(EPOCH).unwrap();
    }
    factory.generate(EPOCH).unwrap_exhausted();
    factory.generate(EPOCH).unwrap_exhausted();

    let next = factory.generate(EPOCH + 1).unwrap();
    assert_eq!(next.timestamp_millis(), EPOCH + 1);
    assert_eq!(next.tail_bits(), 3 << 19);
}

#[test]
fn four_shards_cover_the_whole_tail_space() {
    let factories: Vec<_> = (0..4)
        .map(|shard| ShardedIdFactory::new(shard, 4).unwrap())
        .collect();

    let mut ids = BTreeSet::new();
    let mut raws = HashSet::with_capacity(2_097_152);
    for _ in 0..524_288 {
        for factory in &factories {
            let id = factory.generate(EPOCH).unwrap();
            ids.insert(id);
            raws.insert(id.to_raw());
        }
    }

    assert_eq!(ids.len(), 2_097_152);
    assert_eq!(raws.len(), 2_097_152);
    assert_eq!(ids.first().map(CompactId::tail_bits), Some(0));
    assert_eq!(
        ids.last().map(CompactId::tail_bits),
        Some(CompactId::TAIL_MASK)
    );

    for factory in &factories {
        factory.generate(EPOCH).unwrap_exhausted();
    }
    for factory in &factories {
        assert!(factory.generate(EPOCH + 1).is_ok());
    }
}

#[test]
fn uneven_team_never_collides() {
    let factories: Vec<_> = (0..3)
        .map(|shard| ShardedIdFactory::new(shard, 3).unwrap())
        .collect();

    let mut seen = HashSet::new();
    for factory in &factories {
        for _ in 0..factory.per_instant_limit() {
            assert!(seen.insert(factory.generate(EPOCH).unwrap()));
        }
    }
    // Shard index 3 is never assigned, so a quarter of the space stays unused.
    assert_eq!(seen.len(), 3 * 524_288);
    assert!(seen.iter().all(|id| id.tail_bits() >> 19 < 3));
}

#[test]
fn ids_order_by_time_then_shard_then_count() {
    let factory0 = ShardedIdFactory::new(0, 2).unwrap();
    let factory1 = ShardedIdFactory::new(1, 2).unwrap();

    let a = factory1.generate(EPOCH).unwrap();
    let b = factory0.generate(EPOCH + 1).unwrap();
    let c = factory0.generate(EPOCH + 1).unwrap();
    let d = factory1.generate(EPOCH + 1).unwrap();

    assert!(a < b && b < c && c < d);
}

#[test]
fn pre_epoch_timestamps_work() {
    let factory = ShardedIdFactory::new(1, 2).unwrap();
    let id = factory.generate(-1).unwrap();
    assert_eq!(id.timestamp_millis(), -1);
    assert_eq!(id.tail_bits(), 1 << 20);
    assert!(id < factory.generate(0).unwrap());
}

#[test]
fn out_of_range_timestamp_does_not_consume_budget() {
    let factory = ShardedIdFactory::new(0, 1).unwrap();
    assert!(matches!(
        factory.generate(CompactId::MAX_TIMESTAMP + 1),
        Err(Error::InvalidArgument { .. })
    ));
    assert_eq!(
        factory.generate(CompactId::MAX_TIMESTAMP).unwrap().tail_bits(),
        0
    );
}

#[test]
fn bounded_store_surfaces_stale_keys() {
    let counter = CounterStore::bounded(2).unwrap();
    let factory = ShardedIdFactory::with_counter(0, 1, counter).unwrap();

    factory.generate(10).unwrap();
    factory.generate(11).unwrap();
    factory.generate(12).unwrap();

    assert_eq!(
        factory.generate(10),
        Err(Error::StaleKey { timestamp: 10 })
    );
    assert_eq!(factory.generate(12).unwrap().tail_bits(), 1);
}

#[test]
fn next_id_reads_the_time_source() {
    let shard = ShardIdentity::new(1, 8).unwrap();
    let factory =
        ShardedIdFactory::from_components(shard, CounterStore::default(), MockTime { millis: 42 });

    let id0 = factory.next_id().unwrap();
    let id1 = factory.next_id().unwrap();
    assert_eq!(id0.timestamp_millis(), 42);
    assert_eq!(id0.tail_bits(), 1 << 18);
    assert_eq!(id1.tail_bits(), (1 << 18) | 1);
}

#[test]
fn next_id_with_system_clock() {
    let factory = ShardedIdFactory::new(0, 1).unwrap();
    let id = factory.next_id().unwrap();
    assert!(id.timestamp_millis() > 1_577_836_800_000);
}

crate::define_shard_team!(
    enum SimpleTeam {
        CaseA,
        CaseB,
        CaseC,
        CaseD,
    }
);

#[test]
fn enum_members_become_shards() {
    assert_eq!(SimpleTeam::TEAM_SIZE, 4);
    assert_eq!(SimpleTeam::ALL.len(), 4);

    for (expected, member) in SimpleTeam::ALL.iter().enumerate() {
        let factory = ShardedIdFactory::for_member(member).unwrap();
        assert_eq!(factory.shard_index() as usize, expected);
        assert_eq!(factory.team_size(), 4);
        assert_eq!(factory.shard_bits(), 2);
    }
    assert_eq!(SimpleTeam::CaseD.shard_index(), 3);
}

#[test]
fn factory_is_shareable_across_threads() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 4_096;

    let factory = ShardedIdFactory::new(5, 8).unwrap();
    let seen = Arc::new(Mutex::new(HashSet::with_capacity(THREADS * PER_THREAD)));

    scope(|s| {
        for _ in 0..THREADS {
            let seen = Arc::clone(&seen);
            let factory = &factory;
            s.spawn(move || {
                for _ in 0..PER_THREAD {
                    let id = factory.generate(EPOCH).unwrap();
                    assert!(seen.lock().unwrap().insert(id));
                }
            });
        }
    });

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), THREADS * PER_THREAD);
    assert!(seen.iter().all(|id| id.tail_bits() >> 18 == 5));
}
