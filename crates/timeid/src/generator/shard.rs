use crate::{CompactId, Error, Result, bits::bits_required_for};

/// The position of one producer within a team of producers.
///
/// A team of `team_size` shards splits the 21 tail bits of a [`CompactId`]
/// into a shard field of `ceil(log2(team_size))` bits and a counter field with
/// the remaining bits. Each shard writes its own index into the shard field,
/// so two shards can never emit the same tail for the same millisecond and
/// no coordination between them is required.
///
/// ```text
///  Bit Index:  20                     b   b-1              0
///              +-------------------------+------------------+
///  Field:      | shard index (21 - b)    | counter (b)      |
///              +-------------------------+------------------+
///              b = tail_budget_bits
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShardIdentity {
    shard_index: u32,
    team_size: u32,
    shard_bits: u32,
}

impl ShardIdentity {
    /// Largest team the 21-bit tail can address.
    pub const MAX_TEAM_SIZE: u32 = 1 << CompactId::TAIL_BITS;

    /// Validates and derives the bit split for `shard_index` in a team of
    /// `team_size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `team_size` is `0` or larger than
    /// [`Self::MAX_TEAM_SIZE`], or if `shard_index >= team_size`.
    pub fn new(shard_index: u32, team_size: u32) -> Result<Self> {
        if team_size < 1 {
            return Err(Error::invalid_argument("team size must be at least 1"));
        }
        if team_size > Self::MAX_TEAM_SIZE {
            return Err(Error::invalid_argument(format!(
                "team size {team_size} exceeds the {} shards a {}-bit tail can address",
                Self::MAX_TEAM_SIZE,
                CompactId::TAIL_BITS
            )));
        }
        if shard_index >= team_size {
            return Err(Error::invalid_argument(format!(
                "shard index {shard_index} must be below team size {team_size}"
            )));
        }
        let shard_bits = bits_required_for(u64::from(team_size))?;
        Ok(Self {
            shard_index,
            team_size,
            shard_bits,
        })
    }

    /// Derives the identity of `member` from its position in a fixed team.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn for_member<S: ShardMember>(member: &S) -> Result<Self> {
        Self::new(member.shard_index(), S::TEAM_SIZE)
    }

    #[must_use]
    pub const fn shard_index(&self) -> u32 {
        self.shard_index
    }

    #[must_use]
    pub const fn team_size(&self) -> u32 {
        self.team_size
    }

    /// Bits spent on the shard index.
    #[must_use]
    pub const fn shard_bits(&self) -> u32 {
        self.shard_bits
    }

    /// Bits left for the per-millisecond counter.
    #[must_use]
    pub const fn tail_budget_bits(&self) -> u32 {
        CompactId::TAIL_BITS - self.shard_bits
    }

    /// How many identifiers this shard may issue for a single millisecond.
    #[must_use]
    pub const fn per_instant_limit(&self) -> u64 {
        1 << self.tail_budget_bits()
    }

    /// Combines the shard index with a counter value into tail bits.
    ///
    /// The caller guarantees `count < self.per_instant_limit()`.
    #[must_use]
    pub(crate) const fn tail_for(&self, count: u64) -> u64 {
        debug_assert!(count < self.per_instant_limit(), "count overflow");
        ((self.shard_index as u64) << self.tail_budget_bits()) | count
    }
}

/// A member of a fixed, statically known team of producers.
///
/// The member's position is its shard index and the number of members is the
/// team size. [`define_shard_team!`] implements this for a fieldless enum.
///
/// [`define_shard_team!`]: crate::define_shard_team
pub trait ShardMember {
    /// Number of members in the team.
    const TEAM_SIZE: u32;

    /// Zero-based position of this member.
    fn shard_index(&self) -> u32;
}

/// Defines a fieldless enum whose variants are the shards of one team.
///
/// Variant order fixes each shard's index and the variant count fixes the
/// team size, so every producer built from the enum agrees on the bit split
/// without any runtime configuration.
///
/// ```
/// use timeid::{ShardMember, ShardedIdFactory, define_shard_team};
///
/// define_shard_team!(
///     /// Services allowed to mint order ids.
///     pub enum OrderWriter {
///         Checkout,
///         Refunds,
///         Backfill,
///     }
/// );
///
/// assert_eq!(OrderWriter::TEAM_SIZE, 3);
/// assert_eq!(OrderWriter::Refunds.shard_index(), 1);
///
/// let factory = ShardedIdFactory::for_member(&OrderWriter::Backfill).unwrap();
/// assert_eq!(factory.shard_index(), 2);
/// assert_eq!(factory.shard_bits(), 2);
/// ```
#[macro_export]
macro_rules! define_shard_team {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u32)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every member of the team, in shard index order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl $crate::ShardMember for $name {
            const TEAM_SIZE: u32 = Self::ALL.len() as u32;

            fn shard_index(&self) -> u32 {
                *self as u32
            }
        }
    };
}
