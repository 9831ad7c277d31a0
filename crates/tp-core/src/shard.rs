//! Shard definitions for the mod-30 wheel.
//!
//! Twin primes above 5 start only at residues 11, 17 and 29 mod 30. Each
//! residue class is split three ways by a row multiplier, giving nine
//! arithmetic progressions with common difference 90:
//!
//! | Shard | Row | Class | Offset | Progression |
//! |-------|-----|-------|--------|-------------|
//! | 0 | 0 | 11 | 11 | 11 + 90i |
//! | 1 | 0 | 17 | 17 | 17 + 90i |
//! | 2 | 0 | 29 | 29 | 29 + 90i |
//! | 3 | 1 | 11 | 41 | 41 + 90i |
//! | 4 | 1 | 17 | 47 | 47 + 90i |
//! | 5 | 1 | 29 | 59 | 59 + 90i |
//! | 6 | 2 | 11 | 71 | 71 + 90i |
//! | 7 | 2 | 17 | 77 | 77 + 90i |
//! | 8 | 2 | 29 | 89 | 89 + 90i |
//!
//! Together the nine shards enumerate every `30k + {11, 17, 29}` exactly once.

use serde::Serialize;

/// Modulus of the wheel.
pub const WHEEL_MODULUS: u64 = 30;

/// Residues mod 30 at which twin primes above 5 can start.
pub const RESIDUE_CLASSES: [u64; 3] = [11, 17, 29];

/// Number of row multipliers per residue class.
pub const ROWS_COUNT: u64 = 3;

/// Common difference of every shard's progression.
pub const SHARD_STRIDE: u64 = WHEEL_MODULUS * ROWS_COUNT;

/// Total number of shards.
pub const SHARDS_COUNT: usize = 9;

/// One arithmetic progression `residue_class + 30 * row_multiplier + 90 * i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShardConfig {
    /// Row multiplier in `0..3`
    pub row_multiplier: u64,
    /// Residue class, one of 11, 17, 29
    pub residue_class: u64,
}

impl ShardConfig {
    /// Shard at grid position `index` (row-major over the 3x3 grid).
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < SHARDS_COUNT, "shard index {} out of range", index);

        Self {
            row_multiplier: (index / RESIDUE_CLASSES.len()) as u64,
            residue_class: RESIDUE_CLASSES[index % RESIDUE_CLASSES.len()],
        }
    }

    /// Grid position of this shard.
    #[must_use]
    pub fn index(&self) -> usize {
        let column = RESIDUE_CLASSES
            .iter()
            .position(|&c| c == self.residue_class)
            .unwrap_or(RESIDUE_CLASSES.len());
        debug_assert!(column < RESIDUE_CLASSES.len(), "unknown residue class");
        debug_assert!(self.row_multiplier < ROWS_COUNT);

        self.row_multiplier as usize * RESIDUE_CLASSES.len() + column
    }

    /// First candidate of the progression, always in `[11, 89]`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        let offset = self.residue_class + WHEEL_MODULUS * self.row_multiplier;
        debug_assert!(offset < SHARD_STRIDE);
        offset
    }

    /// The `i`-th candidate, or `None` if it overflows `u64`.
    #[must_use]
    pub fn candidate(&self, i: u64) -> Option<u64> {
        SHARD_STRIDE.checked_mul(i)?.checked_add(self.offset())
    }
}

/// All nine shards in grid order.
#[must_use]
pub fn all_shards() -> [ShardConfig; SHARDS_COUNT] {
    std::array::from_fn(ShardConfig::from_index)
}

/// A set of shards owned by one worker.
///
/// Stored as a bitmask over shard indices so it is `Copy` and never
/// allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "Vec<ShardConfig>")]
pub struct ShardSet {
    mask: u16,
}

impl ShardSet {
    /// The empty set (an idle worker).
    #[must_use]
    pub fn empty() -> Self {
        Self { mask: 0 }
    }

    /// All nine shards.
    #[must_use]
    pub fn full() -> Self {
        Self {
            mask: (1u16 << SHARDS_COUNT) - 1,
        }
    }

    /// A set holding only `shard`.
    #[must_use]
    pub fn single(shard: ShardConfig) -> Self {
        let mut set = Self::empty();
        set.insert(shard);
        set
    }

    /// Add a shard. Returns false if it was already present.
    pub fn insert(&mut self, shard: ShardConfig) -> bool {
        let bit = 1u16 << shard.index();
        let fresh = self.mask & bit == 0;
        self.mask |= bit;
        fresh
    }

    #[must_use]
    pub fn contains(&self, shard: ShardConfig) -> bool {
        self.mask & (1u16 << shard.index()) != 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Shards in grid order.
    pub fn iter(&self) -> impl Iterator<Item = ShardConfig> + '_ {
        (0..SHARDS_COUNT)
            .filter(move |&i| self.mask & (1u16 << i) != 0)
            .map(ShardConfig::from_index)
    }

    /// Offsets of the owned shards in ascending order.
    ///
    /// Returns a fixed array and the number of valid leading entries.
    #[must_use]
    pub fn sorted_offsets(&self) -> ([u64; SHARDS_COUNT], usize) {
        let mut offsets = [0u64; SHARDS_COUNT];
        let mut len = 0;
        for shard in self.iter() {
            offsets[len] = shard.offset();
            len += 1;
        }
        offsets[..len].sort_unstable();
        debug_assert!(len == self.len());
        (offsets, len)
    }
}

impl From<ShardSet> for Vec<ShardConfig> {
    fn from(set: ShardSet) -> Self {
        set.iter().collect()
    }
}

impl std::fmt::Display for ShardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+30*{}", self.residue_class, self.row_multiplier)
    }
}
