//! Wheel candidate generation.
//!
//! A worker searches one or more shards. Since every shard offset lies in
//! `[11, 89]`, the merged sequence is enumerated block by block: block `b`
//! emits `90 * b + offset` for each owned offset in ascending order. The
//! result is strictly increasing, each shard's subsequence keeps stride 90,
//! and no value is visited twice.

use crate::primality::is_twin_prime;
use crate::results::TwinPrime;
use crate::shard::{ShardConfig, ShardSet, SHARDS_COUNT, SHARD_STRIDE};

/// Lazy, strictly increasing candidates for a set of shards.
///
/// Ends only when the next candidate (or its twin) would overflow `u64`.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    offsets: [u64; SHARDS_COUNT],
    offsets_count: usize,
    block: u64,
    slot: usize,
}

impl CandidateGenerator {
    /// Candidates of a single shard: `offset + 90 * i`.
    #[must_use]
    pub fn for_shard(shard: ShardConfig) -> Self {
        Self::for_shards(ShardSet::single(shard))
    }

    /// Merged candidates of every shard in `shards`.
    #[must_use]
    pub fn for_shards(shards: ShardSet) -> Self {
        let (offsets, offsets_count) = shards.sorted_offsets();
        Self {
            offsets,
            offsets_count,
            block: 0,
            slot: 0,
        }
    }

    /// Restart from the first candidate.
    pub fn reset(&mut self) {
        self.block = 0;
        self.slot = 0;
    }
}

impl Iterator for CandidateGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.offsets_count == 0 {
            return None;
        }
        debug_assert!(self.slot < self.offsets_count);

        let candidate = SHARD_STRIDE
            .checked_mul(self.block)?
            .checked_add(self.offsets[self.slot])?;

        self.slot += 1;
        if self.slot == self.offsets_count {
            self.slot = 0;
            self.block += 1;
        }
        Some(candidate)
    }
}

/// Twin prime pairs found along a [`CandidateGenerator`], in increasing order.
///
/// The caller bounds consumption with its quota (e.g. `take(quota)`).
#[derive(Debug, Clone)]
pub struct TwinPrimeSearch {
    candidates: CandidateGenerator,
    candidates_examined: u64,
}

impl TwinPrimeSearch {
    #[must_use]
    pub fn new(shards: ShardSet) -> Self {
        Self {
            candidates: CandidateGenerator::for_shards(shards),
            candidates_examined: 0,
        }
    }

    /// Number of candidates tested so far.
    #[must_use]
    pub fn candidates_examined(&self) -> u64 {
        self.candidates_examined
    }
}

impl Iterator for TwinPrimeSearch {
    type Item = TwinPrime;

    fn next(&mut self) -> Option<TwinPrime> {
        for candidate in self.candidates.by_ref() {
            self.candidates_examined += 1;
            if is_twin_prime(candidate) {
                return Some(TwinPrime::new(candidate));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::is_prime;
    use crate::shard::{all_shards, RESIDUE_CLASSES, WHEEL_MODULUS};

    #[test]
    fn test_single_shard_stride() {
        for shard in all_shards() {
            let candidates: Vec<u64> = CandidateGenerator::for_shard(shard).take(50).collect();
            assert_eq!(candidates[0], shard.offset());
            for window in candidates.windows(2) {
                assert_eq!(window[1] - window[0], SHARD_STRIDE);
            }
        }
    }

    #[test]
    fn test_full_set_enumerates_wheel() {
        let candidates: Vec<u64> = CandidateGenerator::for_shards(ShardSet::full())
            .take_while(|&x| x < 1_000)
            .collect();
        let expected: Vec<u64> = (7..1_000)
            .filter(|x| RESIDUE_CLASSES.contains(&(x % WHEEL_MODULUS)))
            .collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_merged_is_strictly_increasing() {
        let mut set = ShardSet::empty();
        set.insert(ShardConfig::from_index(8));
        set.insert(ShardConfig::from_index(0));
        set.insert(ShardConfig::from_index(4));

        let candidates: Vec<u64> = CandidateGenerator::for_shards(set).take(30).collect();
        assert_eq!(&candidates[..4], &[11, 47, 89, 101]);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_set_yields_nothing() {
        assert_eq!(CandidateGenerator::for_shards(ShardSet::empty()).next(), None);
    }

    #[test]
    fn test_reset_restarts() {
        let mut generator = CandidateGenerator::for_shard(ShardConfig::from_index(2));
        let first: Vec<u64> = generator.by_ref().take(5).collect();
        generator.reset();
        let again: Vec<u64> = generator.take(5).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_overflow_ends_sequence() {
        let mut generator = CandidateGenerator::for_shard(ShardConfig::from_index(0));
        generator.block = u64::MAX / SHARD_STRIDE + 1;
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn test_search_finds_twin_primes_per_shard() {
        let expected: [[u64; 3]; SHARDS_COUNT] = [
            [11, 101, 191],
            [17, 107, 197],
            [29, 569, 659],
            [41, 311, 1031],
            [137, 227, 857],
            [59, 149, 239],
            [71, 431, 521],
            [347, 617, 1427],
            [179, 269, 809],
        ];
        for (index, pairs) in expected.iter().enumerate() {
            let found: Vec<u64> = TwinPrimeSearch::new(ShardSet::single(ShardConfig::from_index(index)))
                .take(3)
                .map(|p| p.lower())
                .collect();
            assert_eq!(&found, pairs, "shard {}", index);
        }
    }

    #[test]
    fn test_search_full_wheel_finds_first_twins() {
        let found: Vec<u64> = TwinPrimeSearch::new(ShardSet::full())
            .take(10)
            .map(|p| p.lower())
            .collect();
        assert_eq!(found, vec![11, 17, 29, 41, 59, 71, 101, 107, 137, 149]);
    }

    #[test]
    fn test_search_pairs_are_prime() {
        let mut search = TwinPrimeSearch::new(ShardSet::full());
        for pair in search.by_ref().take(200) {
            assert!(is_prime(pair.lower()));
            assert!(is_prime(pair.upper()));
        }
        assert!(search.candidates_examined() >= 200);
    }
}
