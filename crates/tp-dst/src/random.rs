//! Seeded random number generation.
//!
//! Xoshiro256** produces identical sequences for identical seeds, so every
//! arrival order drawn from it can be replayed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Seeded RNG that remembers its seed.
///
/// # Example
///
/// ```rust
/// use tp_dst::SeededRng;
///
/// let mut a = SeededRng::new(7);
/// let mut b = SeededRng::new(7);
/// assert_eq!(a.gen_range(0..100u64), b.gen_range(0..100u64));
/// ```
pub struct SeededRng {
    seed: u64,
    rng: Xoshiro256StarStar,
    calls_count: u64,
}

impl SeededRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        debug_assert!(seed != 0, "Seed should not be zero for better randomness");

        Self {
            seed,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            calls_count: 0,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn calls_count(&self) -> u64 {
        self.calls_count
    }

    pub fn gen_range(&mut self, range: std::ops::Range<u64>) -> u64 {
        debug_assert!(!range.is_empty(), "empty range");
        self.calls_count += 1;
        self.rng.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        self.calls_count += 1;
        slice.shuffle(&mut self.rng);
    }

    /// A uniformly random permutation of `0..len`.
    #[must_use]
    pub fn permutation(&mut self, len: u64) -> Vec<u64> {
        let mut order: Vec<u64> = (0..len).collect();
        self.shuffle(&mut order);
        order
    }

    /// Derive an independent RNG, e.g. one per simulated worker.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.calls_count += 1;
        let seed = self.rng.gen::<u64>().max(1);
        Self::new(seed)
    }

    /// Reset to initial state (same seed).
    pub fn reset(&mut self) {
        self.rng = Xoshiro256StarStar::seed_from_u64(self.seed);
        self.calls_count = 0;
    }
}
