//! Twin prime pairs and the buffers that hold them.
//!
//! A [`LocalResultSet`] is one worker's quota-bounded output. It is
//! reserved once at its final size and handed over by value. The
//! [`GlobalResultSet`] is assembled by the coordinator from all local sets
//! in rank order and then sorted.

use serde::Serialize;

use crate::error::{Result, TwinPrimeError};

/// A twin prime pair `(p, p + 2)`, represented by `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TwinPrime(u64);

impl TwinPrime {
    #[must_use]
    pub const fn new(lower: u64) -> Self {
        Self(lower)
    }

    #[must_use]
    pub const fn lower(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn upper(&self) -> u64 {
        self.0 + 2
    }
}

impl std::fmt::Display for TwinPrime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lower(), self.upper())
    }
}

/// The two pairs below the wheel, supplied rather than searched for.
pub const SEED_PAIRS: [TwinPrime; 2] = [TwinPrime::new(3), TwinPrime::new(5)];

/// Reserve exactly `len` slots or fail with [`TwinPrimeError::Allocation`].
fn reserve_exact<T>(len: u64) -> Result<Vec<T>> {
    let capacity = usize::try_from(len).map_err(|_| TwinPrimeError::Allocation { requested: len })?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| TwinPrimeError::Allocation { requested: len })?;
    Ok(buffer)
}

/// One worker's results, capacity fixed to its quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalResultSet {
    rank: u64,
    quota: u64,
    pairs: Vec<TwinPrime>,
}

impl LocalResultSet {
    /// Reserve a buffer for exactly `quota` pairs.
    pub fn with_quota(rank: u64, quota: u64) -> Result<Self> {
        Ok(Self {
            rank,
            quota,
            pairs: reserve_exact(quota)?,
        })
    }

    /// Append a pair. The buffer never grows past its quota.
    pub fn push(&mut self, pair: TwinPrime) {
        debug_assert!(!self.is_full(), "worker {} pushed past its quota", self.rank);
        debug_assert!(
            self.pairs.last().map_or(true, |last| *last < pair),
            "local results must be strictly increasing"
        );
        self.pairs.push(pair);
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.pairs.len() as u64 >= self.quota
    }

    #[must_use]
    pub fn rank(&self) -> u64 {
        self.rank
    }

    #[must_use]
    pub fn quota(&self) -> u64 {
        self.quota
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[TwinPrime] {
        &self.pairs
    }

    /// Give up the buffer.
    #[must_use]
    pub fn into_pairs(self) -> Vec<TwinPrime> {
        self.pairs
    }
}

/// All workers' pairs in one buffer of length `total_pairs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalResultSet {
    pairs: Vec<TwinPrime>,
    sorted: bool,
}

impl GlobalResultSet {
    /// Concatenate local sets in the order given (rank order when gathered).
    ///
    /// The buffer is reserved once at `total_pairs`. Local sets whose
    /// combined length differs from `total_pairs` are rejected.
    pub fn gather<I>(total_pairs: u64, locals: I) -> Result<Self>
    where
        I: IntoIterator<Item = LocalResultSet>,
    {
        let mut pairs = reserve_exact(total_pairs)?;
        for local in locals {
            debug_assert!(local.is_full(), "worker {} handed over early", local.rank());
            pairs.extend(local.into_pairs());
        }

        if pairs.len() as u64 != total_pairs {
            return Err(TwinPrimeError::TopologyMismatch(format!(
                "gathered {} pairs, expected {}",
                pairs.len(),
                total_pairs
            )));
        }

        Ok(Self {
            pairs,
            sorted: false,
        })
    }

    /// Sort ascending by `p`.
    pub fn sort(&mut self) {
        self.pairs.sort();
        debug_assert!(self.pairs.windows(2).all(|w| w[0] < w[1]), "duplicate pair");
        self.sorted = true;
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[TwinPrime] {
        &self.pairs
    }

    /// Seed pairs followed by the gathered pairs.
    pub fn with_seeds(&self) -> impl Iterator<Item = TwinPrime> + '_ {
        debug_assert!(self.sorted, "assembling before sort");
        SEED_PAIRS.iter().copied().chain(self.pairs.iter().copied())
    }

    #[must_use]
    pub fn into_pairs(self) -> Vec<TwinPrime> {
        self.pairs
    }
}
