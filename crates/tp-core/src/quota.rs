//! Quota planning.
//!
//! Every worker gets `total_pairs / workers_count` pairs; the last worker
//! also takes the remainder.

use crate::error::{Result, TwinPrimeError};

/// Quotas for `workers_count` workers summing to `total_pairs`.
pub fn plan_quotas(total_pairs: u64, workers_count: u64) -> Result<Vec<u64>> {
    if workers_count == 0 {
        return Err(TwinPrimeError::TopologyMismatch(
            "cannot plan quotas for zero workers".to_string(),
        ));
    }

    let per_worker = total_pairs / workers_count;
    let remainder = total_pairs % workers_count;

    let mut quotas = Vec::new();
    quotas
        .try_reserve_exact(workers_count as usize)
        .map_err(|_| TwinPrimeError::Allocation {
            requested: workers_count,
        })?;
    quotas.resize(workers_count as usize, per_worker);
    if let Some(last) = quotas.last_mut() {
        *last += remainder;
    }

    debug_assert!(quotas.iter().sum::<u64>() == total_pairs);
    Ok(quotas)
}

/// Quotas indexed by worker rank, including idle workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaPlan {
    quotas: Vec<u64>,
    total_pairs: u64,
}

impl QuotaPlan {
    /// Plan over the first `active_count` of `workers_count` workers.
    ///
    /// Workers from `active_count` upwards own no shard and get quota 0.
    pub fn new(total_pairs: u64, workers_count: u64, active_count: u64) -> Result<Self> {
        if active_count == 0 || active_count > workers_count {
            return Err(TwinPrimeError::TopologyMismatch(format!(
                "{} active workers out of {}",
                active_count, workers_count
            )));
        }

        let mut quotas = plan_quotas(total_pairs, active_count)?;
        quotas.resize(workers_count as usize, 0);

        Ok(Self {
            quotas,
            total_pairs,
        })
    }

    #[must_use]
    pub fn quota_for(&self, worker_index: u64) -> u64 {
        debug_assert!((worker_index as usize) < self.quotas.len());
        self.quotas[worker_index as usize]
    }

    #[must_use]
    pub fn total_pairs(&self) -> u64 {
        self.total_pairs
    }

    #[must_use]
    pub fn quotas(&self) -> &[u64] {
        &self.quotas
    }
}
