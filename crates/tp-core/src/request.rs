//! Validated search requests.

use crate::error::{Result, TwinPrimeError};
use crate::results::SEED_PAIRS;

/// A request for `requested_total` twin prime pairs, seeds included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    requested_total: u64,
}

impl SearchRequest {
    /// Validate a request. Fewer than two pairs is rejected before any
    /// planning happens.
    pub fn new(requested_total: u64) -> Result<Self> {
        if requested_total < SEED_PAIRS.len() as u64 {
            return Err(TwinPrimeError::InvalidRequest { requested_total });
        }
        Ok(Self { requested_total })
    }

    #[must_use]
    pub fn requested_total(&self) -> u64 {
        self.requested_total
    }

    /// Pairs to search for: the request minus the two seed pairs.
    #[must_use]
    pub fn total_pairs(&self) -> u64 {
        self.requested_total - SEED_PAIRS.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pairs_excludes_seeds() {
        assert_eq!(SearchRequest::new(5).unwrap().total_pairs(), 3);
        assert_eq!(SearchRequest::new(2).unwrap().total_pairs(), 0);
    }

    #[test]
    fn test_below_seeds_rejected() {
        assert_eq!(
            SearchRequest::new(1),
            Err(TwinPrimeError::InvalidRequest { requested_total: 1 })
        );
        assert!(SearchRequest::new(0).is_err());
    }
}
