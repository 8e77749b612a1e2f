//! Job id allocation
//!
//! Ids are uniform draws from `[0, bound)` rendered in base 36. No registry
//! of issued ids exists, so collisions are possible and are not detected.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::job::JobId;

/// Number of 1-4 digit base-36 values. Every allocated id is at most "zzzz".
pub const DEFAULT_ID_BOUND: u64 = 36 * 36 * 36 * 36;

/// Process-wide id source, shared by every request that needs a new job.
#[derive(Debug)]
pub struct IdAllocator {
    bound: u64,
    rng: Mutex<StdRng>,
}

impl IdAllocator {
    /// Create an allocator seeded from the wall clock at nanosecond resolution,
    /// so restarts do not replay the same id sequence.
    ///
    /// `bound` must be at least 1; it is clamped otherwise.
    pub fn new(bound: u64) -> Self {
        let now = Utc::now();
        let seed = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros()) as u64;
        debug!("Seeding job id allocator (bound {})", bound);
        Self::with_seed(bound, seed)
    }

    /// Create an allocator with a fixed seed.
    pub fn with_seed(bound: u64, seed: u64) -> Self {
        Self {
            bound: bound.max(1),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Draw a new job id. Never fails.
    pub fn allocate(&self) -> JobId {
        // A panic while holding the lock cannot leave the generator in a bad state
        let value = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.random_range(0..self.bound)
        };
        JobId::from_number(value)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_BOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_default_bound_fits_four_digits() {
        let allocator = IdAllocator::default();
        assert_eq!(allocator.bound(), 1_679_616);
        for _ in 0..1000 {
            let id = allocator.allocate();
            assert!(!id.as_str().is_empty());
            assert!(id.as_str().len() <= 4, "{id} is longer than 4 digits");
            assert!(id.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = IdAllocator::with_seed(DEFAULT_ID_BOUND, 42);
        let b = IdAllocator::with_seed(DEFAULT_ID_BOUND, 42);
        let first: Vec<_> = (0..20).map(|_| a.allocate()).collect();
        let second: Vec<_> = (0..20).map(|_| b.allocate()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = IdAllocator::with_seed(DEFAULT_ID_BOUND, 1);
        let b = IdAllocator::with_seed(DEFAULT_ID_BOUND, 2);
        let first: Vec<_> = (0..20).map(|_| a.allocate()).collect();
        let second: Vec<_> = (0..20).map(|_| b.allocate()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_zero_bound_is_clamped() {
        let allocator = IdAllocator::with_seed(0, 7);
        assert_eq!(allocator.bound(), 1);
        assert_eq!(allocator.allocate().as_str(), "0");
    }

    #[test]
    fn test_concurrent_allocation() {
        let allocator = Arc::new(IdAllocator::with_seed(DEFAULT_ID_BOUND, 99));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                thread::spawn(move || (0..500).map(|_| allocator.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                let n = id.to_number().unwrap();
                assert!(n < DEFAULT_ID_BOUND);
                seen.insert(id);
            }
        }
        // 4000 draws over 1.6M values; a handful of collisions at most
        assert!(seen.len() > 3900);
    }

    proptest! {
        #[test]
        fn prop_allocated_ids_decode_below_bound(bound in 1u64..5_000_000, seed in any::<u64>()) {
            let allocator = IdAllocator::with_seed(bound, seed);
            for _ in 0..32 {
                let id = allocator.allocate();
                let n = id.to_number().unwrap();
                prop_assert!(n < bound);
                prop_assert_eq!(JobId::from_number(n), id);
            }
        }
    }
}
