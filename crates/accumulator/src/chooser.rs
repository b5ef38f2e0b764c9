//! Stripe-selection strategies for the lock-free `update` hot path.
//!
//! None of these strategies may change the semantic vector sum — they only
//! decide which padded atomic absorbs a given `update`'s delta.

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::options::Chooser;

thread_local! {
    static PER_CORE_ID: Cell<Option<u64>> = Cell::new(None);
}

/// Picks a stripe index in `0..stripe_count` according to `chooser`.
///
/// `round_robin` is the accumulator's shared round-robin counter, used only
/// by the [`Chooser::RoundRobin`] strategy.
pub(crate) fn pick_stripe(
    chooser: Chooser,
    stripe_count: usize,
    round_robin: &AtomicUsize,
) -> usize {
    match chooser {
        Chooser::RoundRobin => round_robin.fetch_add(1, Ordering::Relaxed) % stripe_count,
        Chooser::PerTaskPrng => rand::thread_rng().gen_range(0..stripe_count),
        Chooser::PerCoreId => {
            let id = PER_CORE_ID.with(|cell| {
                if let Some(id) = cell.get() {
                    id
                } else {
                    let mut hasher = DefaultHasher::new();
                    std::thread::current().id().hash(&mut hasher);
                    let id = hasher.finish();
                    cell.set(Some(id));
                    id
                }
            });
            (id as usize) % stripe_count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_cycles_through_all_stripes() {
        let counter = AtomicUsize::new(0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..16 {
            seen.insert(pick_stripe(Chooser::RoundRobin, 8, &counter));
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn per_task_prng_stays_in_range() {
        let counter = AtomicUsize::new(0);
        for _ in 0..100 {
            let idx = pick_stripe(Chooser::PerTaskPrng, 16, &counter);
            assert!(idx < 16);
        }
    }

    #[test]
    fn per_core_id_is_stable_within_a_thread() {
        let counter = AtomicUsize::new(0);
        let first = pick_stripe(Chooser::PerCoreId, 16, &counter);
        let second = pick_stripe(Chooser::PerCoreId, 16, &counter);
        assert_eq!(first, second);
    }
}
