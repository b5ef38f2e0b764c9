//! The striped atomic accumulator: `Available = Scalar - |Vector|`.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use tracing::debug;
use vsa_core::{now_nanos, sign_of};

use crate::atomics::{fetch_checked_add, fetch_saturating_add};
use crate::chooser::pick_stripe;
use crate::gate::GateState;
use crate::options::{AccumulatorOptions, Chooser};

/// State shared between the `Accumulator` handle and its optional
/// background cached-gate refresher.
///
/// Kept separate from `Accumulator` itself (rather than behind
/// `Arc::new_cyclic`) so that `Accumulator::new` can return a plain value,
/// matching the public constructor signature, while the refresher thread
/// still only needs a cheap `Arc` clone of the atomics it touches.
struct Shared {
    scalar: AtomicI64,
    stripes: Box<[CachePadded<AtomicI64>]>,
    committed_offset: AtomicI64,
    approx_net: AtomicI64,
    groups: Option<Box<[CachePadded<AtomicI64>]>>,
    cached_net: AtomicI64,
    cached_at: AtomicU64,
}

impl Shared {
    /// Un-synchronized exact vector: sum of stripes (or group sums, which
    /// are cheaper to scan and carry the same total) minus the committed
    /// offset.
    fn exact_vector(&self) -> i64 {
        let raw: i64 = if let Some(groups) = &self.groups {
            groups.iter().map(|g| g.load(Ordering::Relaxed)).sum()
        } else {
            self.stripes.iter().map(|s| s.load(Ordering::Relaxed)).sum()
        };
        raw - self.committed_offset.load(Ordering::Relaxed)
    }

    fn group_count(&self) -> usize {
        self.groups.as_ref().map(|g| g.len()).unwrap_or(0)
    }
}

/// A single logical counter with `Available = Scalar - |Vector|`.
///
/// `update` is a lock-free hot path; `try_consume`, `try_refund`, and
/// `commit` serialize against each other through an internal gate. See the
/// crate-level docs for the full contract.
pub struct Accumulator {
    shared: Arc<Shared>,
    gate: Mutex<GateState>,
    options: AccumulatorOptions,
    update_rr: AtomicUsize,
    refresher_shutdown: Arc<AtomicBool>,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl Accumulator {
    /// Construct a new accumulator with the given durable base value.
    pub fn new(initial_scalar: i64, options: AccumulatorOptions) -> Self {
        let stripe_count = options.validated_stripes();
        let stripes = (0..stripe_count)
            .map(|_| CachePadded::new(AtomicI64::new(0)))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let groups = if options.groups_enabled() {
            Some(
                (0..options.group_count)
                    .map(|_| CachePadded::new(AtomicI64::new(0)))
                    .collect::<Vec<_>>()
                    .into_boxed_slice(),
            )
        } else {
            None
        };

        let shared = Arc::new(Shared {
            scalar: AtomicI64::new(initial_scalar),
            stripes,
            committed_offset: AtomicI64::new(0),
            approx_net: AtomicI64::new(0),
            groups,
            cached_net: AtomicI64::new(0),
            cached_at: AtomicU64::new(now_nanos()),
        });

        let refresher_shutdown = Arc::new(AtomicBool::new(false));
        let refresher = if options.use_cached_gate {
            Some(spawn_refresher(
                Arc::clone(&shared),
                Arc::clone(&refresher_shutdown),
                options.cache_interval,
            ))
        } else {
            None
        };

        Self {
            shared,
            gate: Mutex::new(GateState::default()),
            options,
            update_rr: AtomicUsize::new(0),
            refresher_shutdown,
            refresher: Mutex::new(refresher),
        }
    }

    fn stripe_count(&self) -> usize {
        self.shared.stripes.len()
    }

    fn group_of(&self, stripe_idx: usize) -> Option<usize> {
        let groups = self.shared.group_count();
        (groups > 0).then(|| stripe_idx % groups)
    }

    /// Lock-free hot path: atomically adds `delta` to one stripe.
    ///
    /// Saturates at the signed-64 boundary rather than wrapping, per the
    /// overflow policy documented on the struct. Never fails.
    pub fn update(&self, delta: i64) {
        self.update_via(self.options.chooser, delta);
    }

    fn update_via(&self, chooser: Chooser, delta: i64) {
        let idx = pick_stripe(chooser, self.stripe_count(), &self.update_rr);
        fetch_saturating_add(&self.shared.stripes[idx], delta);
        if let Some(group_idx) = self.group_of(idx) {
            fetch_saturating_add(&self.shared.groups.as_ref().unwrap()[group_idx], delta);
        }
        fetch_saturating_add(&self.shared.approx_net, delta);
    }

    /// Linearizable check-then-consume. Rejects `n <= 0`. Returns `true`
    /// iff `n` units of availability were admitted.
    pub fn try_consume(&self, n: i64) -> bool {
        if n <= 0 {
            return false;
        }

        if self.options.fast_path_guard > 0 {
            let scalar = self.shared.scalar.load(Ordering::Acquire);
            let approx = self.shared.approx_net.load(Ordering::Acquire);
            if scalar.saturating_sub(approx.abs()) >= n.saturating_add(self.options.fast_path_guard) {
                self.update_via(Chooser::RoundRobin, n);
                return true;
            }
        }

        let mut gate = self.gate.lock();
        let scalar = self.shared.scalar.load(Ordering::Acquire);

        let a_est = if self.options.use_cached_gate {
            let cached = self.shared.cached_net.load(Ordering::Acquire);
            scalar - cached.abs() - self.options.cache_slack
        } else if let Some(groups) = &self.shared.groups {
            let group_count = groups.len();
            let idx = gate.next_group(group_count);
            let group_sum = groups[idx].load(Ordering::Acquire);
            let scaled = group_sum.saturating_mul(group_count as i64);
            let v_est = scaled - self.shared.committed_offset.load(Ordering::Acquire);
            scalar - v_est.abs() - self.options.group_slack
        } else {
            scalar - self.shared.exact_vector().abs()
        };

        if a_est < n {
            let exact = self.shared.exact_vector();
            if scalar - exact.abs() < n {
                return false;
            }
        }

        let idx = gate.next_stripe(self.stripe_count());
        if fetch_checked_add(&self.shared.stripes[idx], n).is_none() {
            // Overflow: refuse rather than wrap, per the documented policy.
            return false;
        }
        if let Some(group_idx) = self.group_of(idx) {
            fetch_saturating_add(&self.shared.groups.as_ref().unwrap()[group_idx], n);
        }
        fetch_saturating_add(&self.shared.approx_net, n);
        true
    }

    /// Clamped best-effort undo: refunds `min(n, V)`. Rejects `n <= 0` or
    /// a non-positive effective vector.
    pub fn try_refund(&self, n: i64) -> bool {
        if n <= 0 {
            return false;
        }

        let mut gate = self.gate.lock();
        let v = self.shared.exact_vector();
        if v <= 0 {
            return false;
        }

        let m = n.min(v);
        let idx = gate.next_stripe(self.stripe_count());
        fetch_saturating_add(&self.shared.stripes[idx], -m);
        if let Some(group_idx) = self.group_of(idx) {
            fetch_saturating_add(&self.shared.groups.as_ref().unwrap()[group_idx], -m);
        }
        fetch_saturating_add(&self.shared.approx_net, -m);
        true
    }

    /// Folds up to `|delta|` of the effective vector into the durable
    /// scalar, aligning the applied sign to the *current* vector rather
    /// than the caller's argument. Never changes `available()`.
    pub fn commit(&self, delta: i64) {
        let _gate = self.gate.lock();
        let v = self.shared.exact_vector();
        if v == 0 {
            return;
        }

        let mag = delta.unsigned_abs().min(v.unsigned_abs()) as i64;
        let signed_delta = sign_of(v) * mag;

        fetch_saturating_add(&self.shared.scalar, -mag);
        fetch_saturating_add(&self.shared.committed_offset, signed_delta);
        fetch_saturating_add(&self.shared.approx_net, -signed_delta);
    }

    /// `(eligible, v)`: `eligible` iff `|V| >= threshold`; `v` is the
    /// effective vector when eligible, else `0`.
    pub fn check_commit(&self, threshold: i64) -> (bool, i64) {
        let v = self.shared.exact_vector();
        if v.abs() >= threshold {
            (true, v)
        } else {
            (false, 0)
        }
    }

    /// `(scalar, vector)`.
    pub fn state(&self) -> (i64, i64) {
        (
            self.shared.scalar.load(Ordering::Acquire),
            self.shared.exact_vector(),
        )
    }

    /// `scalar - |vector|`.
    pub fn available(&self) -> i64 {
        let scalar = self.shared.scalar.load(Ordering::Acquire);
        scalar - self.shared.exact_vector().abs()
    }

    /// Stops the optional background cached-gate refresher. Idempotent;
    /// safe to call after the last operation, and safe to call even if
    /// `use_cached_gate` was never enabled.
    pub fn close(&self) {
        self.refresher_shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.refresher.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Accumulator {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_refresher(
    shared: Arc<Shared>,
    shutdown: Arc<AtomicBool>,
    interval: Duration,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("vsa-cached-gate".to_string())
        .spawn(move || {
            debug!(interval_ms = interval.as_millis() as u64, "cached-gate refresher starting");
            let poll = Duration::from_millis(5).min(interval);
            while !shutdown.load(Ordering::Relaxed) {
                let mut waited = Duration::ZERO;
                while waited < interval {
                    if shutdown.load(Ordering::Relaxed) {
                        debug!("cached-gate refresher stopping");
                        return;
                    }
                    std::thread::sleep(poll);
                    waited += poll;
                }
                let v = shared.exact_vector();
                shared.cached_net.store(v, Ordering::Release);
                shared.cached_at.store(now_nanos(), Ordering::Release);
                debug!(cached_net = v, "cached-gate refreshed");
            }
            debug!("cached-gate refresher stopping");
        })
        .expect("failed to spawn cached-gate refresher thread")
}

#[cfg(test)]
mod tests {
    // Accumulator handles are shared across the hot path and the worker via Arc.
    static_assertions::assert_impl_all!(super::Accumulator: Send, Sync);

    use super::*;
    use crate::options::AccumulatorOptions;
    use std::sync::Barrier;

    #[test]
    fn basic_accounting_scenario() {
        // update, then a threshold commit, then check the books balance.
        let acc = Accumulator::new(1000, AccumulatorOptions::default());
        acc.update(30);
        acc.update(19);
        assert_eq!(acc.state(), (1000, 49));
        assert_eq!(acc.available(), 951);

        acc.update(1);
        let (eligible, v) = acc.check_commit(50);
        assert_eq!((eligible, v), (true, 50));

        acc.commit(50);
        assert_eq!(acc.state(), (950, 0));
        assert_eq!(acc.available(), 950);
    }

    #[test]
    fn refund_clamp_after_partial_commit_scenario() {
        // a refund after a partial commit must clamp to the remaining vector.
        let acc = Accumulator::new(10, AccumulatorOptions::default());
        assert!(acc.try_consume(4));
        assert_eq!(acc.state(), (10, 4));

        acc.commit(3);
        assert_eq!(acc.state(), (7, 1));
        assert_eq!(acc.available(), 6);

        assert!(acc.try_refund(2));
        assert_eq!(acc.state(), (7, 0));
        assert_eq!(acc.available(), 7);
    }

    #[test]
    fn no_oversubscription_under_concurrent_consumers() {
        // many concurrent consumers must never drive availability negative.
        const THREADS: usize = 64;
        const CAPACITY: i64 = 1000;

        let acc = Arc::new(Accumulator::new(CAPACITY, AccumulatorOptions::default()));
        let accepted = Arc::new(AtomicI64::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let acc = Arc::clone(&acc);
                let accepted = Arc::clone(&accepted);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    while accepted.load(Ordering::Relaxed) < CAPACITY {
                        if acc.try_consume(1) {
                            accepted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(accepted.load(Ordering::Relaxed), CAPACITY);
        assert_eq!(acc.available(), 0);
    }

    #[test]
    fn update_plus_minus_is_a_no_op() {
        let acc = Accumulator::new(500, AccumulatorOptions::default());
        let before = acc.state();
        acc.update(77);
        acc.update(-77);
        assert_eq!(acc.state(), before);
    }

    #[test]
    fn consume_then_refund_restores_state() {
        let acc = Accumulator::new(500, AccumulatorOptions::default());
        let before = acc.state();
        assert!(acc.try_consume(40));
        assert!(acc.try_refund(40));
        assert_eq!(acc.state(), before);
        assert_eq!(acc.available(), before.0 - before.1.abs());
    }

    #[test]
    fn try_consume_rejects_non_positive() {
        let acc = Accumulator::new(100, AccumulatorOptions::default());
        assert!(!acc.try_consume(0));
        assert!(!acc.try_consume(-5));
    }

    #[test]
    fn try_refund_rejects_non_positive_and_empty_vector() {
        let acc = Accumulator::new(100, AccumulatorOptions::default());
        assert!(!acc.try_refund(0));
        assert!(!acc.try_refund(-1));
        assert!(!acc.try_refund(5)); // vector is still zero
    }

    #[test]
    fn commit_never_changes_availability() {
        let acc = Accumulator::new(200, AccumulatorOptions::default());
        acc.update(37);
        let before = acc.available();
        acc.commit(37);
        assert_eq!(acc.available(), before);
    }

    #[test]
    fn commit_aligns_sign_to_vector_not_argument() {
        let acc = Accumulator::new(200, AccumulatorOptions::default());
        acc.update(-10); // vector is negative
        let before = acc.available();
        acc.commit(10); // positive argument, but vector is negative
        let (scalar, v) = acc.state();
        assert_eq!(v, 0);
        assert_eq!(scalar, 210); // scalar grew since the negative vector folded in
        assert_eq!(acc.available(), before);
    }

    #[test]
    fn commit_on_zero_vector_is_a_no_op() {
        let acc = Accumulator::new(42, AccumulatorOptions::default());
        acc.commit(1000);
        assert_eq!(acc.state(), (42, 0));
    }

    #[test]
    fn cached_gate_estimate_is_used_when_enabled() {
        let opts = AccumulatorOptions::default()
            .with_cached_gate(Duration::from_millis(5), 0);
        let acc = Accumulator::new(1000, opts);
        acc.update(100);
        std::thread::sleep(Duration::from_millis(30));
        assert!(acc.try_consume(50));
        acc.close();
    }

    #[test]
    fn grouped_scan_estimate_is_used_when_enabled() {
        let opts = AccumulatorOptions::default()
            .with_stripes(16)
            .with_groups(4, 0);
        let acc = Accumulator::new(1000, opts);
        for _ in 0..20 {
            acc.update(5);
        }
        assert_eq!(acc.state(), (1000, 100));
        assert!(acc.try_consume(50));
    }

    #[test]
    fn fast_path_admits_when_margin_exceeds_guard() {
        let opts = AccumulatorOptions::default().with_fast_path_guard(10);
        let acc = Accumulator::new(1000, opts);
        assert!(acc.try_consume(5));
        assert_eq!(acc.state(), (1000, 5));
    }

    #[test]
    fn close_is_idempotent() {
        let acc = Accumulator::new(1, AccumulatorOptions::default());
        acc.close();
        acc.close();
    }
}
