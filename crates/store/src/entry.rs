//! A single store-managed entry: an accumulator plus worker-facing
//! liveness/hysteresis metadata.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use vsa_accumulator::Accumulator;
use vsa_core::now_nanos;

/// An accumulator owned by the [`crate::Store`], paired with the metadata
/// the worker needs to decide commit/eviction eligibility.
///
/// The store exclusively owns the `Accumulator`; this struct is the only
/// thing callers and the worker ever see a shared reference to.
pub struct ManagedEntry {
    /// The underlying counter. Public so hot-path callers can reach
    /// `update`/`try_consume`/`try_refund` directly off the handle
    /// returned by `Store::get_or_create`.
    pub accumulator: Arc<Accumulator>,
    last_accessed: AtomicU64,
    armed: AtomicBool,
}

impl ManagedEntry {
    pub(crate) fn new(accumulator: Accumulator) -> Self {
        Self {
            accumulator: Arc::new(accumulator),
            last_accessed: AtomicU64::new(now_nanos()),
            armed: AtomicBool::new(true),
        }
    }

    /// Last-access timestamp, nanoseconds since the Unix epoch.
    pub fn last_accessed(&self) -> u64 {
        self.last_accessed.load(Ordering::Acquire)
    }

    /// Whether the entry is armed for threshold-triggered commits.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Disarms the entry (called by the worker after a threshold-triggered
    /// commit).
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Re-arms the entry (called by the worker once the vector falls
    /// within the hysteresis band).
    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    /// Updates `last_accessed` to the current time. Exposed so tests can
    /// simulate staleness by leaving it un-touched.
    pub fn touch(&self) {
        self.last_accessed.store(now_nanos(), Ordering::Release);
    }

    /// Overrides `last_accessed` directly. Test-only hook for simulating
    /// freshness-deadline and idle-eviction scenarios without sleeping.
    #[doc(hidden)]
    pub fn set_last_accessed_for_test(&self, nanos: u64) {
        self.last_accessed.store(nanos, Ordering::Release);
    }
}
