//! Construction options for [`crate::Accumulator`].

use std::time::Duration;

/// Stripe-selection strategy for `update`'s lock-free hot path.
///
/// The choice is purely a distribution strategy — it never affects the
/// semantic vector sum, only how contention is spread across stripes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chooser {
    /// A single shared `AtomicUsize` round-robin counter.
    RoundRobin,
    /// A per-thread pseudo-random index drawn from a pooled RNG.
    PerTaskPrng,
    /// A stable identifier derived from the calling thread, approximating
    /// per-core placement without requiring OS affinity APIs.
    PerCoreId,
}

impl Default for Chooser {
    fn default() -> Self {
        Chooser::RoundRobin
    }
}

/// Construction options for an [`crate::Accumulator`].
///
/// Plain data with a `Default` impl and `with_*` builders, the same idiom
/// the teacher uses for `DatabaseConfig`/`WalConfig` — no external
/// config-loading crate, since these are callbacks the embedding
/// application decides, not environment-sourced settings.
#[derive(Debug, Clone)]
pub struct AccumulatorOptions {
    /// Number of stripes; must be a power of two in `[8, 64]`.
    pub stripes: usize,
    /// Strategy used to pick a stripe on the lock-free `update` path.
    pub chooser: Chooser,
    /// Enables the background-refreshed cached-gate fast estimate.
    pub use_cached_gate: bool,
    /// How often the cached-gate refresher recomputes the exact vector.
    pub cache_interval: Duration,
    /// Safety margin subtracted from the cached-gate availability estimate.
    pub cache_slack: i64,
    /// Number of stripe groups for the grouped-scan estimate and for
    /// hierarchical aggregation. `0` or `1` disables grouping.
    pub group_count: usize,
    /// Safety margin subtracted from the grouped-scan availability estimate.
    pub group_slack: i64,
    /// Guard distance for `try_consume`'s lock-free fast path. `0` disables
    /// the fast path; per the spec's open question, the fast path is
    /// disabled by default since its safety depends on the guard exceeding
    /// the maximum number of concurrently admitting threads, a property
    /// this crate cannot verify on the caller's behalf.
    pub fast_path_guard: i64,
}

impl Default for AccumulatorOptions {
    fn default() -> Self {
        Self {
            stripes: 16,
            chooser: Chooser::RoundRobin,
            use_cached_gate: false,
            cache_interval: Duration::from_millis(10),
            cache_slack: 0,
            group_count: 0,
            group_slack: 0,
            fast_path_guard: 0,
        }
    }
}

impl AccumulatorOptions {
    /// Set the stripe count. Rounded up to the nearest power of two and
    /// clamped to `[8, 64]`.
    pub fn with_stripes(mut self, stripes: usize) -> Self {
        self.stripes = clamp_pow2(stripes);
        self
    }

    /// Set the stripe-selection strategy.
    pub fn with_chooser(mut self, chooser: Chooser) -> Self {
        self.chooser = chooser;
        self
    }

    /// Enable the cached-gate fast estimate with the given refresh interval
    /// and slack.
    pub fn with_cached_gate(mut self, interval: Duration, slack: i64) -> Self {
        self.use_cached_gate = true;
        self.cache_interval = interval;
        self.cache_slack = slack.max(0);
        self
    }

    /// Enable grouped-scan estimation / hierarchical aggregation with the
    /// given group count and slack.
    pub fn with_groups(mut self, group_count: usize, slack: i64) -> Self {
        self.group_count = group_count;
        self.group_slack = slack.max(0);
        self
    }

    /// Enable the lock-free fast path inside `try_consume` with the given
    /// guard distance.
    pub fn with_fast_path_guard(mut self, guard: i64) -> Self {
        self.fast_path_guard = guard.max(0);
        self
    }

    pub(crate) fn validated_stripes(&self) -> usize {
        clamp_pow2(self.stripes)
    }

    pub(crate) fn groups_enabled(&self) -> bool {
        self.group_count > 1 && self.group_count <= self.validated_stripes()
    }
}

fn clamp_pow2(n: usize) -> usize {
    let n = n.clamp(8, 64);
    n.next_power_of_two().min(64).max(8)
}
