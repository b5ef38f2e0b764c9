//! Worker configuration.

use std::time::Duration;

/// Configuration for a [`crate::Worker`]'s two periodic loops.
///
/// Plain data with a `Default` and `with_*` builders, the same idiom as
/// `vsa_accumulator::AccumulatorOptions`.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// High watermark: a key becomes commit-eligible when `|V| >= commit_threshold`.
    pub commit_threshold: i64,
    /// Hysteresis low watermark. `0` disables hysteresis.
    pub low_commit_threshold: i64,
    /// Scan cadence for the commit loop.
    pub commit_interval: Duration,
    /// Freshness bound: a non-zero vector untouched for this long becomes
    /// commit-eligible regardless of threshold. `Duration::ZERO` disables
    /// this rule.
    pub commit_max_age: Duration,
    /// Idle duration after which a key is an eviction candidate.
    pub eviction_age: Duration,
    /// Scan cadence for the eviction loop.
    pub eviction_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            commit_threshold: 100,
            low_commit_threshold: 0,
            commit_interval: Duration::from_secs(1),
            commit_max_age: Duration::ZERO,
            eviction_age: Duration::from_secs(5 * 60),
            eviction_interval: Duration::from_secs(30),
        }
    }
}

impl WorkerConfig {
    /// Set the high watermark.
    pub fn with_commit_threshold(mut self, threshold: i64) -> Self {
        self.commit_threshold = threshold;
        self
    }

    /// Set the hysteresis low watermark. `0` disables hysteresis.
    pub fn with_low_commit_threshold(mut self, threshold: i64) -> Self {
        self.low_commit_threshold = threshold;
        self
    }

    /// Set the commit-loop scan cadence.
    pub fn with_commit_interval(mut self, interval: Duration) -> Self {
        self.commit_interval = interval;
        self
    }

    /// Set the freshness bound. `Duration::ZERO` disables it.
    pub fn with_commit_max_age(mut self, max_age: Duration) -> Self {
        self.commit_max_age = max_age;
        self
    }

    /// Set the idle duration after which a key becomes an eviction
    /// candidate.
    pub fn with_eviction_age(mut self, age: Duration) -> Self {
        self.eviction_age = age;
        self
    }

    /// Set the eviction-loop scan cadence.
    pub fn with_eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval = interval;
        self
    }

    pub(crate) fn hysteresis_enabled(&self) -> bool {
        self.low_commit_threshold > 0
    }
}
