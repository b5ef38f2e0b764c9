//! Wall-clock helpers shared by the accumulator, store, and worker crates.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in nanoseconds since the Unix epoch.
///
/// Used for `last_accessed`/`cached_at` bookkeeping only; never for
/// correctness-critical ordering (the gate and atomics provide that).
pub fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_nanos() as u64
}
