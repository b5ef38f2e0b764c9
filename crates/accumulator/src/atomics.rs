//! CAS-loop helpers for saturating/checked updates to a single `AtomicI64`.
//!
//! `AtomicI64::fetch_add` wraps on overflow; every call site in this crate
//! that touches the signed-64 domain goes through one of these instead so
//! the overflow policy documented on the public API (saturate for
//! `update`, reject for the gated paths) is actually enforced rather than
//! left to two's-complement wraparound.

use std::sync::atomic::{AtomicI64, Ordering};

/// Adds `delta` to `cell`, saturating at `i64::MAX`/`i64::MIN` instead of
/// wrapping. Returns the value observed just before the update.
pub(crate) fn fetch_saturating_add(cell: &AtomicI64, delta: i64) -> i64 {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = current.saturating_add(delta);
        match cell.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(prev) => return prev,
            Err(actual) => current = actual,
        }
    }
}

/// Adds `delta` to `cell` only if doing so would not overflow `i64`.
/// Returns the pre-update value on success, `None` if the addition would
/// overflow (the cell is left untouched).
pub(crate) fn fetch_checked_add(cell: &AtomicI64, delta: i64) -> Option<i64> {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let next = current.checked_add(delta)?;
        match cell.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(prev) => return Some(prev),
            Err(actual) => current = actual,
        }
    }
}
