//! Background thread bodies for the two periodic scans.
//!
//! Mirrors the teacher's `TTLCleaner`/`BackgroundScheduler` shape: sleep in
//! small increments against a shared shutdown flag so `stop()` returns
//! promptly rather than waiting out a full tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vsa_persist::Persister;
use vsa_store::Store;

use crate::commit_id::CommitIdSeq;
use crate::config::WorkerConfig;
use crate::scan::{commit_tick, eviction_tick};

const POLL_QUANTUM: Duration = Duration::from_millis(20);

/// Sleeps for `total`, checking `shutdown` every [`POLL_QUANTUM`]. Returns
/// `true` if shutdown was observed before `total` elapsed.
fn sleep_checking_shutdown(total: Duration, shutdown: &AtomicBool) -> bool {
    let quantum = POLL_QUANTUM.min(total.max(Duration::from_millis(1)));
    let mut waited = Duration::ZERO;
    while waited < total {
        if shutdown.load(Ordering::Relaxed) {
            return true;
        }
        std::thread::sleep(quantum);
        waited += quantum;
    }
    shutdown.load(Ordering::Relaxed)
}

pub(crate) fn commit_loop(
    store: Arc<Store>,
    persister: Arc<dyn Persister>,
    config: WorkerConfig,
    shutdown: Arc<AtomicBool>,
    seq: Arc<CommitIdSeq>,
) {
    while !sleep_checking_shutdown(config.commit_interval, &shutdown) {
        commit_tick(&store, persister.as_ref(), &config, &seq);
    }
}

pub(crate) fn eviction_loop(
    store: Arc<Store>,
    persister: Arc<dyn Persister>,
    config: WorkerConfig,
    shutdown: Arc<AtomicBool>,
    seq: Arc<CommitIdSeq>,
) {
    while !sleep_checking_shutdown(config.eviction_interval, &shutdown) {
        eviction_tick(&store, persister.as_ref(), &config, &seq);
    }
}
