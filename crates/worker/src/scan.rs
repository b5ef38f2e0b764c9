//! The commit-scan and eviction-scan decision logic (one tick each).
//!
//! Kept as free functions over `&Store`/`&dyn Persister` rather than
//! methods so the terminal drain in `Worker::stop` can reuse the same
//! commit-batching code path as the periodic commit loop.

use std::sync::Arc;

use tracing::{debug, warn};

use vsa_core::{now_nanos, Key};
use vsa_persist::{CommitRecord, Persister};
use vsa_store::{ManagedEntry, Store};

use crate::commit_id::CommitIdSeq;
use crate::config::WorkerConfig;

struct Candidate {
    key: Key,
    entry: Arc<ManagedEntry>,
    v: i64,
    by_threshold: bool,
}

/// Runs one commit-scan tick: decides eligibility, batches, submits, and
/// folds successful commits back into their accumulators.
pub(crate) fn commit_tick(store: &Store, persister: &dyn Persister, config: &WorkerConfig, seq: &CommitIdSeq) {
    let now = now_nanos();
    let mut candidates = Vec::new();

    store.for_each(|key, entry| {
        let (_, v) = entry.accumulator.state();
        let armed = entry.is_armed();
        let last_accessed = entry.last_accessed();

        let by_threshold =
            v.abs() >= config.commit_threshold && (!config.hysteresis_enabled() || armed);
        let by_age = !config.commit_max_age.is_zero()
            && v != 0
            && now.saturating_sub(last_accessed) >= config.commit_max_age.as_nanos() as u64;

        if by_threshold || by_age {
            candidates.push(Candidate {
                key: key.clone(),
                entry: Arc::clone(entry),
                v,
                by_threshold,
            });
        } else if config.hysteresis_enabled() && v.abs() <= config.low_commit_threshold {
            entry.arm();
        }
    });

    if candidates.is_empty() {
        return;
    }

    let records: Vec<CommitRecord> = candidates
        .iter()
        .map(|c| CommitRecord::new(c.key.clone(), c.v, seq.next(&c.key)))
        .collect();

    debug!(batch_size = records.len(), "commit-scan: submitting batch");

    match persister.commit_batch(&records) {
        Ok(()) => {
            for (c, rec) in candidates.iter().zip(records.iter()) {
                c.entry.accumulator.commit(rec.delta);
                if c.by_threshold {
                    c.entry.disarm();
                }
            }
        }
        Err(err) => {
            // Preserve in-memory state: never call `commit`, and never
            // disarm — a future tick will still see the same threshold
            // breach and retry.
            warn!(error = %err, "commit-scan: batch failed, retrying on a later tick");
        }
    }
}

/// Runs one eviction-scan tick: re-checks staleness, final-flushes, and
/// removes idle entries.
pub(crate) fn eviction_tick(store: &Store, persister: &dyn Persister, config: &WorkerConfig, seq: &CommitIdSeq) {
    let now = now_nanos();
    let age_nanos = config.eviction_age.as_nanos() as u64;

    let mut stale = Vec::new();
    store.for_each(|key, entry| {
        if now.saturating_sub(entry.last_accessed()) > age_nanos {
            stale.push((key.clone(), Arc::clone(entry)));
        }
    });

    for (key, entry) in stale {
        if now_nanos().saturating_sub(entry.last_accessed()) <= age_nanos {
            continue; // touched since we collected it
        }

        let (_, v) = entry.accumulator.state();
        if v != 0 {
            let record = CommitRecord::new(key.clone(), v, seq.next(&key));
            match persister.commit_batch(std::slice::from_ref(&record)) {
                Ok(()) => entry.accumulator.commit(v),
                Err(err) => {
                    warn!(%key, error = %err, "eviction-scan: final flush failed, leaving entry in place");
                    continue;
                }
            }
        }

        entry.accumulator.close();
        store.delete(&key);
    }
}

/// Terminal drain run once on shutdown: commits every entry with a
/// non-zero vector regardless of threshold or arming, in a single batch.
pub(crate) fn terminal_drain(
    store: &Store,
    persister: &dyn Persister,
    seq: &CommitIdSeq,
) -> Result<(), vsa_core::Error> {
    let mut pending = Vec::new();
    store.for_each(|key, entry| {
        let (_, v) = entry.accumulator.state();
        if v != 0 {
            pending.push((key.clone(), Arc::clone(entry), v));
        }
    });

    if pending.is_empty() {
        return Ok(());
    }

    let records: Vec<CommitRecord> = pending
        .iter()
        .map(|(key, _, v)| CommitRecord::new(key.clone(), *v, seq.next(key)))
        .collect();

    debug!(batch_size = records.len(), "terminal drain: submitting final flush");

    persister.commit_batch(&records).map_err(|err| {
        warn!(error = %err, "terminal drain: final flush failed");
        vsa_core::Error::PersistenceFailed { source: err.into() }
    })?;

    for ((_, entry, _), rec) in pending.iter().zip(records.iter()) {
        entry.accumulator.commit(rec.delta);
    }
    Ok(())
}
