//! An in-process, idempotent reference [`Persister`](crate::Persister)
//! implementation. Not a production backend — the point of a "mock" here
//! is the same as the teacher's in-memory test doubles: a way to exercise
//! the worker's commit protocol without standing up a real store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::persister::{PersistError, PersistResult, Persister};
use crate::record::CommitRecord;
use vsa_core::Key;

/// In-memory idempotent persister: durable scalars live in a `DashMap`,
/// and a per-key set of applied `commit_id`s makes replays a no-op.
pub struct MockPersister {
    durable: DashMap<Key, i64>,
    applied: DashMap<Key, Mutex<HashSet<String>>>,
    /// When greater than zero, the next `commit_batch` call fails and this
    /// counter is decremented. Lets tests exercise the
    /// `persistence_failed` path deterministically.
    fail_next: AtomicUsize,
}

impl MockPersister {
    /// Create an empty mock persister.
    pub fn new() -> Self {
        Self {
            durable: DashMap::new(),
            applied: DashMap::new(),
            fail_next: AtomicUsize::new(0),
        }
    }

    /// Arranges for the next `n` calls to `commit_batch` to fail.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Current durable scalar for `key`, or `None` if never committed.
    pub fn durable_scalar(&self, key: &Key) -> Option<i64> {
        self.durable.get(key).map(|v| *v)
    }
}

impl Default for MockPersister {
    fn default() -> Self {
        Self::new()
    }
}

impl Persister for MockPersister {
    fn commit_batch(&self, entries: &[CommitRecord]) -> PersistResult<()> {
        if self.fail_next.load(Ordering::SeqCst) > 0 {
            self.fail_next.fetch_sub(1, Ordering::SeqCst);
            return Err(PersistError::new(anyhow::anyhow!(
                "mock persister: injected failure"
            )));
        }

        for entry in entries {
            let applied = self
                .applied
                .entry(entry.key.clone())
                .or_insert_with(|| Mutex::new(HashSet::new()));
            let mut applied = applied.lock();
            if applied.insert(entry.commit_id.clone()) {
                *self.durable.entry(entry.key.clone()).or_insert(0) -= entry.delta;
            }
        }
        Ok(())
    }
}
