//! Process-wide mapping from key to [`Accumulator`], sharded for concurrent
//! readers and writers.

use std::sync::Arc;

use dashmap::DashMap;
use vsa_accumulator::{Accumulator, AccumulatorOptions};
use vsa_core::Key;

use crate::entry::ManagedEntry;

/// Process-wide store of accumulators, keyed by logical counter name.
///
/// Backed by `DashMap`, the same choice the teacher's `ShardedStore` makes
/// for a concurrent map that needs lock-free reads and cheap per-shard
/// writes. The store exclusively owns every `Accumulator`; callers and the
/// worker only ever hold a shared `Arc` to one.
pub struct Store {
    entries: DashMap<Key, Arc<ManagedEntry>>,
    default_scalar: i64,
    accumulator_options: AccumulatorOptions,
}

impl Store {
    /// Create a store whose entries start from `default_scalar` with
    /// default accumulator options.
    pub fn new(default_scalar: i64) -> Self {
        Self::with_options(default_scalar, AccumulatorOptions::default())
    }

    /// Create a store whose entries start from `default_scalar`,
    /// constructed with the given accumulator options.
    pub fn with_options(default_scalar: i64, accumulator_options: AccumulatorOptions) -> Self {
        Self {
            entries: DashMap::new(),
            default_scalar,
            accumulator_options,
        }
    }

    /// Returns the entry for `key`, creating it (from `default_scalar`) on
    /// first access. Concurrent racing callers resolve to a single shared
    /// entry; `DashMap`'s entry API discards duplicate constructions.
    pub fn get_or_create(&self, key: impl Into<Key>) -> Arc<ManagedEntry> {
        let key = key.into();
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| {
                let acc = Accumulator::new(self.default_scalar, self.accumulator_options.clone());
                Arc::new(ManagedEntry::new(acc))
            });
        entry.touch();
        Arc::clone(entry.value())
    }

    /// Returns the entry for `key` without creating it.
    pub fn get(&self, key: &Key) -> Option<Arc<ManagedEntry>> {
        self.entries.get(key).map(|e| Arc::clone(e.value()))
    }

    /// Iterates all entries in arbitrary order. The visitor must not
    /// delete entries — route deletion through [`Store::delete`].
    pub fn for_each(&self, mut visitor: impl FnMut(&Key, &Arc<ManagedEntry>)) {
        for item in self.entries.iter() {
            visitor(item.key(), item.value());
        }
    }

    /// Removes the entry for `key`. The caller is responsible for any
    /// terminal commit before calling this.
    pub fn delete(&self, key: &Key) -> Option<Arc<ManagedEntry>> {
        self.entries.remove(key).map(|(_, v)| v)
    }

    /// Number of entries currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stops every accumulator's background refresher and releases the
    /// map. Part of the worker's shutdown contract.
    pub fn close_all(&self) {
        for item in self.entries.iter() {
            item.value().accumulator.close();
        }
        self.entries.clear();
    }
}
