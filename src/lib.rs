//! # vsa
//!
//! A striped, lock-free concurrent accumulator with batched durable
//! commits: a shared pool of atomic stripes absorbs high-frequency
//! `update` calls without contention, a mutex-gated slow path provides
//! exact, oversubscription-free `try_consume`/`try_refund`/`commit`
//! bookkeeping, and a background worker periodically folds accumulated
//! deltas into durable storage through a pluggable [`Persister`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vsa::{Accumulator, AccumulatorOptions, MockPersister, Store, Worker, WorkerConfig};
//!
//! fn main() {
//!     let store = Arc::new(Store::new(0));
//!     let entry = store.get_or_create("inventory:sku-42");
//!     entry.accumulator.update(10);
//!     assert!(entry.accumulator.try_consume(3));
//!
//!     let persister = Arc::new(MockPersister::new());
//!     let worker = Worker::new(Arc::clone(&store), persister, WorkerConfig::default());
//!     worker.start();
//!     // ... accumulate, consume, refund ...
//!     worker.stop().unwrap();
//!
//!     let _ = AccumulatorOptions::default();
//!     let _: &Accumulator = &entry.accumulator;
//! }
//! ```
//!
//! # Architecture
//!
//! | Crate | Purpose | Key Types |
//! |-------|---------|-----------|
//! | `vsa-core` | Shared primitives: keys, error, time, sign arithmetic | [`Key`], [`Error`] |
//! | `vsa-accumulator` | The striped accumulator itself | [`Accumulator`], [`AccumulatorOptions`], [`Chooser`] |
//! | `vsa-store` | Concurrent keyed registry of accumulators | [`Store`], [`ManagedEntry`] |
//! | `vsa-persist` | The durable-commit boundary | [`Persister`], [`CommitRecord`], [`MockPersister`] |
//! | `vsa-worker` | Background commit-scan and eviction-scan loops | [`Worker`], [`WorkerConfig`] |
//!
//! Only this crate's re-exported surface is stable; the sub-crates are
//! implementation details and may be reshuffled between releases.

pub use vsa_accumulator::{Accumulator, AccumulatorOptions, Chooser};
pub use vsa_core::{Error, Key, Result};
pub use vsa_persist::{CommitRecord, LoggingPersister, MockPersister, PersistError, PersistResult, Persister};
pub use vsa_store::{ManagedEntry, Store};
pub use vsa_worker::{Worker, WorkerConfig};
