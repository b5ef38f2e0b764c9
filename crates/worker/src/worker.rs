//! The background worker (C4): orchestrates the commit-scan and
//! eviction-scan loops, plus shutdown with a terminal drain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use vsa_persist::Persister;
use vsa_store::Store;

use crate::commit_id::CommitIdSeq;
use crate::config::WorkerConfig;
use crate::loop_runner::{commit_loop, eviction_loop};
use crate::scan::terminal_drain;

/// Orchestrates the commit-scan and eviction-scan loops over a [`Store`].
pub struct Worker {
    store: Arc<Store>,
    persister: Arc<dyn Persister>,
    config: WorkerConfig,
    shutdown: Arc<AtomicBool>,
    seq: Arc<CommitIdSeq>,
    commit_thread: Mutex<Option<JoinHandle<()>>>,
    eviction_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    /// Construct a worker over `store`, submitting batches to `persister`.
    pub fn new(store: Arc<Store>, persister: Arc<dyn Persister>, config: WorkerConfig) -> Self {
        Self {
            store,
            persister,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            seq: Arc::new(CommitIdSeq::new()),
            commit_thread: Mutex::new(None),
            eviction_thread: Mutex::new(None),
        }
    }

    /// Spawns the commit-scan and eviction-scan threads. Idempotent: a
    /// second call while already running is a no-op.
    pub fn start(&self) {
        let mut commit_thread = self.commit_thread.lock();
        if commit_thread.is_none() {
            let store = Arc::clone(&self.store);
            let persister = Arc::clone(&self.persister);
            let config = self.config.clone();
            let shutdown = Arc::clone(&self.shutdown);
            let seq = Arc::clone(&self.seq);
            *commit_thread = Some(
                std::thread::Builder::new()
                    .name("vsa-commit-scan".to_string())
                    .spawn(move || commit_loop(store, persister, config, shutdown, seq))
                    .expect("failed to spawn commit-scan thread"),
            );
        }
        drop(commit_thread);

        let mut eviction_thread = self.eviction_thread.lock();
        if eviction_thread.is_none() {
            let store = Arc::clone(&self.store);
            let persister = Arc::clone(&self.persister);
            let config = self.config.clone();
            let shutdown = Arc::clone(&self.shutdown);
            let seq = Arc::clone(&self.seq);
            *eviction_thread = Some(
                std::thread::Builder::new()
                    .name("vsa-eviction-scan".to_string())
                    .spawn(move || eviction_loop(store, persister, config, shutdown, seq))
                    .expect("failed to spawn eviction-scan thread"),
            );
        }
    }

    /// Stops both loops, runs the terminal-drain final flush, and releases
    /// every accumulator via `Store::close_all`.
    ///
    /// Per the shutdown contract: (a) drain the commit loop with a final
    /// flush committing every non-zero vector, (b) stop the eviction loop,
    /// (c) invoke `close()` on every accumulator.
    pub fn stop(&self) -> vsa_core::Result<()> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(handle) = self.commit_thread.lock().take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.eviction_thread.lock().take() {
            let _ = handle.join();
        }

        let drain_result = terminal_drain(&self.store, self.persister.as_ref(), &self.seq);
        self.store.close_all();
        drain_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Worker: Send, Sync);

    #[test]
    fn stop_without_start_is_harmless() {
        let store = Arc::new(Store::new(0));
        let persister = Arc::new(vsa_persist::MockPersister::new());
        let worker = Worker::new(store, persister, WorkerConfig::default());
        assert!(worker.stop().is_ok());
    }
}
