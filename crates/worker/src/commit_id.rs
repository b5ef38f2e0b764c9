//! Commit-id generation.
//!
//! Freshly generated per call — acceptable for the core, since retry-stable
//! idempotency across ticks is a property of a future retry policy, not
//! this core.

use std::sync::atomic::{AtomicU64, Ordering};

use vsa_core::Key;

/// Process-unique commit-id generator.
#[derive(Debug, Default)]
pub(crate) struct CommitIdSeq(AtomicU64);

impl CommitIdSeq {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub(crate) fn next(&self, key: &Key) -> String {
        let seq = self.0.fetch_add(1, Ordering::Relaxed);
        format!("{key}-{seq}")
    }
}
