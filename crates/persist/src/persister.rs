//! The `Persister` contract (C3).
//!
//! The choice of backend is an external collaborator — this crate defines
//! only the contract and a couple of reference adapters used to exercise
//! the worker in tests.

use thiserror::Error;

use crate::record::CommitRecord;

/// Error returned by a failed `commit_batch` call.
///
/// Carries an opaque adapter-specific cause; the worker never inspects the
/// cause, only whether the batch succeeded — per the commit contract, a
/// batch is all-or-nothing.
#[derive(Debug, Error)]
#[error("commit_batch failed: {cause}")]
pub struct PersistError {
    #[source]
    cause: anyhow::Error,
}

impl PersistError {
    /// Wrap an arbitrary error as a persistence failure.
    pub fn new(cause: impl Into<anyhow::Error>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// Result type for persister operations.
pub type PersistResult<T> = std::result::Result<T, PersistError>;

/// Idempotent batch-commit sink for the durable side of a VSA deployment.
///
/// # Contract
///
/// `commit_batch` must apply each entry's delta to the durable
/// representation of `key` such that replaying the same `commit_id` for
/// the same `key` is a no-op. Failure must leave durable state exactly as
/// it was before the call — the worker treats the whole batch as either
/// wholly applied or not applied at all, and only calls
/// `Accumulator::commit` after a batch succeeds.
///
/// Adapters that cannot provide all-or-nothing semantics over a batch must
/// split their batches themselves before returning; this trait makes no
/// provision for partial success.
///
/// # Suggested (non-normative) adapter conventions
///
/// - **SQL-style**: two tables, `counters(key, scalar, last_token?)` and
///   `applied_commits(commit_id PRIMARY KEY, key, delta, ts)`. Insert the
///   commit record with conflict-ignore, then update
///   `counters.scalar -= delta` only if that insert was the first for this
///   `commit_id`.
/// - **KV-style with dedup marker**: a per-commit marker key
///   `commit:{key}:{commit_id}` with a TTL; a conditional set-if-absent
///   gates a scripted compare-and-apply `scalar -= delta`.
/// - **Log/event style**: publish one message per entry keyed by
///   `commit_id` for downstream dedup and fold.
pub trait Persister: Send + Sync {
    /// Apply a batch of commits durably and idempotently.
    fn commit_batch(&self, entries: &[CommitRecord]) -> PersistResult<()>;
}
