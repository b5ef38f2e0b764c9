//! Commit records exchanged between the worker and a [`crate::Persister`].

use serde::{Deserialize, Serialize};
use vsa_core::Key;

/// A single commit to apply durably.
///
/// `commit_id` must be stable across retries of the same logical commit —
/// it is how an adapter recognizes and discards a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The accumulator key this commit applies to.
    pub key: Key,
    /// The (already sign-aligned) amount to fold into the durable scalar.
    pub delta: i64,
    /// Idempotency token for this commit.
    pub commit_id: String,
    /// Optional fencing token for adapters that support multi-writer
    /// safety.
    pub fencing_token: Option<i64>,
}

impl CommitRecord {
    /// Construct a commit record without a fencing token.
    pub fn new(key: Key, delta: i64, commit_id: impl Into<String>) -> Self {
        Self {
            key,
            delta,
            commit_id: commit_id.into(),
            fencing_token: None,
        }
    }

    /// Attach a fencing token.
    pub fn with_fencing_token(mut self, token: i64) -> Self {
        self.fencing_token = Some(token);
        self
    }
}
