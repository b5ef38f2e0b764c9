//! Error types for the VSA workspace.
//!
//! Hot-path operations (`update`, `try_consume`, `try_refund`) never produce
//! an `Error` — they report rejection via a plain `bool`, per the core's
//! propagation policy. `Error` only ever surfaces from the Worker's
//! interaction with a `Persister`, or from a bounded shutdown deadline.

use thiserror::Error;

/// Result type alias for VSA operations that can fail.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced at the Worker/Persister boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// `Persister::commit_batch` returned an error for a batch.
    ///
    /// The worker preserves the in-memory vector and retries on a later
    /// tick; this variant exists purely for observability.
    #[error("persistence failed: {source}")]
    PersistenceFailed {
        /// Underlying adapter error.
        #[source]
        source: anyhow::Error,
    },

    /// The terminal drain did not complete within the configured shutdown
    /// deadline.
    #[error("shutdown did not complete within the configured deadline")]
    ShutdownTimedOut,
}
