//! A `Persister` decorator that traces every `commit_batch` call.
//!
//! This is the ambient-logging element the Non-goals around "observability
//! emitters" do not actually exclude: it instruments the core's own
//! persister boundary rather than shipping an external metrics product.

use tracing::{debug, warn};

use crate::persister::{PersistResult, Persister};
use crate::record::CommitRecord;

/// Wraps any [`Persister`] and emits `tracing` events around each
/// `commit_batch` call.
pub struct LoggingPersister<P> {
    inner: P,
}

impl<P: Persister> LoggingPersister<P> {
    /// Wrap `inner` with tracing instrumentation.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Persister> Persister for LoggingPersister<P> {
    fn commit_batch(&self, entries: &[CommitRecord]) -> PersistResult<()> {
        debug!(batch_size = entries.len(), "submitting commit batch");
        match self.inner.commit_batch(entries) {
            Ok(()) => {
                debug!(batch_size = entries.len(), "commit batch applied");
                Ok(())
            }
            Err(err) => {
                warn!(batch_size = entries.len(), error = %err, "commit batch failed");
                Err(err)
            }
        }
    }
}
