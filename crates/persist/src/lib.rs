//! The persister contract (C3): idempotent batch-commit sinks for the
//! durable side of a VSA deployment.
//!
//! The backend itself is an external collaborator; this crate defines the
//! contract plus reference adapters (`MockPersister`, `LoggingPersister`)
//! used to exercise the worker.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod logging;
mod mock;
mod persister;
mod record;

pub use logging::LoggingPersister;
pub use mock::MockPersister;
pub use persister::{PersistError, PersistResult, Persister};
pub use record::CommitRecord;
