//! The accumulator store (C2): a process-wide, sharded concurrent map from
//! key to [`vsa_accumulator::Accumulator`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod entry;
mod store;

pub use entry::ManagedEntry;
pub use store::Store;
