//! The striped atomic accumulator (C1): a per-key concurrent counter with
//! `Available = Scalar - |Vector|`.
//!
//! `update` is lock-free; `try_consume`, `try_refund`, and `commit`
//! serialize against each other through a per-accumulator gate. See
//! `accumulator.rs` for the full contract.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod accumulator;
mod atomics;
mod chooser;
mod gate;
mod options;

pub use accumulator::Accumulator;
pub use options::{AccumulatorOptions, Chooser};
