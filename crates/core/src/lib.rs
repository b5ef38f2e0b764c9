//! Shared types for the Vector-Scalar Accumulator (VSA) workspace.
//!
//! This crate defines the foundational types used throughout the system:
//! - `Key`: a cheap-to-clone identifier for accumulators
//! - `Error`/`Result`: the unified error hierarchy for commit/shutdown failures
//! - numeric helpers shared by the accumulator and worker crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arith;
pub mod error;
pub mod key;
pub mod time;

pub use arith::sign_of;
pub use error::{Error, Result};
pub use key::Key;
pub use time::now_nanos;
