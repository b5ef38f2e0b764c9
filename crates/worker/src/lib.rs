//! The background worker (C4): periodic commit-scan and eviction-scan
//! loops over a [`vsa_store::Store`], talking to a
//! [`vsa_persist::Persister`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commit_id;
mod config;
mod loop_runner;
mod scan;
mod worker;

pub use config::WorkerConfig;
pub use worker::Worker;
