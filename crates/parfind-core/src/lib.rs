#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod coarse;
pub mod engine;
pub mod error;
pub mod executor;
pub mod fine;
pub mod lockfree;
pub mod ops;
pub mod serial;
pub mod slot;
pub mod workload;

pub use coarse::CoarseSet;
pub use engine::{DisjointSet, EngineKind, WorkloadOutcome, run_workload};
pub use error::SetError;
pub use executor::{INTERNAL_ERROR_SENTINEL, OUT_OF_RANGE_SENTINEL, process_batch};
pub use fine::FineSet;
pub use lockfree::{IpcSet, LockFreeSet, PlainWriteSet};
pub use ops::{OpKind, Operation};
pub use serial::SerialSet;
pub use workload::{Fixture, FixtureStep, Workload, WorkloadError, parse_fixture, parse_workload};

/// Returns the current version of the parfind-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
