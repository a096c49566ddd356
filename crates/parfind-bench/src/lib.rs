//! Workload generator and correctness utilities for the parfind engines.
//!
//! This crate provides deterministic generation of operation workloads for
//! benchmarking, and the invariant checkers the correctness harness and the
//! `parfind verify` command use to compare engines against the serial
//! baseline.

pub mod correctness;
pub mod generator;

pub use correctness::{
    canonical_labels, check_fixture, check_partitions_match, check_result_conventions,
};
pub use generator::{ContentionProfile, SizeTier, WorkloadConfig, generate_workload, write_workload};
