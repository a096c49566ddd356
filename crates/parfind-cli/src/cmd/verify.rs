//! Implementation of `parfind verify <impl> <ops_file> [num_threads]`.
//!
//! Runs the chosen engine and the serial baseline over the same workload
//! and compares the final partitions structurally. Exit codes:
//!
//! - 0 — the partitions match (a summary goes to stderr);
//! - 1 — the engine diverged from the baseline;
//! - 2 — the workload could not be read or parsed.

use std::num::NonZeroUsize;

use parfind_bench::{check_partitions_match, check_result_conventions};
use parfind_core::{EngineKind, run_workload};

use crate::cli::PathOrStdio;
use crate::error::CliError;
use crate::io::read_input;

/// Runs the `verify` command.
///
/// # Errors
///
/// - Exit-2 [`CliError`] variants for unreadable or unparseable input.
/// - [`CliError::VerificationFailed`] when the engine's final partition or
///   its result buffer deviates from what the baseline allows.
pub fn run(
    engine: EngineKind,
    ops_file: &PathOrStdio,
    num_threads: Option<NonZeroUsize>,
    max_file_size: u64,
) -> Result<(), CliError> {
    let text = read_input(ops_file, max_file_size)?;
    let workload = parfind_core::parse_workload(&text).map_err(|e| CliError::WorkloadParse {
        source: ops_file.label(),
        detail: e.to_string(),
    })?;

    let threads = super::bench::resolve_threads(engine, num_threads);
    let baseline = run_workload(EngineKind::Serial, workload.n, &workload.ops, 1);
    let outcome = run_workload(engine, workload.n, &workload.ops, threads);

    check_partitions_match(&baseline.roots, &outcome.roots).map_err(|detail| {
        CliError::VerificationFailed {
            engine: engine.name().to_owned(),
            detail,
        }
    })?;
    // The loader rejected out-of-range operands, so sentinel slots would
    // mean a worker failed internally.
    check_result_conventions(&workload, &outcome.results).map_err(|detail| {
        CliError::VerificationFailed {
            engine: engine.name().to_owned(),
            detail,
        }
    })?;

    eprintln!(
        "verify: {} matches the serial baseline ({} elements, {} operations, {} thread{})",
        engine.name(),
        workload.n,
        workload.ops.len(),
        threads,
        if threads == 1 { "" } else { "s" }
    );
    Ok(())
}
