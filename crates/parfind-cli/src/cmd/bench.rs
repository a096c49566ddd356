//! Implementation of `parfind bench <impl> <ops_file> <num_runs> [num_threads]`.
//!
//! Loads a numeric workload, runs `num_runs` timed batches — each on a
//! fresh engine, since the structure is monotone — and reports aggregate
//! wall-clock statistics to stdout. Engine construction and the final
//! root sweep stay outside the timed region.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use parfind_core::{
    CoarseSet, DisjointSet, EngineKind, FineSet, IpcSet, LockFreeSet, Operation, PlainWriteSet,
    SerialSet, process_batch,
};

use crate::cli::{OutputFormat, PathOrStdio};
use crate::error::CliError;
use crate::format::{BenchReport, write_report};
use crate::io::read_input;

/// Runs the `bench` command.
///
/// # Errors
///
/// - Exit-2 [`CliError`] variants for unreadable or unparseable input.
/// - [`CliError::WriteFailed`] if the report cannot be written.
pub fn run(
    engine: EngineKind,
    ops_file: &PathOrStdio,
    num_runs: NonZeroUsize,
    num_threads: Option<NonZeroUsize>,
    format: OutputFormat,
    max_file_size: u64,
) -> Result<(), CliError> {
    let text = read_input(ops_file, max_file_size)?;
    let workload = parfind_core::parse_workload(&text).map_err(|e| CliError::WorkloadParse {
        source: ops_file.label(),
        detail: e.to_string(),
    })?;

    let threads = resolve_threads(engine, num_threads);

    let durations: Vec<Duration> = (0..num_runs.get())
        .map(|_| timed_run(engine, workload.n, &workload.ops, threads))
        .collect();
    let stats = RunStats::from_durations(&durations);

    let report = BenchReport {
        engine: engine.name().to_owned(),
        source: ops_file.label(),
        n_elements: workload.n,
        n_operations: workload.ops.len(),
        num_runs: num_runs.get(),
        num_threads: threads,
        min_ms: stats.min_ms,
        max_ms: stats.max_ms,
        mean_ms: stats.mean_ms,
        median_ms: stats.median_ms,
        stddev_ms: stats.stddev_ms,
        mean_ops_per_sec: stats.ops_per_sec(workload.ops.len()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &report, format).map_err(|e| CliError::WriteFailed {
        target: "stdout".to_owned(),
        detail: e.to_string(),
    })
}

/// Resolves the worker count: the explicit argument, else the machine's
/// available parallelism; the serial engine always runs on one thread.
pub fn resolve_threads(engine: EngineKind, num_threads: Option<NonZeroUsize>) -> usize {
    if engine == EngineKind::Serial {
        return 1;
    }
    num_threads
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get)
}

/// Times one batch on a fresh engine of the given kind.
fn timed_run(kind: EngineKind, n: usize, ops: &[Operation], threads: usize) -> Duration {
    match kind {
        EngineKind::Serial => {
            let mut uf = SerialSet::new(n);
            let mut results = Vec::new();
            let start = Instant::now();
            uf.process_operations(ops, &mut results);
            start.elapsed()
        }
        EngineKind::Coarse => timed_batch(&CoarseSet::new(n), ops, threads),
        EngineKind::Fine => timed_batch(&FineSet::new(n), ops, threads),
        EngineKind::LockFree => timed_batch(&LockFreeSet::new(n), ops, threads),
        EngineKind::LockFreePlain => timed_batch(&PlainWriteSet::new(n), ops, threads),
        EngineKind::LockFreeIpc => timed_batch(&IpcSet::new(n), ops, threads),
    }
}

fn timed_batch<E: DisjointSet>(engine: &E, ops: &[Operation], threads: usize) -> Duration {
    let mut results = Vec::new();
    let start = Instant::now();
    process_batch(engine, ops, threads, &mut results);
    start.elapsed()
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate statistics over a set of run durations, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub stddev_ms: f64,
}

impl RunStats {
    /// Computes statistics over at least one duration.
    ///
    /// The standard deviation is the sample deviation (`n - 1` divisor) and
    /// 0 for a single run; the median of an even count is the mean of the
    /// middle pair.
    pub fn from_durations(durations: &[Duration]) -> Self {
        assert!(!durations.is_empty(), "at least one run is required");

        let mut ms: Vec<f64> = durations.iter().map(|d| d.as_secs_f64() * 1e3).collect();
        ms.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = ms.len();
        let mean = ms.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            ms[n / 2]
        } else {
            (ms[n / 2 - 1] + ms[n / 2]) / 2.0
        };
        let stddev = if n > 1 {
            let var = ms.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Self {
            min_ms: ms[0],
            max_ms: ms[n - 1],
            mean_ms: mean,
            median_ms: median,
            stddev_ms: stddev,
        }
    }

    /// Throughput of the mean run for a batch of `n_operations`.
    pub fn ops_per_sec(&self, n_operations: usize) -> f64 {
        if self.mean_ms <= 0.0 {
            return 0.0;
        }
        n_operations as f64 / (self.mean_ms / 1e3)
    }
}
