//! Bench report rendering: human-readable and JSON modes.
//!
//! Human mode writes an aligned key/value block to stdout; JSON mode writes
//! a single pretty-printed object so reports can be collected by scripts.
//! Diagnostics and progress never land on stdout in either mode.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;

/// One benchmark run's aggregated timings.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Engine name (`serial`, `coarse`, …).
    pub engine: String,
    /// Workload source label (path or `-`).
    pub source: String,
    /// Universe size.
    pub n_elements: usize,
    /// Operation count per run.
    pub n_operations: usize,
    /// Number of timed runs.
    pub num_runs: usize,
    /// Worker threads per run.
    pub num_threads: usize,
    /// Fastest run, milliseconds.
    pub min_ms: f64,
    /// Slowest run, milliseconds.
    pub max_ms: f64,
    /// Mean run, milliseconds.
    pub mean_ms: f64,
    /// Median run, milliseconds.
    pub median_ms: f64,
    /// Sample standard deviation, milliseconds (0 for a single run).
    pub stddev_ms: f64,
    /// Throughput of the mean run, operations per second.
    pub mean_ops_per_sec: f64,
}

/// Writes a report to `writer` in the requested format.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    report: &BenchReport,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => write_report_human(writer, report),
        OutputFormat::Json => write_report_json(writer, report),
    }
}

fn write_report_human<W: Write>(writer: &mut W, r: &BenchReport) -> std::io::Result<()> {
    writeln!(writer, "engine:      {}", r.engine)?;
    writeln!(
        writer,
        "workload:    {} ({} elements, {} operations)",
        r.source, r.n_elements, r.n_operations
    )?;
    writeln!(
        writer,
        "runs:        {} x {} thread{}",
        r.num_runs,
        r.num_threads,
        if r.num_threads == 1 { "" } else { "s" }
    )?;
    writeln!(
        writer,
        "min/mean/max: {:.3} / {:.3} / {:.3} ms",
        r.min_ms, r.mean_ms, r.max_ms
    )?;
    writeln!(writer, "median:      {:.3} ms", r.median_ms)?;
    writeln!(writer, "stddev:      {:.3} ms", r.stddev_ms)?;
    writeln!(
        writer,
        "throughput:  {:.2} Mops/s",
        r.mean_ops_per_sec / 1_000_000.0
    )
}

fn write_report_json<W: Write>(writer: &mut W, r: &BenchReport) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, r).map_err(std::io::Error::from)?;
    writeln!(writer)
}
