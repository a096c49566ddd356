//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use parfind_core::EngineKind;

/// Default cap on workload input size (1 GiB). Ten-million-operation files
/// run to a few hundred megabytes of text.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// A CLI argument that is either a filesystem path or the stdio sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdio::Stdio`]; anything else yields
/// [`PathOrStdio::Path`]. For inputs the sentinel means stdin, for the
/// `gen` output it means stdout.
#[derive(Clone, Debug)]
pub enum PathOrStdio {
    /// Use the standard stream.
    Stdio,
    /// Use the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdio {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdio::Stdio)
        } else {
            Ok(PathOrStdio::Path(PathBuf::from(s)))
        }
    }
}

impl PathOrStdio {
    /// A human-readable label for error messages (`"-"` for the stream).
    pub fn label(&self) -> String {
        match self {
            PathOrStdio::Stdio => "-".to_owned(),
            PathOrStdio::Path(path) => path.display().to_string(),
        }
    }
}

/// Output format for the bench report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default).
    Human,
    /// A single JSON object.
    Json,
}

/// Engine selection argument; names match the engine's stable CLI names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// Single-threaded baseline.
    Serial,
    /// One global mutex.
    Coarse,
    /// Per-element locks.
    Fine,
    /// Single-word CAS engine.
    Lockfree,
    /// Lock-free with plain-store path compaction.
    #[value(name = "lockfree_plain")]
    LockfreePlain,
    /// Lock-free with the immediate-parent-check fast path.
    #[value(name = "lockfree_ipc")]
    LockfreeIpc,
}

impl EngineArg {
    /// The core engine kind this argument selects.
    pub fn kind(self) -> EngineKind {
        match self {
            EngineArg::Serial => EngineKind::Serial,
            EngineArg::Coarse => EngineKind::Coarse,
            EngineArg::Fine => EngineKind::Fine,
            EngineArg::Lockfree => EngineKind::LockFree,
            EngineArg::LockfreePlain => EngineKind::LockFreePlain,
            EngineArg::LockfreeIpc => EngineKind::LockFreeIpc,
        }
    }
}

/// The `parfind` binary: benchmark, verify, and generate union-find workloads.
///
/// `--version` reports the engine library's version, which the binary
/// tracks.
#[derive(Parser, Debug)]
#[command(
    name = "parfind",
    about = "Parallel union-find engine driver",
    version = parfind_core::version()
)]
pub struct Cli {
    /// Maximum input size in bytes for workload files and stdin.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FILE_SIZE, value_name = "BYTES")]
    pub max_file_size: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// All top-level subcommands exposed by the `parfind` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Time an engine over a workload file.
    Bench {
        /// Engine implementation to benchmark.
        #[arg(value_enum, value_name = "IMPL")]
        engine: EngineArg,
        /// Path to a workload file, or `-` for stdin.
        #[arg(value_name = "OPS_FILE")]
        ops_file: PathOrStdio,
        /// Number of timed runs; each run starts from a fresh engine.
        #[arg(value_name = "NUM_RUNS")]
        num_runs: NonZeroUsize,
        /// Worker threads (default: available parallelism; serial always 1).
        #[arg(value_name = "NUM_THREADS")]
        num_threads: Option<NonZeroUsize>,
        /// Report format.
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Run an engine and the serial baseline, then compare final partitions.
    Verify {
        /// Engine implementation to check.
        #[arg(value_enum, value_name = "IMPL")]
        engine: EngineArg,
        /// Path to a workload file, or `-` for stdin.
        #[arg(value_name = "OPS_FILE")]
        ops_file: PathOrStdio,
        /// Worker threads (default: available parallelism).
        #[arg(value_name = "NUM_THREADS")]
        num_threads: Option<NonZeroUsize>,
    },

    /// Generate a workload file in the numeric stream format.
    Gen {
        /// Universe size.
        #[arg(value_name = "N_ELEMENTS")]
        n_elements: usize,
        /// Number of operations.
        #[arg(value_name = "N_OPERATIONS")]
        n_operations: usize,
        /// Output path, or `-` for stdout.
        #[arg(value_name = "OUT_FILE")]
        out: PathOrStdio,
        /// Fraction of UNION operations.
        #[arg(long, default_value_t = 0.4, value_name = "RATIO")]
        union_ratio: f64,
        /// Fraction of SAME_SET operations (the remainder is FIND).
        #[arg(long, default_value_t = 0.1, value_name = "RATIO")]
        same_set_ratio: f64,
        /// Draw every operand from elements {0, 1}.
        #[arg(long)]
        hot_pair: bool,
        /// Generator seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[cfg(test)]
mod tests;
