/// Error surface of the `parfind` binary.
///
/// Two failure classes, two exit codes:
///
/// - **exit 2** — the driver never got a usable workload: the input could
///   not be opened, read, or parsed, it blew the size cap, or the argument
///   combination made no sense. Nothing was benchmarked or verified.
/// - **exit 1** — the run itself reached a failing conclusion: an engine's
///   final partition diverged from the serial baseline.
///
/// [`CliError::exit_code`] picks the code; [`CliError::message`] renders
/// the one-line stderr text.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `parfind` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: no usable workload ---
    /// The workload path does not exist on disk.
    MissingInput {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The input exists but could not be read (permissions, device errors,
    /// a broken stdin pipe, and so on).
    UnreadableInput {
        /// Label of the input (`"-"` for stdin).
        source: String,
        /// The underlying I/O failure.
        detail: String,
    },

    /// The input is larger than the `--max-file-size` cap allows.
    OversizedInput {
        /// Label of the input (`"-"` for stdin).
        source: String,
        /// The cap in bytes.
        cap: u64,
        /// Size of the rejected input, when known up front (disk files;
        /// stdin is cut off at the cap without measuring the rest).
        actual: Option<u64>,
    },

    /// The input holds bytes that are not UTF-8 text.
    BinaryInput {
        /// Label of the input (`"-"` for stdin).
        source: String,
        /// Offset of the first byte that broke the decoding.
        offset: usize,
    },

    /// A generated workload could not be written out.
    WriteFailed {
        /// Label of the destination (`"-"` for stdout).
        target: String,
        /// The underlying I/O failure.
        detail: String,
    },

    /// The workload text did not parse.
    WorkloadParse {
        /// Label of the input.
        source: String,
        /// The loader's description of the problem.
        detail: String,
    },

    /// Arguments were individually valid but inconsistent together.
    BadArguments {
        /// What was wrong.
        detail: String,
    },

    // --- Exit code 1: failing conclusion ---
    /// An engine's final partition diverged from the serial baseline.
    VerificationFailed {
        /// The engine that diverged.
        engine: String,
        /// The checker's description of the divergence.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingInput { .. }
            | Self::UnreadableInput { .. }
            | Self::OversizedInput { .. }
            | Self::BinaryInput { .. }
            | Self::WriteFailed { .. }
            | Self::WorkloadParse { .. }
            | Self::BadArguments { .. } => 2,

            Self::VerificationFailed { .. } => 1,
        }
    }

    /// Returns the one-line message printed to stderr before exiting.
    pub fn message(&self) -> String {
        match self {
            Self::MissingInput { path } => {
                format!("error: cannot open {}: no such file", path.display())
            }
            Self::UnreadableInput { source, detail } => {
                format!("error: cannot read {source}: {detail}")
            }
            Self::OversizedInput {
                source,
                cap,
                actual: Some(actual),
            } => {
                format!(
                    "error: {source}: {actual} bytes is over the {cap}-byte input cap \
                     (raise --max-file-size)"
                )
            }
            Self::OversizedInput {
                source,
                cap,
                actual: None,
            } => {
                format!(
                    "error: {source}: input runs past the {cap}-byte cap (raise --max-file-size)"
                )
            }
            Self::BinaryInput { source, offset } => {
                format!("error: {source} is not UTF-8 text (bad byte at offset {offset})")
            }
            Self::WriteFailed { target, detail } => {
                format!("error: cannot write {target}: {detail}")
            }
            Self::WorkloadParse { source, detail } => {
                format!("error: invalid workload in {source}: {detail}")
            }
            Self::BadArguments { detail } => {
                format!("error: {detail}")
            }
            Self::VerificationFailed { engine, detail } => {
                format!("error: {engine} diverged from the serial baseline: {detail}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
