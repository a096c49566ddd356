/// File and stdin reading with size enforcement and UTF-8 validation.
///
/// This module is the single entry point for all input I/O in the `parfind`
/// binary. The library crates never touch the filesystem; all reading
/// happens here.
///
/// Key behaviours:
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - UTF-8 validation via `std::str::from_utf8` with byte-offset reporting.
/// - Every failure becomes an exit-2 [`CliError`] naming the input.
use std::io::Read as _;
use std::path::{Path, PathBuf};

use crate::cli::PathOrStdio;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for a missing file, an unreadable
/// input, a size-cap overflow, or bytes that are not UTF-8 text.
pub fn read_input(source: &PathOrStdio, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdio::Path(path) => read_file(path, max_size),
        PathOrStdio::Stdio => read_stdin(max_size),
    }
}

/// Writes `contents` to `target`, `-` meaning stdout.
///
/// # Errors
///
/// Returns [`CliError::WriteFailed`] (exit code 2) when the write fails.
pub fn write_output(target: &PathOrStdio, contents: &str) -> Result<(), CliError> {
    match target {
        PathOrStdio::Path(path) => {
            std::fs::write(path, contents).map_err(|e| CliError::WriteFailed {
                target: path.display().to_string(),
                detail: e.to_string(),
            })
        }
        PathOrStdio::Stdio => {
            use std::io::Write as _;
            std::io::stdout()
                .write_all(contents.as_bytes())
                .map_err(|e| CliError::WriteFailed {
                    target: "-".to_owned(),
                    detail: e.to_string(),
                })
        }
    }
}

// ---------------------------------------------------------------------------
// Disk file reading
// ---------------------------------------------------------------------------

/// Reads a disk file, enforcing the size cap and UTF-8 requirement.
fn read_file(path: &PathBuf, max_size: u64) -> Result<String, CliError> {
    // Size check via metadata so nothing is allocated for oversized input.
    let file_size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => return Err(read_error_to_cli(&e, path)),
    };

    if file_size > max_size {
        return Err(CliError::OversizedInput {
            source: path.display().to_string(),
            cap: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => return Err(read_error_to_cli(&e, path)),
    };

    bytes_to_string(&bytes, &path.display().to_string())
}

/// Maps a `std::io::Error` from a disk read to a [`CliError`]. A missing
/// path gets its own variant; everything else is an unreadable input.
fn read_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => CliError::UnreadableInput {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Stdin reading
// ---------------------------------------------------------------------------

/// Reads the entire stdin stream, capped at `max_size` bytes.
///
/// Uses `Read::take` so the buffer allocation is bounded. If the stream
/// produces exactly `max_size` bytes one final probe read distinguishes
/// "exactly at the cap" from "over the cap".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let handle = stdin.lock();

    let mut limited = handle.take(max_size);
    let mut buf: Vec<u8> = Vec::new();
    limited
        .read_to_end(&mut buf)
        .map_err(|e| CliError::UnreadableInput {
            source: "-".to_owned(),
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let stdin2 = std::io::stdin();
        let mut handle2 = stdin2.lock();
        let mut probe = [0u8; 1];
        let extra = handle2
            .read(&mut probe)
            .map_err(|e| CliError::UnreadableInput {
                source: "-".to_owned(),
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::OversizedInput {
                source: "-".to_owned(),
                cap: max_size,
                actual: None,
            });
        }
    }

    bytes_to_string(&buf, "-")
}

// ---------------------------------------------------------------------------
// UTF-8 conversion
// ---------------------------------------------------------------------------

/// Converts a byte buffer to a `String`, reporting the byte offset of the
/// first invalid sequence on failure.
fn bytes_to_string(bytes: &[u8], source_label: &str) -> Result<String, CliError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(CliError::BinaryInput {
            source: source_label.to_owned(),
            offset: e.valid_up_to(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
