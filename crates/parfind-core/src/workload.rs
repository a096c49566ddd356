//! Workload file formats.
//!
//! Two text formats share identical semantic content:
//!
//! **Numeric stream** — the benchmark format. A header line
//! `<n_elements> <n_operations>` followed by one `<type> <a> <b>` line per
//! operation, where type 0 = UNION, 1 = FIND, 2 = SAME_SET. `b` is present
//! for every line and ignored for FIND.
//!
//! **Markup fixture** — the correctness format. `#` comments and blank
//! lines are skipped; the first meaningful line is `<n>` (a trailing pair
//! of section counts from older fixture files is tolerated and ignored);
//! each following line is one of
//!
//! ```text
//! U <a> <b>
//! F <a> <expected-root>
//! Q <a> <b> <expected 1|0>
//! ```
//!
//! Parsing never touches an engine: malformed input is reported to the
//! caller with a 1-based line number and nothing else happens.

use std::fmt;

use crate::ops::{OpKind, Operation};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A malformed workload or fixture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    /// The input had no header line.
    MissingHeader,
    /// The header line did not parse.
    InvalidHeader {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        detail: String,
    },
    /// An operation line did not parse.
    InvalidOperation {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        detail: String,
    },
    /// An operand was outside `[0, n)`.
    IndexOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending operand.
        index: usize,
        /// The declared universe size.
        n: usize,
    },
    /// The file declared more operations than it contained.
    TruncatedOperations {
        /// The count from the header.
        declared: usize,
        /// How many operation lines were present.
        found: usize,
    },
    /// Data followed the declared operation count.
    TrailingData {
        /// 1-based line number of the first surplus line.
        line: usize,
    },
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing header line"),
            Self::InvalidHeader { line, detail } => {
                write!(f, "line {line}: invalid header: {detail}")
            }
            Self::InvalidOperation { line, detail } => {
                write!(f, "line {line}: invalid operation: {detail}")
            }
            Self::IndexOutOfRange { line, index, n } => {
                write!(f, "line {line}: element {index} out of range for universe of {n}")
            }
            Self::TruncatedOperations { declared, found } => {
                write!(f, "header declared {declared} operations but only {found} were present")
            }
            Self::TrailingData { line } => {
                write!(f, "line {line}: data after the declared operation count")
            }
        }
    }
}

impl std::error::Error for WorkloadError {}

// ---------------------------------------------------------------------------
// Numeric stream format
// ---------------------------------------------------------------------------

/// A parsed numeric-format workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    /// Universe size.
    pub n: usize,
    /// The operations, in file order.
    pub ops: Vec<Operation>,
}

/// Parses the numeric stream format.
///
/// # Errors
///
/// [`WorkloadError`] describing the first problem found; the numeric format
/// has no comments, so every non-blank line must parse.
pub fn parse_workload(text: &str) -> Result<Workload, WorkloadError> {
    let mut lines = numbered_nonblank_lines(text);

    let (header_line, header) = lines.next().ok_or(WorkloadError::MissingHeader)?;
    let (n, declared) = parse_header(header_line, header)?;

    let mut ops = Vec::with_capacity(declared);
    for (line, raw) in lines {
        if ops.len() == declared {
            return Err(WorkloadError::TrailingData { line });
        }
        ops.push(parse_numeric_op(line, raw, n)?);
    }

    if ops.len() < declared {
        return Err(WorkloadError::TruncatedOperations {
            declared,
            found: ops.len(),
        });
    }

    Ok(Workload { n, ops })
}

fn parse_header(line: usize, raw: &str) -> Result<(usize, usize), WorkloadError> {
    let mut fields = raw.split_whitespace();
    let n = parse_field(fields.next(), line, "element count")?;
    let declared = parse_field(fields.next(), line, "operation count")?;
    if fields.next().is_some() {
        return Err(WorkloadError::InvalidHeader {
            line,
            detail: format!("expected '<n_elements> <n_operations>', got '{raw}'"),
        });
    }
    Ok((n, declared))
}

fn parse_numeric_op(line: usize, raw: &str, n: usize) -> Result<Operation, WorkloadError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    let [type_field, a_field, b_field] = fields.as_slice() else {
        return Err(WorkloadError::InvalidOperation {
            line,
            detail: format!("expected '<type> <a> <b>', got '{raw}'"),
        });
    };

    let code: u8 = type_field
        .parse()
        .map_err(|_| WorkloadError::InvalidOperation {
            line,
            detail: format!("'{type_field}' is not an operation type"),
        })?;
    let kind = OpKind::from_code(code).ok_or_else(|| WorkloadError::InvalidOperation {
        line,
        detail: format!("operation type {code} is not one of 0, 1, 2"),
    })?;

    let a = parse_index(a_field, line)?;
    let b = parse_index(b_field, line)?;
    check_operand(a, n, line)?;
    // FIND carries b on the wire but never dereferences it.
    if kind != OpKind::Find {
        check_operand(b, n, line)?;
    }

    Ok(Operation { kind, a, b })
}

// ---------------------------------------------------------------------------
// Markup fixture format
// ---------------------------------------------------------------------------

/// One step of a markup fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureStep {
    /// Merge `a` and `b`.
    Union {
        /// First operand.
        a: usize,
        /// Second operand.
        b: usize,
    },
    /// Resolve `a` and compare against an expected root.
    Find {
        /// The element to resolve.
        a: usize,
        /// The root the serial semantics produce at this point.
        expected: usize,
    },
    /// Ask whether `a` and `b` are connected, with the expected answer.
    Query {
        /// First operand.
        a: usize,
        /// Second operand.
        b: usize,
        /// Whether they should be connected.
        expected: bool,
    },
}

impl FixtureStep {
    /// The engine operation this step performs (expectations dropped).
    pub fn operation(self) -> Operation {
        match self {
            FixtureStep::Union { a, b } => Operation::union(a, b),
            FixtureStep::Find { a, .. } => Operation::find(a),
            FixtureStep::Query { a, b, .. } => Operation::same_set(a, b),
        }
    }
}

/// A parsed markup fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Universe size.
    pub n: usize,
    /// The steps, in file order.
    pub steps: Vec<FixtureStep>,
}

/// Parses the markup fixture format.
///
/// # Errors
///
/// [`WorkloadError`] describing the first problem found.
pub fn parse_fixture(text: &str) -> Result<Fixture, WorkloadError> {
    let mut lines = numbered_nonblank_lines(text).filter(|(_, l)| !l.starts_with('#'));

    let (header_line, header) = lines.next().ok_or(WorkloadError::MissingHeader)?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let n = match fields.as_slice() {
        // Older fixtures carry `<n> <unions> <queries>`; the counts are
        // redundant in a line-tagged format and ignored.
        [n_field] | [n_field, _, _] => parse_field(Some(*n_field), header_line, "element count")?,
        _ => {
            return Err(WorkloadError::InvalidHeader {
                line: header_line,
                detail: format!("expected '<n>' or '<n> <unions> <queries>', got '{header}'"),
            });
        }
    };

    let mut steps = Vec::new();
    for (line, raw) in lines {
        steps.push(parse_fixture_step(line, raw, n)?);
    }

    Ok(Fixture { n, steps })
}

fn parse_fixture_step(line: usize, raw: &str, n: usize) -> Result<FixtureStep, WorkloadError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    match fields.as_slice() {
        ["U", a, b] => {
            let a = parse_index(a, line)?;
            let b = parse_index(b, line)?;
            check_operand(a, n, line)?;
            check_operand(b, n, line)?;
            Ok(FixtureStep::Union { a, b })
        }
        ["F", a, expected] => {
            let a = parse_index(a, line)?;
            let expected = parse_index(expected, line)?;
            check_operand(a, n, line)?;
            check_operand(expected, n, line)?;
            Ok(FixtureStep::Find { a, expected })
        }
        ["Q", a, b, expected] => {
            let a = parse_index(a, line)?;
            let b = parse_index(b, line)?;
            check_operand(a, n, line)?;
            check_operand(b, n, line)?;
            let expected = match *expected {
                "1" => true,
                "0" => false,
                other => {
                    return Err(WorkloadError::InvalidOperation {
                        line,
                        detail: format!("expected 1 or 0 for a query result, got '{other}'"),
                    });
                }
            };
            Ok(FixtureStep::Query { a, b, expected })
        }
        _ => Err(WorkloadError::InvalidOperation {
            line,
            detail: format!("expected 'U a b', 'F a expected' or 'Q a b expected', got '{raw}'"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn numbered_nonblank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn parse_field(field: Option<&str>, line: usize, what: &str) -> Result<usize, WorkloadError> {
    let raw = field.ok_or_else(|| WorkloadError::InvalidHeader {
        line,
        detail: format!("missing {what}"),
    })?;
    raw.parse().map_err(|_| WorkloadError::InvalidHeader {
        line,
        detail: format!("'{raw}' is not a valid {what}"),
    })
}

fn parse_index(raw: &str, line: usize) -> Result<usize, WorkloadError> {
    raw.parse().map_err(|_| WorkloadError::InvalidOperation {
        line,
        detail: format!("'{raw}' is not a valid element index"),
    })
}

fn check_operand(index: usize, n: usize, line: usize) -> Result<(), WorkloadError> {
    if index < n {
        Ok(())
    } else {
        Err(WorkloadError::IndexOutOfRange { line, index, n })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
