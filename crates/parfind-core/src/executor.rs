//! Batch executor: applies an operation list across worker threads.
//!
//! The index space `[0, ops.len())` is statically partitioned into one
//! contiguous chunk per worker; each worker writes its chunk of the result
//! buffer and never observes the others. No ordering is imposed between
//! operations on different workers — the final partition is defined only by
//! the cumulative effect once every worker has quiesced.
//!
//! Result conventions, shared with [`SerialSet::process_operations`]:
//!
//! | Operation | Result slot |
//! |---|---|
//! | FIND | the root index |
//! | UNION | 1 if this call linked two sets, else 0 |
//! | SAME_SET | 1 if observed in the same set, else 0 |
//! | out-of-range operand | [`OUT_OF_RANGE_SENTINEL`] |
//! | worker panic | [`INTERNAL_ERROR_SENTINEL`] |
//!
//! A failing operation poisons only its own slot: the diagnostic goes to
//! stderr and the worker carries on with the rest of its chunk.
//!
//! [`SerialSet::process_operations`]: crate::serial::SerialSet::process_operations

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::engine::DisjointSet;
use crate::error::SetError;
use crate::ops::{OpKind, Operation};
use crate::serial::SerialSet;

/// Result slot value for an out-of-range operand.
pub const OUT_OF_RANGE_SENTINEL: i64 = -1;

/// Result slot value for an unexpected internal failure inside a worker.
pub const INTERNAL_ERROR_SENTINEL: i64 = -2;

/// Applies `ops` to `engine` with `num_threads` workers, filling `results`.
///
/// `results` is resized to `ops.len()`. A `num_threads` of 0 is treated as
/// 1. Workers receive contiguous chunks (static scheduling); when there are
/// fewer operations than workers the surplus workers are simply not
/// spawned.
pub fn process_batch<E: DisjointSet + ?Sized>(
    engine: &E,
    ops: &[Operation],
    num_threads: usize,
    results: &mut Vec<i64>,
) {
    results.clear();
    results.resize(ops.len(), 0);
    if ops.is_empty() {
        return;
    }

    let workers = num_threads.max(1);
    let chunk_len = ops.len().div_ceil(workers);

    std::thread::scope(|scope| {
        let mut remaining = results.as_mut_slice();
        for (chunk_idx, op_chunk) in ops.chunks(chunk_len).enumerate() {
            let (res_chunk, rest) = remaining.split_at_mut(op_chunk.len());
            remaining = rest;
            let base = chunk_idx * chunk_len;
            scope.spawn(move || run_chunk(engine, op_chunk, res_chunk, base));
        }
    });
}

/// Executes one worker's chunk.
fn run_chunk<E: DisjointSet + ?Sized>(
    engine: &E,
    ops: &[Operation],
    results: &mut [i64],
    base: usize,
) {
    for (i, (op, slot)) in ops.iter().zip(results.iter_mut()).enumerate() {
        *slot = guarded_result_slot(engine, op, base + i);
    }
}

/// Evaluates one operation, absorbing precondition errors and panics into
/// sentinel values so sibling operations keep running.
fn guarded_result_slot<E: DisjointSet + ?Sized>(engine: &E, op: &Operation, index: usize) -> i64 {
    match catch_unwind(AssertUnwindSafe(|| apply(engine, op))) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            report_worker_error(index, &err.to_string());
            OUT_OF_RANGE_SENTINEL
        }
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            report_worker_error(index, &detail);
            INTERNAL_ERROR_SENTINEL
        }
    }
}

/// Evaluates one operation against a shared engine.
fn apply<E: DisjointSet + ?Sized>(engine: &E, op: &Operation) -> Result<i64, SetError> {
    match op.kind {
        OpKind::Find => Ok(engine.find(op.a)? as i64),
        OpKind::Union => Ok(i64::from(engine.union(op.a, op.b)?)),
        OpKind::SameSet => Ok(i64::from(engine.same_set(op.a, op.b)?)),
    }
}

/// Evaluates one operation against the serial engine, mapping precondition
/// errors to the out-of-range sentinel.
pub(crate) fn result_slot_sequential(uf: &mut SerialSet, op: &Operation) -> i64 {
    let outcome = match op.kind {
        OpKind::Find => uf.find(op.a).map(|root| root as i64),
        OpKind::Union => uf.union(op.a, op.b).map(i64::from),
        OpKind::SameSet => uf.same_set(op.a, op.b).map(i64::from),
    };
    outcome.unwrap_or(OUT_OF_RANGE_SENTINEL)
}

/// Worker diagnostics go to stderr; the engine library is otherwise silent.
#[allow(clippy::print_stderr)]
fn report_worker_error(index: usize, detail: &str) {
    eprintln!("parfind: operation {index} failed: {detail}");
}
