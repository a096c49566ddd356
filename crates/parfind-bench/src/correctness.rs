//! Post-run invariant checkers for correctness validation.
//!
//! Engines may pick different representatives for the same component, so
//! partitions are compared structurally: two root vectors match when the
//! mapping between their labels is a bijection.

use rustc_hash::FxHashMap;

use parfind_core::{
    EngineKind, Fixture, FixtureStep, OpKind, Operation, Workload, run_workload,
};

/// Relabels a root vector so each component is named by its smallest member.
///
/// Two runs induce the same partition iff their canonical labels are equal.
pub fn canonical_labels(roots: &[usize]) -> Vec<usize> {
    let mut first_seen = vec![usize::MAX; roots.len()];
    let mut labels = Vec::with_capacity(roots.len());
    for (i, &root) in roots.iter().enumerate() {
        if first_seen[root] == usize::MAX {
            first_seen[root] = i;
        }
        labels.push(first_seen[root]);
    }
    labels
}

/// Verifies that two root vectors induce the same partition.
pub fn check_partitions_match(baseline: &[usize], candidate: &[usize]) -> Result<(), String> {
    if baseline.len() != candidate.len() {
        return Err(format!(
            "universe size mismatch: baseline={}, candidate={}",
            baseline.len(),
            candidate.len()
        ));
    }

    let mut forward: FxHashMap<usize, usize> = FxHashMap::default();
    let mut backward: FxHashMap<usize, usize> = FxHashMap::default();
    for (i, (&b, &c)) in baseline.iter().zip(candidate.iter()).enumerate() {
        match forward.insert(b, c) {
            Some(prev) if prev != c => {
                return Err(format!(
                    "element {i}: baseline component {b} split across candidate roots {prev} and {c}"
                ));
            }
            _ => {}
        }
        match backward.insert(c, b) {
            Some(prev) if prev != b => {
                return Err(format!(
                    "element {i}: candidate component {c} merges baseline roots {prev} and {b}"
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Verifies that a result buffer obeys the executor conventions for a
/// workload whose operations were all in range.
pub fn check_result_conventions(workload: &Workload, results: &[i64]) -> Result<(), String> {
    if results.len() != workload.ops.len() {
        return Err(format!(
            "result count mismatch: ops={}, results={}",
            workload.ops.len(),
            results.len()
        ));
    }
    for (i, (op, &result)) in workload.ops.iter().zip(results.iter()).enumerate() {
        match op.kind {
            OpKind::Find => {
                if result < 0 || result as usize >= workload.n {
                    return Err(format!(
                        "op {i}: find result {result} outside [0, {})",
                        workload.n
                    ));
                }
            }
            OpKind::Union | OpKind::SameSet => {
                if result != 0 && result != 1 {
                    return Err(format!("op {i}: boolean result slot holds {result}"));
                }
            }
        }
    }
    Ok(())
}

/// Replays a markup fixture on one engine and checks every expectation.
///
/// The fixture's unions run concurrently with `num_threads` workers;
/// expectations are then evaluated against the quiesced structure, so
/// fixtures consumed here must state final-state expectations (queries
/// after unions). Interleaved sequential fixtures should be replayed with
/// one thread instead.
pub fn check_fixture(kind: EngineKind, fixture: &Fixture, num_threads: usize) -> Result<(), String> {
    let unions: Vec<Operation> = fixture
        .steps
        .iter()
        .filter(|s| matches!(s, FixtureStep::Union { .. }))
        .map(|s| s.operation())
        .collect();

    let outcome = run_workload(kind, fixture.n, &unions, num_threads);
    let roots = &outcome.roots;

    for (i, step) in fixture.steps.iter().enumerate() {
        match *step {
            FixtureStep::Union { .. } => {}
            FixtureStep::Find { a, expected } => {
                if roots[a] != roots[expected] {
                    return Err(format!(
                        "{kind}: step {i}: find({a}) should resolve inside {expected}'s component"
                    ));
                }
            }
            FixtureStep::Query { a, b, expected } => {
                let connected = roots[a] == roots[b];
                if connected != expected {
                    return Err(format!(
                        "{kind}: step {i}: query ({a}, {b}) observed {connected}, expected {expected}"
                    ));
                }
            }
        }
    }
    Ok(())
}
