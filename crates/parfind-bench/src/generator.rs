//! Deterministic workload generator.
//!
//! Produces [`Workload`] values with a configurable operation mix and
//! contention profile for benchmarking and property-based testing. All
//! randomness is seeded, so a `(config)` pair always yields byte-identical
//! output.

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use parfind_core::{OpKind, Operation, Workload};

/// How operands are drawn from the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentionProfile {
    /// Uniform draws over `[0, n)`.
    Uniform,
    /// Every operand is element 0 or 1 — the hot-pair hammer. The rest of
    /// the universe exists only to size the engine's storage.
    HotPair,
}

/// Configuration for the workload generator.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Universe size.
    pub num_elements: usize,
    /// Number of operations to generate.
    pub num_operations: usize,
    /// Fraction of UNION operations (0.0–1.0).
    pub union_ratio: f64,
    /// Fraction of SAME_SET operations (0.0–1.0); the remainder after
    /// unions and queries is FIND.
    pub same_set_ratio: f64,
    /// Operand distribution.
    pub contention: ContentionProfile,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 1k elements, 10k operations.
    Small,
    /// 10k elements, 100k operations.
    Medium,
    /// 100k elements, 1M operations.
    Large,
    /// 1M elements, 10M operations.
    XLarge,
}

impl SizeTier {
    /// Returns the default `WorkloadConfig` for this size tier: an even
    /// find-leaning mix (50% FIND, 40% UNION, 10% SAME_SET) over a uniform
    /// operand distribution.
    pub fn config(self, seed: u64) -> WorkloadConfig {
        let (num_elements, num_operations) = match self {
            SizeTier::Small => (1_000, 10_000),
            SizeTier::Medium => (10_000, 100_000),
            SizeTier::Large => (100_000, 1_000_000),
            SizeTier::XLarge => (1_000_000, 10_000_000),
        };
        WorkloadConfig {
            seed,
            num_elements,
            num_operations,
            union_ratio: 0.4,
            same_set_ratio: 0.1,
            contention: ContentionProfile::Uniform,
        }
    }
}

/// Generates a workload from the given configuration.
///
/// UNION operands are re-drawn while `a == b` (when the profile offers more
/// than one candidate), so generated workloads do not waste slots on
/// self-unions.
///
/// # Panics
///
/// Panics when `num_elements == 0` with a nonzero operation count, or when
/// the ratios do not describe a probability mix.
pub fn generate_workload(config: &WorkloadConfig) -> Workload {
    assert!(
        config.num_elements > 0 || config.num_operations == 0,
        "operations need a non-empty universe"
    );
    assert!(
        config.union_ratio >= 0.0
            && config.same_set_ratio >= 0.0
            && config.union_ratio + config.same_set_ratio <= 1.0,
        "ratios must form a probability mix"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut ops = Vec::with_capacity(config.num_operations);
    for _ in 0..config.num_operations {
        ops.push(draw_operation(config, &mut rng));
    }
    Workload {
        n: config.num_elements,
        ops,
    }
}

fn draw_operation(config: &WorkloadConfig, rng: &mut StdRng) -> Operation {
    let a = draw_operand(config, rng);
    let roll: f64 = rng.gen();
    if roll < config.union_ratio {
        let mut b = draw_operand(config, rng);
        while b == a && operand_space(config) > 1 {
            b = draw_operand(config, rng);
        }
        Operation::union(a, b)
    } else if roll < config.union_ratio + config.same_set_ratio {
        Operation::same_set(a, draw_operand(config, rng))
    } else {
        Operation::find(a)
    }
}

fn draw_operand(config: &WorkloadConfig, rng: &mut StdRng) -> usize {
    match config.contention {
        ContentionProfile::Uniform => rng.gen_range(0..config.num_elements),
        ContentionProfile::HotPair => rng.gen_range(0..operand_space(config)),
    }
}

fn operand_space(config: &WorkloadConfig) -> usize {
    match config.contention {
        ContentionProfile::Uniform => config.num_elements,
        ContentionProfile::HotPair => config.num_elements.min(2),
    }
}

/// Renders a workload in the numeric stream format.
///
/// Round-trips through [`parfind_core::parse_workload`].
pub fn write_workload(workload: &Workload) -> String {
    let mut out = String::with_capacity(16 + workload.ops.len() * 12);
    out.push_str(&format!("{} {}\n", workload.n, workload.ops.len()));
    for op in &workload.ops {
        let b = match op.kind {
            OpKind::Find => 0,
            _ => op.b,
        };
        out.push_str(&format!("{} {} {}\n", op.kind.code(), op.a, b));
    }
    out
}
