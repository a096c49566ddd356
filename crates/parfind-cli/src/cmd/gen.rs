//! Implementation of `parfind gen <n> <ops> <out>`.
//!
//! Generates a numeric-format workload file with a configurable operation
//! mix and contention profile. `-` as the output path writes to stdout.

use parfind_bench::{ContentionProfile, WorkloadConfig, generate_workload, write_workload};

use crate::cli::PathOrStdio;
use crate::error::CliError;
use crate::io::write_output;

/// Arguments for the `gen` command, straight from the CLI.
#[derive(Debug, Clone)]
pub struct GenArgs {
    pub n_elements: usize,
    pub n_operations: usize,
    pub union_ratio: f64,
    pub same_set_ratio: f64,
    pub hot_pair: bool,
    pub seed: u64,
}

/// Runs the `gen` command.
///
/// # Errors
///
/// - [`CliError::BadArguments`] when the ratios do not form a probability
///   mix or operations are requested over an empty universe.
/// - [`CliError::WriteFailed`] when the output cannot be written.
pub fn run(args: &GenArgs, out: &PathOrStdio) -> Result<(), CliError> {
    validate(args)?;

    let config = WorkloadConfig {
        seed: args.seed,
        num_elements: args.n_elements,
        num_operations: args.n_operations,
        union_ratio: args.union_ratio,
        same_set_ratio: args.same_set_ratio,
        contention: if args.hot_pair {
            ContentionProfile::HotPair
        } else {
            ContentionProfile::Uniform
        },
    };
    let workload = generate_workload(&config);
    write_output(out, &write_workload(&workload))?;

    eprintln!(
        "gen: wrote {} operations over {} elements to {}",
        workload.ops.len(),
        workload.n,
        out.label()
    );
    Ok(())
}

fn validate(args: &GenArgs) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&args.union_ratio) || !(0.0..=1.0).contains(&args.same_set_ratio) {
        return Err(CliError::BadArguments {
            detail: "ratios must be between 0.0 and 1.0".to_owned(),
        });
    }
    if args.union_ratio + args.same_set_ratio > 1.0 {
        return Err(CliError::BadArguments {
            detail: format!(
                "union and same-set ratios sum to {:.2}, leaving no room for finds",
                args.union_ratio + args.same_set_ratio
            ),
        });
    }
    if args.n_elements == 0 && args.n_operations > 0 {
        return Err(CliError::BadArguments {
            detail: "operations need a non-empty universe".to_owned(),
        });
    }
    Ok(())
}
