//! The `parfind` binary: benchmark, verify, and generate workloads for the
//! parfind union-find engines.

mod cli;
mod cmd;
mod error;
mod format;
mod io;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", err.message());
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let max_file_size = cli.max_file_size;
    match cli.command {
        Command::Bench {
            engine,
            ops_file,
            num_runs,
            num_threads,
            format,
        } => cmd::bench::run(
            engine.kind(),
            &ops_file,
            num_runs,
            num_threads,
            format,
            max_file_size,
        ),
        Command::Verify {
            engine,
            ops_file,
            num_threads,
        } => cmd::verify::run(engine.kind(), &ops_file, num_threads, max_file_size),
        Command::Gen {
            n_elements,
            n_operations,
            out,
            union_ratio,
            same_set_ratio,
            hot_pair,
            seed,
        } => cmd::gen::run(
            &cmd::gen::GenArgs {
                n_elements,
                n_operations,
                union_ratio,
                same_set_ratio,
                hot_pair,
                seed,
            },
            &out,
        ),
    }
}
