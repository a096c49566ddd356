#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use clap::CommandFactory;
use clap::Parser;
use parfind_core::EngineKind;

use super::*;

/// The root help output must contain all top-level subcommand names.
#[test]
fn root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());
    for name in ["bench", "verify", "gen"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

#[test]
fn root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());
    for flag in ["--max-file-size", "--help", "--version"] {
        assert!(help.contains(flag), "root help should mention flag '{flag}'");
    }
}

#[test]
fn bench_help_mentions_positional_surface() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("bench")
        .expect("bench subcommand should exist");
    let help = format!("{}", sub.render_help());
    for name in ["IMPL", "OPS_FILE", "NUM_RUNS", "NUM_THREADS", "--format"] {
        assert!(help.contains(name), "bench help should mention '{name}'");
    }
}

#[test]
fn gen_help_mentions_ratio_flags() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("gen")
        .expect("gen subcommand should exist");
    let help = format!("{}", sub.render_help());
    for flag in ["--union-ratio", "--same-set-ratio", "--hot-pair", "--seed"] {
        assert!(help.contains(flag), "gen help should mention '{flag}'");
    }
}

#[test]
fn version_flag_reports_the_engine_library_version() {
    let cmd = Cli::command();
    let rendered = cmd.render_version();
    assert!(
        rendered.contains(parfind_core::version()),
        "version output should carry the core version: {rendered}"
    );
}

#[test]
fn every_engine_name_parses() {
    for kind in EngineKind::ALL {
        let cli = Cli::try_parse_from(["parfind", "bench", kind.name(), "ops.txt", "3"])
            .unwrap_or_else(|e| panic!("engine name '{}' should parse: {e}", kind.name()));
        let Command::Bench { engine, .. } = cli.command else {
            panic!("expected a bench command");
        };
        assert_eq!(engine.kind(), kind);
    }
}

#[test]
fn unknown_engine_name_is_rejected() {
    let err = Cli::try_parse_from(["parfind", "bench", "lockful", "ops.txt", "3"])
        .expect_err("unknown engine should be rejected");
    let msg = err.to_string();
    assert!(msg.contains("lockful"), "message: {msg}");
}

#[test]
fn zero_runs_is_rejected() {
    assert!(Cli::try_parse_from(["parfind", "bench", "serial", "ops.txt", "0"]).is_err());
}

#[test]
fn stdin_sentinel_parses_as_stdio() {
    let cli = Cli::try_parse_from(["parfind", "verify", "fine", "-"]).expect("should parse");
    let Command::Verify { ops_file, .. } = cli.command else {
        panic!("expected a verify command");
    };
    assert!(matches!(ops_file, PathOrStdio::Stdio));
    assert_eq!(ops_file.label(), "-");
}

#[test]
fn bench_threads_are_optional() {
    let cli =
        Cli::try_parse_from(["parfind", "bench", "lockfree", "ops.txt", "5"]).expect("parses");
    let Command::Bench {
        num_runs,
        num_threads,
        format,
        ..
    } = cli.command
    else {
        panic!("expected a bench command");
    };
    assert_eq!(num_runs.get(), 5);
    assert!(num_threads.is_none());
    assert_eq!(format, OutputFormat::Human);
}

#[test]
fn bench_accepts_json_format() {
    let cli = Cli::try_parse_from([
        "parfind", "bench", "coarse", "ops.txt", "2", "4", "--format", "json",
    ])
    .expect("parses");
    let Command::Bench {
        num_threads,
        format,
        ..
    } = cli.command
    else {
        panic!("expected a bench command");
    };
    assert_eq!(num_threads.map(NonZeroUsize::get), Some(4));
    assert_eq!(format, OutputFormat::Json);
}

#[test]
fn gen_defaults_match_the_documented_mix() {
    let cli = Cli::try_parse_from(["parfind", "gen", "100", "1000", "out.txt"]).expect("parses");
    let Command::Gen {
        union_ratio,
        same_set_ratio,
        hot_pair,
        seed,
        ..
    } = cli.command
    else {
        panic!("expected a gen command");
    };
    assert!((union_ratio - 0.4).abs() < f64::EPSILON);
    assert!((same_set_ratio - 0.1).abs() < f64::EPSILON);
    assert!(!hot_pair);
    assert_eq!(seed, 42);
}
