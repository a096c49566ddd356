//! Integration tests for `parfind bench`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::Command;

/// Path to the compiled `parfind` binary.
fn parfind_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    // current_exe is something like …/deps/cmd_bench-<hash>; the binary
    // lives in the parent directory.
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("parfind");
    path
}

/// Path to a shared fixture file at the workspace root.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

fn fixture_arg(name: &str) -> String {
    fixture(name).to_str().expect("fixture path").to_owned()
}

// ---------------------------------------------------------------------------
// bench: happy path
// ---------------------------------------------------------------------------

#[test]
fn bench_serial_chain_exits_0() {
    let out = Command::new(parfind_bin())
        .args(["bench", "serial", &fixture_arg("chain.ops"), "2"])
        .output()
        .expect("run parfind bench");
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn bench_human_report_lands_on_stdout() {
    let out = Command::new(parfind_bin())
        .args(["bench", "lockfree", &fixture_arg("mixed.ops"), "3", "2"])
        .output()
        .expect("run parfind bench");
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("engine:      lockfree"), "stdout: {stdout}");
    assert!(stdout.contains("10 operations"), "stdout: {stdout}");
    assert!(stdout.contains("throughput:"), "stdout: {stdout}");
}

#[test]
fn bench_every_engine_runs_the_mixed_fixture() {
    for engine in [
        "serial",
        "coarse",
        "fine",
        "lockfree",
        "lockfree_plain",
        "lockfree_ipc",
    ] {
        let out = Command::new(parfind_bin())
            .args(["bench", engine, &fixture_arg("mixed.ops"), "1", "2"])
            .output()
            .expect("run parfind bench");
        assert_eq!(
            out.status.code(),
            Some(0),
            "{engine}: stderr: {}",
            String::from_utf8_lossy(&out.stderr)
        );
    }
}

#[test]
fn bench_json_report_is_parseable() {
    let out = Command::new(parfind_bin())
        .args([
            "bench",
            "fine",
            &fixture_arg("chain.ops"),
            "2",
            "2",
            "--format",
            "json",
        ])
        .output()
        .expect("run parfind bench");
    assert_eq!(out.status.code(), Some(0));
    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be one JSON object");
    assert_eq!(value["engine"], "fine");
    assert_eq!(value["n_elements"], 5);
    assert_eq!(value["n_operations"], 5);
    assert_eq!(value["num_runs"], 2);
    assert_eq!(value["num_threads"], 2);
}

#[test]
fn bench_reads_the_workload_from_stdin() {
    use std::io::Write as _;
    use std::process::Stdio;

    let mut child = Command::new(parfind_bin())
        .args(["bench", "coarse", "-", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn parfind bench");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(b"3 2\n0 0 1\n2 0 2\n")
        .expect("write workload");
    let out = child.wait_with_output().expect("wait for parfind");
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("workload:    -"), "stdout: {stdout}");
}

// ---------------------------------------------------------------------------
// bench: failures
// ---------------------------------------------------------------------------

#[test]
fn bench_missing_file_exits_2() {
    let out = Command::new(parfind_bin())
        .args(["bench", "serial", "/no/such/file.ops", "1"])
        .output()
        .expect("run parfind bench");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no such file"), "stderr: {stderr}");
}

#[test]
fn bench_malformed_workload_exits_2_with_line_number() {
    let out = Command::new(parfind_bin())
        .args(["bench", "serial", &fixture_arg("malformed.ops"), "1"])
        .output()
        .expect("run parfind bench");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 3"), "stderr: {stderr}");
}

#[test]
fn bench_unknown_engine_is_a_usage_error() {
    let out = Command::new(parfind_bin())
        .args(["bench", "lockful", &fixture_arg("chain.ops"), "1"])
        .output()
        .expect("run parfind bench");
    assert_ne!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("lockful"), "stderr: {stderr}");
}

#[test]
fn bench_zero_runs_is_a_usage_error() {
    let out = Command::new(parfind_bin())
        .args(["bench", "serial", &fixture_arg("chain.ops"), "0"])
        .output()
        .expect("run parfind bench");
    assert_ne!(out.status.code(), Some(0));
}
