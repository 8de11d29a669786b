/// Output tests: run the `tutor` binary and compare its stdout line by line
/// with the expected demonstration results.
///
/// Each case is an `(args, expected_lines)` pair. Logging is forced off via
/// `RUST_LOG` so stderr noise never depends on the caller's environment.

use std::process::{Command, Output};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `tutor` binary built by this Cargo workspace.
fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_tutor"))
}

fn run_tutor(args: &[&str]) -> Output {
    Command::new(binary())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to spawn tutor binary")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Run with `args`, require success, and compare stdout with `expected`.
fn check(args: &[&str], expected: &[&str]) {
    let out = run_tutor(args);
    assert!(
        out.status.success(),
        "tutor {args:?} exited with {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr)
    );
    let got = stdout_lines(&out);
    assert_eq!(got, expected, "\n--- output mismatch for {args:?} ---\nGot:\n{got:#?}");
}

const DEFAULT_OUTPUT: &[&str] = &[
    "false",
    "true",
    "true",
    "true",
    "0",
    "1",
    "2",
    "3",
    "4",
    "5",
    "6",
    "JavaScript",
    "Python",
    "GoLang",
];

// ── Default run ───────────────────────────────────────────────────────────────

#[test]
fn default_run() {
    check(&[], DEFAULT_OUTPUT);
}

#[test]
fn default_run_is_byte_identical_twice() {
    let first = run_tutor(&[]);
    let second = run_tutor(&[]);
    assert_eq!(first.stdout, second.stdout);
    assert!(
        first.stderr.is_empty(),
        "unexpected stderr: {}",
        String::from_utf8_lossy(&first.stderr)
    );
}

// ── Step selection ────────────────────────────────────────────────────────────

#[test]
fn regex_steps_individually() {
    check(&["find-string"], &["false"]);
    check(&["password"], &["true"]);
    check(&["username-global"], &["true"]);
    check(&["username"], &["true"]);
}

#[test]
fn loop_steps_individually() {
    check(&["count"], &["0", "1", "2", "3", "4", "5", "6"]);
    check(&["languages"], &["JavaScript", "Python", "GoLang"]);
}

#[test]
fn selected_steps_run_in_given_order() {
    check(&["languages", "find-string"], &["JavaScript", "Python", "GoLang", "false"]);
}

#[test]
fn accumulate_only_when_named() {
    check(
        &["accumulate"],
        &[
            "[ 0 ]",
            "[ 0, 1 ]",
            "[ 0, 1, 2 ]",
            "[ 0, 1, 2, 3 ]",
            "[ 0, 1, 2, 3, 4 ]",
            "[ 0, 1, 2, 3, 4, 5 ]",
            "[ 0, 1, 2, 3, 4, 5, 6 ]",
        ],
    );
}

// ── Listing and errors ────────────────────────────────────────────────────────

#[test]
fn list_names_every_step() {
    let out = run_tutor(&["--list"]);
    assert!(out.status.success());
    let names: Vec<String> = stdout_lines(&out)
        .iter()
        .filter_map(|l| l.split_whitespace().next().map(str::to_owned))
        .collect();
    assert_eq!(
        names,
        [
            "find-string",
            "password",
            "username-global",
            "username",
            "count",
            "languages",
            "accumulate"
        ]
    );
}

#[test]
fn help_prints_usage() {
    let out = run_tutor(&["-h"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Usage: tutor"));
}

#[test]
fn unknown_step_fails() {
    let out = run_tutor(&["nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown step: nope"));
}

#[test]
fn unknown_flag_fails() {
    let out = run_tutor(&["-z"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown option: -z"));
}
