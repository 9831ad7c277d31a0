//! Runs the `twin-primes` binary end to end.

use std::process::{Command, Output};

fn twin_primes(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_twin-primes"))
        .args(args)
        .env_remove("TWIN_PRIMES_WORKERS")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run twin-primes")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_five_pairs() {
    let output = twin_primes(&["5"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Found 3 twin prime pairs:\n(3, 5) (5, 7) (11, 13) (17, 19) (29, 31) \n"
    );
}

#[test]
fn test_seeds_only() {
    let output = twin_primes(&["2", "--workers", "9"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Found 0 twin prime pairs:\n(3, 5) (5, 7) \n");
}

#[test]
fn test_canonical_grid() {
    let output = twin_primes(&["5", "--workers", "9"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Found 3 twin prime pairs:\n(3, 5) (5, 7) (179, 181) (269, 271) (809, 811) \n"
    );
}

#[test]
fn test_workers_from_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_twin-primes"))
        .arg("5")
        .env("TWIN_PRIMES_WORKERS", "3")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("(11, 13) (17, 19) (29, 31)"));
}

#[test]
fn test_below_seed_count_fails_without_output() {
    let output = twin_primes(&["1"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_missing_argument_fails_without_output() {
    let output = twin_primes(&[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_malformed_argument_fails() {
    let output = twin_primes(&["twelve"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_stats_go_to_stderr() {
    let output = twin_primes(&["6", "--workers", "2", "--stats"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Found 4 twin prime pairs:"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("\"active_workers_count\": 2"));
}
