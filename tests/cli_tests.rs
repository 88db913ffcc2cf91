//! Integration tests for the CLI interface
//!
//! The URL-printing mode needs no network, so it is exercised end to end;
//! server startup is covered by unit tests against the router.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_all_flags() {
    let mut cmd = Command::cargo_bin("chspeedscope").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--ch-host"))
        .stdout(predicate::str::contains("--ch-port"))
        .stdout(predicate::str::contains("--proxy-host"))
        .stdout(predicate::str::contains("--proxy-port"))
        .stdout(predicate::str::contains("--query-id"));
}

#[test]
fn query_id_mode_prints_speedscope_url_and_exits() {
    let mut cmd = Command::cargo_bin("chspeedscope").unwrap();
    cmd.args([
        "--query-id",
        "abc",
        "--proxy-host",
        "prof.internal",
        "--proxy-port",
        "9090",
    ])
    .assert()
    .success()
    .stdout(predicate::str::starts_with(
        "https://www.speedscope.app/#profileURL=",
    ))
    .stdout(predicate::str::contains(
        "http%3A%2F%2Fprof.internal%3A9090%2Fquery%3Fquery_id%3Dabc",
    ));
}

#[test]
fn query_id_mode_url_encodes_the_id() {
    let mut cmd = Command::cargo_bin("chspeedscope").unwrap();
    cmd.args(["--query-id", "a b/c"])
        .assert()
        .success()
        // `a b/c` form-encodes to `a+b%2Fc`, then the `%` signs encode again
        // inside the profileURL value.
        .stdout(predicate::str::contains("query_id%3Da%2Bb%252Fc"));
}

#[test]
fn rejects_a_non_numeric_port() {
    let mut cmd = Command::cargo_bin("chspeedscope").unwrap();
    cmd.args(["--proxy-port", "not-a-port", "--query-id", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn rejects_unknown_flags() {
    let mut cmd = Command::cargo_bin("chspeedscope").unwrap();
    cmd.arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
