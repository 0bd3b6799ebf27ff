//! Tests for the `brc` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn input(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn prints_sorted_result_line() {
    let file = input("Tokyo;25.4\nTokyo;18.1\nParis;9.0\n");
    Command::cargo_bin("brc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout("{Paris=9.0/9.0/9.0, Tokyo=18.1/21.8/25.4} \n");
}

#[test]
fn every_strategy_prints_the_same() {
    let file = input("b;1.5\na;-2.0\nbad\nb;4.5\na;2.0\n");
    for strategy in ["worker-pool", "spawn-per-chunk", "sequential"] {
        Command::cargo_bin("brc")
            .unwrap()
            .arg(file.path())
            .args(["--strategy", strategy, "--workers", "2", "--chunk-lines", "1"])
            .assert()
            .success()
            .stdout("{a=-2.0/0.0/2.0, b=1.5/3.0/4.5} \n");
    }
}

#[test]
fn mmap_flag_and_env_configuration() {
    let file = input("x;1.0\nx;2.0\n");
    Command::cargo_bin("brc")
        .unwrap()
        .arg(file.path())
        .arg("--mmap")
        .env("BRC_STRATEGY", "spawn-per-chunk")
        .env("BRC_CHUNK_LINES", "1")
        .assert()
        .success()
        .stdout("{x=1.0/1.5/2.0} \n");
}

#[test]
fn empty_file_prints_empty_braces() {
    let file = input("");
    Command::cargo_bin("brc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout("{} \n");
}

#[test]
fn missing_file_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("brc")
        .unwrap()
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to open input"));
}

#[test]
fn zero_workers_is_rejected() {
    let file = input("x;1.0\n");
    Command::cargo_bin("brc")
        .unwrap()
        .arg(file.path())
        .args(["--workers", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be at least 1"));
}

#[test]
fn info_logging_goes_to_stderr() {
    let file = input("x;1.0\n");
    Command::cargo_bin("brc")
        .unwrap()
        .arg(file.path())
        .args(["--log-level", "info"])
        .assert()
        .success()
        .stdout("{x=1.0/1.0/1.0} \n")
        .stderr(predicate::str::contains("aggregation finished"));
}
