//! Integration tests for merging plain logs in timestamp order.

use predicates::prelude::*;
use tempfile::TempDir;

use crate::{PLAIN, interleave, write_log};

#[test]
fn interleaves_two_files_by_timestamp() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z start\n2024-01-01T00:00:02Z end\n",
    );
    let b = write_log(dir.path(), "b.log", "2024-01-01T00:00:01Z middle\n");

    interleave()
        .args(PLAIN)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(
            "0 2024-01-01T00:00:00Z start\n\
             1 2024-01-01T00:00:01Z middle\n\
             0 2024-01-01T00:00:02Z end\n",
        );
}

#[test]
fn continuation_lines_travel_with_their_block() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z panic\n  frame 1\n  frame 2\n2024-01-01T00:00:05Z after\n",
    );
    let b = write_log(dir.path(), "b.log", "2024-01-01T00:00:03Z other\n");

    interleave()
        .args(PLAIN)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(
            "0 2024-01-01T00:00:00Z panic\n\
             0   frame 1\n\
             0   frame 2\n\
             1 2024-01-01T00:00:03Z other\n\
             0 2024-01-01T00:00:05Z after\n",
        );
}

#[test]
fn equal_timestamps_keep_argument_order() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z from a\n");
    let b = write_log(dir.path(), "b.log", "2024-01-01T00:00:00Z from b\n");

    interleave()
        .args(PLAIN)
        .arg(&b)
        .arg(&a)
        .assert()
        .success()
        .stdout("0 2024-01-01T00:00:00Z from b\n1 2024-01-01T00:00:00Z from a\n");
}

#[test]
fn offsets_are_compared_as_instants() {
    let dir = TempDir::new().unwrap();
    // 10:00+02:00 is 08:00Z, earlier than 09:00Z
    let a = write_log(dir.path(), "a.log", "2024-01-01T09:00:00Z utc\n");
    let b = write_log(dir.path(), "b.log", "2024-01-01T10:00:00+02:00 offset\n");

    interleave()
        .args(PLAIN)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout("1 2024-01-01T10:00:00+02:00 offset\n0 2024-01-01T09:00:00Z utc\n");
}

#[test]
fn empty_file_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    let empty = write_log(dir.path(), "empty.log", "");
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z only\n");

    interleave()
        .args(PLAIN)
        .arg(&empty)
        .arg(&a)
        .assert()
        .success()
        .stdout("1 2024-01-01T00:00:00Z only\n");
}

#[test]
fn all_empty_inputs_produce_no_output() {
    let dir = TempDir::new().unwrap();
    let empty = write_log(dir.path(), "empty.log", "");

    interleave().arg(&empty).assert().success().stdout("");
}

#[test]
fn non_matching_lines_are_dropped() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z INFO: kept\nnoise\n2024-01-01T00:00:01Z DEBUG: also kept\n",
    );

    interleave()
        .args(["-r", r"\S+ (?P<level>[A-Z]+): (?P<content>.*)", "-f", "{level} {content}"])
        .arg(&a)
        .assert()
        .success()
        .stdout("INFO kept\nDEBUG also kept\n")
        .stdout(predicate::str::contains("noise").not());
}

#[test]
fn default_format_renders_ccf_lines() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "node0.log",
        "2024-03-01T12:34:56.789012Z        100 [info ] ../src/node/node_state.h:1234 | Node started\n",
    );
    let b = write_log(
        dir.path(),
        "node1.log",
        "2024-03-01T12:34:57.000001Z        100 [fail ] ../src/host/main.cpp:88 | Exiting\n    at frame #3\n",
    );

    interleave()
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "34:56.789 |00| Node started (node_state.h:1234)\n\
             34:57.000 |01|   Exiting (main.cpp:88)\n",
        ))
        .stdout(predicate::str::contains("at frame #3"));
}

#[test]
fn long_log_is_written_in_full() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..2000)
        .map(|i| format!("2024-01-01T00:{:02}:{:02}Z line {i}\n", i / 60 % 60, i % 60))
        .collect();
    let a = write_log(dir.path(), "a.log", &content);

    let output = interleave().args(PLAIN).arg(&a).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2000);
    assert!(stdout.ends_with("line 1999\n"));
}
