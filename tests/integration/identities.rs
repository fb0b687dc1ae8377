//! Integration tests for node identity shortening.

use predicates::prelude::*;
use tempfile::TempDir;

use crate::{PLAIN, interleave, write_log};

const NODE_A: &str = "2024-01-01T00:00:00Z Created new node n[abcdef0123456789]\n\
                      2024-01-01T00:00:02Z sending to 9876543210fedcba\n";
const NODE_B: &str = "2024-01-01T00:00:01Z Created join node n[9876543210fedcba]\n\
                      2024-01-01T00:00:03Z ack from abcdef012345\n";

#[test]
fn identities_untouched_without_flag() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", NODE_A);
    let b = write_log(dir.path(), "b.log", NODE_B);

    interleave()
        .args(PLAIN)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("n[abcdef0123456789]"))
        .stdout(predicate::str::contains("=abcd").not());
}

#[test]
fn identities_shortened_across_streams() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", NODE_A);
    let b = write_log(dir.path(), "b.log", NODE_B);

    interleave()
        .args(PLAIN)
        .arg("--replace-ids")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(
            "0 2024-01-01T00:00:00Z Created new node n[0=abcd]\n\
             1 2024-01-01T00:00:01Z Created join node n[1=9876]\n\
             0 2024-01-01T00:00:02Z sending to 1=9876\n\
             1 2024-01-01T00:00:03Z ack from 0=abcd\n",
        );
}

#[test]
fn logs_without_identity_are_left_alone() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", NODE_A);
    let quiet = write_log(
        dir.path(),
        "quiet.log",
        "2024-01-01T00:00:01Z heard from abcdef0123456789\n",
    );

    interleave()
        .args(PLAIN)
        .arg("--replace-ids")
        .arg(&a)
        .arg(&quiet)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 2024-01-01T00:00:01Z heard from 0=abcd\n"));
}

#[test]
fn colored_short_form_sits_inside_the_background() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", NODE_A);

    let output = interleave()
        .args(PLAIN)
        .args(["--replace-ids", "--color", "--bg-colors", "#204060", "--"])
        .arg(&a)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.lines().next().unwrap();
    assert!(first.starts_with("\x1b[48;2;32;64;96m"));
    // The foreground reset after the short form keeps the background
    assert!(first.contains("0=abcd\x1b[39;48;2;32;64;96m"), "{first:?}");
}

#[test]
fn dropped_lines_stay_dropped_with_ids_and_color() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z keep: Created new node n[abcdef0123456789]\n",
    );
    let b = write_log(
        dir.path(),
        "b.log",
        "2024-01-01T00:00:01Z keep: peer up\n\
         2024-01-01T00:00:02Z noise from abcdef0123456789\n",
    );

    let output = interleave()
        .args(["-r", r"\S+ keep: (?P<content>.*)", "-f", "{index} {content}"])
        .args(["--replace-ids", "--color"])
        .arg(&a)
        .arg(&b)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
    assert!(!stdout.contains("noise"));
    assert!(!stdout.contains("abcdef0123456789"));
    // Only the announcement itself carries the short form
    assert_eq!(stdout.matches("0=abcd").count(), 1, "{stdout:?}");
}
