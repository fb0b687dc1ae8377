//! Integration tests for per-stream background coloring.

use predicates::prelude::*;
use tempfile::TempDir;

use crate::{PLAIN, interleave, write_log};

#[test]
fn no_escapes_without_color_flag() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z plain\n");

    interleave()
        .args(PLAIN)
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn explicit_colors_assigned_in_order() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z first\n");
    let b = write_log(dir.path(), "b.log", "2024-01-01T00:00:01Z second\n");

    interleave()
        .args(PLAIN)
        .args(["--color", "--bg-colors", "#102030", "#405060", "--"])
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(
            "\x1b[48;2;16;32;48m0 2024-01-01T00:00:00Z first\x1b[K\x1b[0m\n\
             \x1b[48;2;64;80;96m1 2024-01-01T00:00:01Z second\x1b[K\x1b[0m\n",
        );
}

#[test]
fn colors_cycle_when_there_are_more_streams() {
    let dir = TempDir::new().unwrap();
    let logs: Vec<_> = (0..3)
        .map(|i| {
            write_log(
                dir.path(),
                &format!("{i}.log"),
                &format!("2024-01-01T00:00:0{i}Z line\n"),
            )
        })
        .collect();

    let output = interleave()
        .args(PLAIN)
        .args(["--colour", "--bg-colours", "red", "blue", "--"])
        .args(&logs)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\x1b[48;2;255;0;0m0 "));
    assert!(lines[1].starts_with("\x1b[48;2;0;0;255m1 "));
    assert!(lines[2].starts_with("\x1b[48;2;255;0;0m2 "));
}

#[test]
fn default_palette_paints_every_line() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z first\n  continued\n",
    );

    let output = interleave()
        .args(PLAIN)
        .arg("-c")
        .arg(&a)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        assert!(line.starts_with("\x1b[48;2;"), "unpainted line: {line:?}");
        assert!(line.ends_with("\x1b[K\x1b[0m"), "unterminated line: {line:?}");
    }
}

#[test]
fn dropped_lines_stay_dropped_when_coloring() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z keep\nskip\n",
    );

    interleave()
        .args(["-r", "(?P<content>.*keep.*)", "-f", "{content}", "--color"])
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::contains("skip").not())
        .stdout(predicate::str::contains("keep"));
}

fn background_of(stdout: &str, needle: &str) -> String {
    let line = stdout.lines().find(|l| l.contains(needle)).unwrap();
    let end = line.find('m').unwrap();
    line[..=end].to_string()
}

#[test]
fn identity_colors_follow_the_node_not_the_position() {
    let dir = TempDir::new().unwrap();
    let a = write_log(
        dir.path(),
        "a.log",
        "2024-01-01T00:00:00Z Created new node n[aaaaaaaaaaaa1111]\n",
    );
    let b = write_log(
        dir.path(),
        "b.log",
        "2024-01-01T00:00:01Z Created new node n[bbbbbbbbbbbb2222]\n",
    );

    let run = |first: &std::path::Path, second: &std::path::Path| {
        let output = interleave()
            .args(PLAIN)
            .args(["--color", "--color-by-identity"])
            .arg(first)
            .arg(second)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let forward = run(&a, &b);
    let backward = run(&b, &a);
    assert_eq!(
        background_of(&forward, "aaaa1111"),
        background_of(&backward, "aaaa1111")
    );
    assert_eq!(
        background_of(&forward, "bbbb2222"),
        background_of(&backward, "bbbb2222")
    );
    assert_ne!(
        background_of(&forward, "aaaa1111"),
        background_of(&forward, "bbbb2222")
    );
}
