//! Integration tests for the TOML config file and its interplay with flags.

use std::io::Write;

use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

use crate::{PLAIN, interleave, write_log};

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn explicit_config_file_sets_format() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z hello\n");
    let config = config_file(
        r#"
line_parsing_regex = '\S+ (?P<content>.*)'
output_format = "[{index}] {content}"
"#,
    );

    interleave()
        .arg("--config")
        .arg(config.path())
        .arg(&a)
        .assert()
        .success()
        .stdout("[0] hello\n");
}

#[test]
fn flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z hello\n");
    let config = config_file(r#"output_format = "[{index}] {content}""#);

    interleave()
        .arg("--config")
        .arg(config.path())
        .args(PLAIN)
        .arg(&a)
        .assert()
        .success()
        .stdout("0 2024-01-01T00:00:00Z hello\n");
}

#[test]
fn config_file_found_under_xdg_config_home() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z hello\n");
    let config_dir = dir.path().join("xdg").join("interleave");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "color = true\nbg_colors = [\"#010203\"]\n",
    )
    .unwrap();

    interleave()
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .args(PLAIN)
        .arg(&a)
        .assert()
        .success()
        .stdout("\x1b[48;2;1;2;3m0 2024-01-01T00:00:00Z hello\x1b[K\x1b[0m\n");
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z hello\n");

    interleave()
        .args(["--config", "/nonexistent/interleave.toml"])
        .arg(&a)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn unknown_config_key_is_an_error() {
    let dir = TempDir::new().unwrap();
    let a = write_log(dir.path(), "a.log", "2024-01-01T00:00:00Z hello\n");
    let config = config_file("colour_mode = \"always\"\n");

    interleave()
        .arg("--config")
        .arg(config.path())
        .arg(&a)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file error"));
}
