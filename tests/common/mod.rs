//! Shared integration-test helpers for running the `roadnet` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Fixture path as a `&str`-friendly `String`.
#[allow(clippy::missing_panics_doc)]
pub fn fixture(name: &str) -> String {
    fixture_path(name)
        .to_str()
        .expect("non-UTF-8 fixture path")
        .to_string()
}

/// Runs `roadnet` with `args` to completion and captures its output.
///
/// `ROADNET_*` variables from the caller's environment are cleared so
/// flag defaults apply.
pub fn spawn_command(args: &[&str]) -> Output {
    spawn_command_with_env(args, &[])
}

/// Like [`spawn_command`] with extra environment variables set.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_roadnet"));
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("ROADNET_") {
            command.env_remove(key);
        }
    }
    command
        .envs(env.iter().copied())
        .args(args)
        .output()
        .expect("failed to spawn roadnet")
}

/// Starts `roadnet` with `args` without waiting for it, piping stdout
/// and stderr.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_background(args: &[&str]) -> Child {
    let mut command = Command::new(env!("CARGO_BIN_EXE_roadnet"));
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("ROADNET_") {
            command.env_remove(key);
        }
    }
    command
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn roadnet")
}

/// Malidrive flags loading every book from the crosswalk fixture.
pub fn crosswalk_args() -> Vec<String> {
    let book = fixture("crosswalk.yaml");
    vec![
        "--xodr-file-path".to_string(),
        fixture("Crosswalk.xodr"),
        "--road-rule-book".to_string(),
        book.clone(),
        "--traffic-light-book".to_string(),
        book.clone(),
        "--phase-ring-book".to_string(),
        book.clone(),
        "--intersection-book".to_string(),
        book,
    ]
}

/// Runs `roadnet` with `head`, then the crosswalk flags, then `tail`.
pub fn run_with_crosswalk(head: &[&str], tail: &[&str]) -> Output {
    let flags = crosswalk_args();
    let mut args: Vec<&str> = head.to_vec();
    args.extend(flags.iter().map(String::as_str));
    args.extend_from_slice(tail);
    spawn_command(&args)
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
