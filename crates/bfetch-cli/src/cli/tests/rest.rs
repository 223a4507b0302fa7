//! Tests for config, completions and man.

use super::parse;
use crate::cli::commands::load_config;
use crate::cli::CliCommand;
use clap_complete::Shell;
use std::fs;

#[test]
fn cli_parse_config() {
    match parse(&["bfetch", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["bfetch", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    match parse(&["bfetch", "man"]) {
        CliCommand::Man => {}
        _ => panic!("expected Man"),
    }
}

#[test]
fn load_config_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bfetch.toml");
    fs::write(&path, "concurrency_limit = 7\n").unwrap();
    let (cfg, loaded_from) = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.concurrency_limit, 7);
    assert_eq!(loaded_from, path);
}
