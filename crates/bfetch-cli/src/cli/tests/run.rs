//! Tests for `bfetch run`: argument parsing, overrides and output helpers.

use super::parse;
use crate::cli::commands::{exit_status, finish_printer, format_progress, RunOverrides};
use crate::cli::{Cli, CliCommand};
use bfetch_core::batch::{BatchStatus, ItemProgress};
use bfetch_core::config::BfetchConfig;
use bfetch_core::fetch::{FailureKind, FetchFailure};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn cli_parse_run_items_only() {
    match parse(&["bfetch", "run", "Panthera leo", "Ursus arctos"]) {
        CliCommand::Run {
            items,
            file,
            concurrency,
            attempts,
            output_dir,
            ..
        } => {
            assert_eq!(items, ["Panthera leo", "Ursus arctos"]);
            assert!(file.is_none());
            assert!(concurrency.is_none());
            assert!(attempts.is_none());
            assert!(output_dir.is_none());
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_all_flags() {
    match parse(&[
        "bfetch",
        "run",
        "-f",
        "species.txt",
        "-j",
        "8",
        "--attempts",
        "5",
        "--delay-secs",
        "0.5",
        "--timeout-secs",
        "3",
        "--url-template",
        "http://localhost:8080/{item}",
        "-o",
        "out",
    ]) {
        CliCommand::Run {
            items,
            file,
            concurrency,
            attempts,
            delay_secs,
            timeout_secs,
            url_template,
            output_dir,
        } => {
            assert!(items.is_empty());
            assert_eq!(file, Some(PathBuf::from("species.txt")));
            assert_eq!(concurrency, Some(8));
            assert_eq!(attempts, Some(5));
            assert_eq!(delay_secs, Some(0.5));
            assert_eq!(timeout_secs, Some(3.0));
            assert_eq!(url_template.as_deref(), Some("http://localhost:8080/{item}"));
            assert_eq!(output_dir, Some(PathBuf::from("out")));
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["bfetch", "run", "a", "--config", "/tmp/b.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/b.toml")));
}

#[test]
fn cli_rejects_non_numeric_concurrency() {
    assert!(Cli::try_parse_from(["bfetch", "run", "-j", "many"]).is_err());
}

#[test]
fn overrides_replace_config_values() {
    let mut cfg = BfetchConfig::default();
    RunOverrides {
        concurrency: Some(2),
        attempts: Some(5),
        delay_secs: Some(0.25),
        timeout_secs: Some(1.5),
        url_template: Some("http://h/{item}".to_string()),
        output_dir: Some(PathBuf::from("out")),
    }
    .apply(&mut cfg);

    assert_eq!(cfg.concurrency_limit, 2);
    assert_eq!(cfg.url_template, "http://h/{item}");
    assert_eq!(cfg.output_dir, Some(PathBuf::from("out")));
    let options = cfg.batch_options().unwrap();
    assert_eq!(options.timeout, Duration::from_millis(1500));
    assert_eq!(options.retry.max_attempts, 5);
    assert_eq!(options.retry.delay, Duration::from_millis(250));
}

#[test]
fn empty_overrides_keep_config() {
    let mut cfg = BfetchConfig::default();
    RunOverrides::default().apply(&mut cfg);
    assert_eq!(cfg, BfetchConfig::default());
}

#[test]
fn zero_concurrency_override_fails_validation() {
    let mut cfg = BfetchConfig::default();
    RunOverrides {
        concurrency: Some(0),
        ..Default::default()
    }
    .apply(&mut cfg);
    assert!(cfg.validate().is_err());
}

#[test]
fn progress_lines() {
    let mut p = ItemProgress {
        index: 0,
        item: "Panthera leo".into(),
        attempts: 1,
        failure: None,
        completed: 2,
        total: 5,
    };
    assert_eq!(format_progress(&p), "[2/5] Panthera leo: ok (attempts 1)");

    p.attempts = 3;
    p.failure = Some(FetchFailure::new(FailureKind::Timeout, "no response in 10s"));
    let line = format_progress(&p);
    assert!(line.starts_with("[2/5] Panthera leo: failed after 3 attempt(s): "));
    assert!(line.contains("no response in 10s"));
}

#[test]
fn exit_status_by_batch_status() {
    assert_eq!(exit_status(BatchStatus::Empty), 0);
    assert_eq!(exit_status(BatchStatus::AllSucceeded), 0);
    assert_eq!(exit_status(BatchStatus::Partial), 2);
    assert_eq!(exit_status(BatchStatus::AllFailed), 2);
}

#[tokio::test]
async fn finish_printer_reports_a_dead_printer() {
    let clean = tokio::spawn(async {});
    assert!(finish_printer(clean).await);

    let dead = tokio::spawn(async { panic!("stdout closed") });
    assert!(!finish_printer(dead).await);
}
