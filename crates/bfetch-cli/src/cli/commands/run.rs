//! `bfetch run` – fetch every item with bounded concurrency and print the report.

use anyhow::Result;
use bfetch_core::artifacts;
use bfetch_core::batch::{self, BatchReport, BatchStatus, ItemProgress};
use bfetch_core::config::{BfetchConfig, RetryConfig};
use bfetch_core::fetch::HttpFetcher;
use bfetch_core::worklist;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::load_config;

/// Exit code when at least one item failed.
const EXIT_PARTIAL: u8 = 2;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub concurrency: Option<usize>,
    pub attempts: Option<u32>,
    pub delay_secs: Option<f64>,
    pub timeout_secs: Option<f64>,
    pub url_template: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl RunOverrides {
    pub fn apply(self, cfg: &mut BfetchConfig) {
        if let Some(n) = self.concurrency {
            cfg.concurrency_limit = n;
        }
        if let Some(t) = self.timeout_secs {
            cfg.timeout_secs = t;
        }
        if let Some(url) = self.url_template {
            cfg.url_template = url;
        }
        if self.output_dir.is_some() {
            cfg.output_dir = self.output_dir;
        }
        if self.attempts.is_some() || self.delay_secs.is_some() {
            let mut retry: RetryConfig = cfg.retry_config();
            if let Some(n) = self.attempts {
                retry.max_attempts = n;
            }
            if let Some(d) = self.delay_secs {
                retry.delay_secs = d;
            }
            cfg.retry = Some(retry);
        }
    }
}

pub async fn run_batch(
    config: Option<&Path>,
    args: &[String],
    file: Option<&Path>,
    overrides: RunOverrides,
) -> Result<ExitCode> {
    let (mut cfg, _) = load_config(config)?;
    overrides.apply(&mut cfg);
    cfg.validate()?;
    let options = cfg.batch_options()?;

    let items = worklist::collect_items(args, file)?;
    if items.is_empty() {
        println!("No items to fetch.");
        return Ok(ExitCode::SUCCESS);
    }
    tracing::info!(
        items = items.len(),
        concurrency = options.concurrency_limit,
        attempts = options.retry.max_attempts,
        "starting batch"
    );

    let fetcher = Arc::new(HttpFetcher::from_config(&cfg));
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ItemProgress>(16);
    let progress_handle = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            println!("{}", format_progress(&p));
        }
    });

    let report = batch::run_batch(fetcher, &items, &options, Some(progress_tx)).await?;
    finish_printer(progress_handle).await;

    println!();
    print_report(&report);

    if let Some(dir) = &cfg.output_dir {
        let summary = artifacts::write_artifacts(dir, &report)?;
        let written = summary.items.iter().filter(|i| i.file.is_some()).count();
        println!(
            "Wrote {} payload(s) and {} to {}",
            written,
            artifacts::REPORT_FILE,
            dir.display()
        );
    }

    Ok(ExitCode::from(exit_status(report.status())))
}

/// Waits for the progress printer. Returns false (after logging) if it died.
pub async fn finish_printer(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("progress printer task failed: {}", e);
            false
        }
    }
}

/// One line per finished item, e.g. `[2/5] Panthera leo: ok (attempts 1)`.
pub fn format_progress(p: &ItemProgress) -> String {
    match &p.failure {
        None => format!(
            "[{}/{}] {}: ok (attempts {})",
            p.completed, p.total, p.item, p.attempts
        ),
        Some(f) => format!(
            "[{}/{}] {}: failed after {} attempt(s): {}",
            p.completed, p.total, p.item, p.attempts, f
        ),
    }
}

/// 0 when every item succeeded (or there was nothing to do), 2 otherwise.
pub fn exit_status(status: BatchStatus) -> u8 {
    match status {
        BatchStatus::Empty | BatchStatus::AllSucceeded => 0,
        BatchStatus::Partial | BatchStatus::AllFailed => EXIT_PARTIAL,
    }
}

fn print_report(report: &BatchReport) {
    println!("{:<32} {:<10} {:<9} {}", "ITEM", "STATUS", "ATTEMPTS", "ERROR");
    for entry in report.entries() {
        let (status, error) = match entry.outcome.failure() {
            None => ("ok", "-".to_string()),
            Some(f) => ("failed", f.to_string()),
        };
        println!(
            "{:<32} {:<10} {:<9} {}",
            entry.item,
            status,
            entry.outcome.attempts(),
            error
        );
    }
    println!(
        "{} succeeded, {} failed ({})",
        report.succeeded_count(),
        report.failed_count(),
        format!("{:?}", report.status()).to_lowercase()
    );
}
