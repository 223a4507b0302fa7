//! CLI for the bfetch batch fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{run_batch, run_completions, run_man, run_show_config, RunOverrides};

/// Top-level CLI for bfetch.
#[derive(Debug, Parser)]
#[command(name = "bfetch", version)]
#[command(about = "bfetch: fetch JSON for a list of items with bounded concurrency and retry", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/bfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every item and report per-item results.
    Run {
        /// Items to fetch (e.g. species names). Combined with --file.
        items: Vec<String>,
        /// Read items from a file, one per line ('#' starts a comment).
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,
        /// Maximum number of items fetched at once.
        #[arg(long, short = 'j', value_name = "N")]
        concurrency: Option<usize>,
        /// Maximum attempts per item, including the first.
        #[arg(long, value_name = "N")]
        attempts: Option<u32>,
        /// Fixed delay between attempts, in seconds.
        #[arg(long, value_name = "SECS")]
        delay_secs: Option<f64>,
        /// Per-attempt timeout, in seconds.
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<f64>,
        /// Endpoint URL containing the {item} placeholder.
        #[arg(long, value_name = "URL")]
        url_template: Option<String>,
        /// Write one JSON file per fetched item plus report.json here.
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show the effective configuration and where it was loaded from.
    Config,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();

        match cli.command {
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
                let overrides = RunOverrides {
                    concurrency,
                    attempts,
                    delay_secs,
                    timeout_secs,
                    url_template,
                    output_dir,
                };
                run_batch(cli.config.as_deref(), &items, file.as_deref(), overrides).await
            }
            CliCommand::Config => run_show_config(cli.config.as_deref()),
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man(),
        }
    }
}

#[cfg(test)]
mod tests;
