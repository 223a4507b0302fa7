//! `bfetch config` – show the effective configuration.

use anyhow::Result;
use bfetch_core::config::{self, BfetchConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Load the config from `--config` if given, else from the XDG default
/// (created with defaults on first use). Returns the config and its path.
pub fn load_config(explicit: Option<&Path>) -> Result<(BfetchConfig, PathBuf)> {
    let cfg = match explicit {
        Some(path) => (config::load_from_path(path)?, path.to_path_buf()),
        None => (config::load_or_init()?, config::config_path()?),
    };
    tracing::debug!(path = %cfg.1.display(), "loaded config: {:?}", cfg.0);
    Ok(cfg)
}

pub fn run_show_config(explicit: Option<&Path>) -> Result<ExitCode> {
    let (cfg, path) = load_config(explicit)?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&cfg)?);
    if let Err(e) = cfg.validate() {
        println!("# warning: {}", e);
    }
    Ok(ExitCode::SUCCESS)
}
