use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::BatchOptions;
use crate::fetch::{FailureKind, ITEM_PLACEHOLDER};
use crate::retry::RetryPolicy;

/// Rejected configuration. Raised before any fetch is dispatched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("concurrency_limit must be at least 1 (got {0})")]
    ConcurrencyLimit(usize),
    #[error("max_attempts must be at least 1 (got {0})")]
    MaxAttempts(u32),
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    Seconds { field: &'static str, value: f64 },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("url_template must contain the {{item}} placeholder (got {0:?})")]
    MissingPlaceholder(String),
    #[error("url_template is not a valid URL: {0}")]
    InvalidUrl(String),
    #[error("payload_pointer must be empty or start with '/' (got {0:?})")]
    InvalidPointer(String),
}

/// Retry parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per item (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts, in seconds (e.g. 0.5 = 500ms).
    pub delay_secs: f64,
    /// Failure kinds never retried, e.g. `["not_found"]`. Empty = retry everything.
    #[serde(default)]
    pub no_retry: Vec<FailureKind>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            delay_secs: policy.delay.as_secs_f64(),
            no_retry: policy.no_retry,
        }
    }
}

/// Global configuration loaded from `~/.config/bfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfetchConfig {
    /// Maximum number of items fetched at once.
    pub concurrency_limit: usize,
    /// Per-attempt network timeout in seconds.
    pub timeout_secs: f64,
    /// Endpoint; `{item}` is replaced by the percent-encoded item.
    pub url_template: String,
    /// Optional JSON pointer selecting the part of each response to keep.
    #[serde(default)]
    pub payload_pointer: Option<String>,
    /// Where payloads and report.json are written (None = don't write).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for BfetchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 4,
            timeout_secs: 10.0,
            url_template: "https://api.gbif.org/v1/species/match?name={item}".to_string(),
            payload_pointer: None,
            output_dir: None,
            retry: None,
        }
    }
}

impl BfetchConfig {
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = secs_to_duration("timeout_secs", self.timeout_secs)?;
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(timeout)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let retry = self.retry_config();
        if retry.max_attempts < 1 {
            return Err(ConfigError::MaxAttempts(retry.max_attempts));
        }
        let mut policy = RetryPolicy::new(
            retry.max_attempts,
            secs_to_duration("retry.delay_secs", retry.delay_secs)?,
        );
        for kind in retry.no_retry {
            policy = policy.without_retry_for(kind);
        }
        Ok(policy)
    }

    /// Runner options derived from this config (validated).
    pub fn batch_options(&self) -> Result<BatchOptions, ConfigError> {
        let options = BatchOptions {
            concurrency_limit: self.concurrency_limit,
            retry: self.retry_policy()?,
            timeout: self.timeout()?,
        };
        options.validate()?;
        Ok(options)
    }

    /// Check every field; the first problem found is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.batch_options()?;
        if !self.url_template.contains(ITEM_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(self.url_template.clone()));
        }
        let probe = self.url_template.replace(ITEM_PLACEHOLDER, "probe");
        url::Url::parse(&probe).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        if let Some(pointer) = &self.payload_pointer {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(ConfigError::InvalidPointer(pointer.clone()));
            }
        }
        Ok(())
    }
}

fn secs_to_duration(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::Seconds { field, value })
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path (e.g. `--config`).
pub fn load_from_path(path: &Path) -> Result<BfetchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: BfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
