//! Single-attempt fetching.
//!
//! A [`Fetcher`] issues exactly one request for one item and reports the
//! outcome as data: transport errors, HTTP errors, and undecodable bodies all
//! come back as a [`FetchFailure`], never as a panic or a retry. Retrying is
//! the job of [`crate::retry`].

mod classify;
mod decode;
mod http;

pub use classify::{classify_curl_error, classify_http_status};
pub use decode::decode_payload;
pub use http::{HttpFetcher, ITEM_PLACEHOLDER};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::item::WorkItem;

/// Classification of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response within the per-attempt timeout.
    Timeout,
    /// DNS failure, refused or reset connection, send/receive error.
    ConnectionError,
    /// The server says the resource does not exist (404, 410).
    NotFound,
    /// Body is not well-formed JSON, or it signals "not found" inside a 2xx.
    InvalidPayload,
    /// Anything else (other HTTP statuses, malformed URLs, panics).
    Other,
}

impl FailureKind {
    pub const ALL: [FailureKind; 5] = [
        FailureKind::Timeout,
        FailureKind::ConnectionError,
        FailureKind::NotFound,
        FailureKind::InvalidPayload,
        FailureKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::ConnectionError => "connection_error",
            FailureKind::NotFound => "not_found",
            FailureKind::InvalidPayload => "invalid_payload",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed attempt: what went wrong, plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Decoded JSON document for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(serde_json::Value);

impl Payload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Pretty-printed JSON bytes, newline-terminated (the on-disk artifact form).
    pub fn to_pretty_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = serde_json::to_vec_pretty(&self.0)?;
        out.push(b'\n');
        Ok(out)
    }
}

/// Outcome of a single attempt.
pub type FetchResult = Result<Payload, FetchFailure>;

/// One network request for one item, bounded by `timeout`.
///
/// Implementations must be callable from several threads at once and must
/// represent ordinary failures in the returned [`FetchResult`].
pub trait Fetcher: Send + Sync {
    fn fetch(&self, item: &WorkItem, timeout: Duration) -> FetchResult;
}

impl<F> Fetcher for F
where
    F: Fn(&WorkItem, Duration) -> FetchResult + Send + Sync,
{
    fn fetch(&self, item: &WorkItem, timeout: Duration) -> FetchResult {
        self(item, timeout)
    }
}
