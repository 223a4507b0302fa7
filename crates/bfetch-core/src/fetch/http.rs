//! HTTP GET fetcher backed by libcurl.

use std::time::Duration;

use super::classify::{classify_curl_error, classify_http_status};
use super::decode::decode_payload;
use super::{FailureKind, FetchFailure, FetchResult, Fetcher};
use crate::config::BfetchConfig;
use crate::item::WorkItem;

/// Placeholder in the URL template replaced by the percent-encoded item.
pub const ITEM_PLACEHOLDER: &str = "{item}";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("bfetch/", env!("CARGO_PKG_VERSION"));

/// Fetches `url_template` with `{item}` substituted, one blocking GET per call.
///
/// Runs in the current thread; the batch runner calls it from the blocking pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    url_template: String,
    payload_pointer: Option<String>,
}

impl HttpFetcher {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            payload_pointer: None,
        }
    }

    pub fn from_config(cfg: &BfetchConfig) -> Self {
        Self::new(cfg.url_template.clone()).with_payload_pointer(cfg.payload_pointer.clone())
    }

    /// Keep only the sub-document at this JSON pointer.
    pub fn with_payload_pointer(mut self, pointer: Option<String>) -> Self {
        self.payload_pointer = pointer;
        self
    }

    /// Request URL for an item.
    pub fn url_for(&self, item: &WorkItem) -> String {
        self.url_template
            .replace(ITEM_PLACEHOLDER, &encode_item(item.as_str()))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, item: &WorkItem, timeout: Duration) -> FetchResult {
        let url = self.url_for(item);
        if timeout.is_zero() {
            // libcurl treats 0 as "no timeout".
            return Err(FetchFailure::new(
                FailureKind::Timeout,
                format!("GET {}: zero timeout", url),
            ));
        }
        let (code, body) = get(&url, timeout)
            .map_err(|e| FetchFailure::new(classify_curl_error(&e), format!("GET {}: {}", url, e)))?;
        tracing::debug!(item = %item, code, bytes = body.len(), "response received");

        if !(200..300).contains(&code) {
            return Err(FetchFailure::new(
                classify_http_status(code),
                format!("GET {} returned HTTP {}", url, code),
            ));
        }
        decode_payload(&body, self.payload_pointer.as_deref())
    }
}

/// Percent-encode an item for use in a path segment or query value.
/// Spaces become `%20` so the result is valid in both positions.
fn encode_item(item: &str) -> String {
    url::form_urlencoded::byte_serialize(item.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn get(url: &str, timeout: Duration) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body = Vec::new();
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeout.min(CONNECT_TIMEOUT))?;
    easy.timeout(timeout)?;
    easy.useragent(USER_AGENT)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    Ok((code, body))
}
