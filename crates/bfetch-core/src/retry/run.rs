//! Retry loop: call the fetcher until success or the policy says stop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use super::policy::{RetryDecision, RetryPolicy};
use crate::fetch::{FailureKind, FetchFailure, FetchResult, Fetcher};
use crate::item::WorkItem;
use crate::outcome::ItemOutcome;

/// Fetches `item` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between failed attempts. Blocks the current thread.
///
/// A fetcher that panics is treated as a failed attempt of kind
/// [`FailureKind::Other`], so one misbehaving item cannot take down its worker.
pub fn fetch_with_retry<F>(
    fetcher: &F,
    item: &WorkItem,
    policy: &RetryPolicy,
    timeout: Duration,
) -> ItemOutcome
where
    F: Fetcher + ?Sized,
{
    let mut attempt = 1u32;
    loop {
        match attempt_once(fetcher, item, timeout) {
            Ok(payload) => {
                tracing::debug!(item = %item, attempt, "fetch succeeded");
                return ItemOutcome::Succeeded {
                    payload,
                    attempts: attempt,
                };
            }
            Err(failure) => match policy.decide(attempt, failure.kind) {
                RetryDecision::NoRetry => {
                    tracing::warn!(item = %item, attempt, error = %failure, "giving up");
                    return ItemOutcome::Failed {
                        last_failure: failure,
                        attempts: attempt,
                    };
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        item = %item,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "fetch failed; retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            },
        }
    }
}

fn attempt_once<F>(fetcher: &F, item: &WorkItem, timeout: Duration) -> FetchResult
where
    F: Fetcher + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(item, timeout))).unwrap_or_else(
        |panic| {
            Err(FetchFailure::new(
                FailureKind::Other,
                format!("fetcher panicked: {}", panic_message(panic.as_ref())),
            ))
        },
    )
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
