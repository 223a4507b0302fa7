use std::time::Duration;

use crate::fetch::FailureKind;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the last failure is final.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-delay retry policy.
///
/// Every failure kind waits the same `delay`; there is no backoff. Kinds listed
/// in `no_retry` fail immediately (e.g. `NotFound`, which will not change on a
/// second try). The default list is empty, so all kinds are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Must be at least 1.
    pub max_attempts: u32,
    /// Wait between attempts.
    pub delay: Duration,
    /// Failure kinds that are never retried.
    pub no_retry: Vec<FailureKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            no_retry: Vec::new(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            no_retry: Vec::new(),
        }
    }

    /// Never retry failures of this kind.
    pub fn without_retry_for(mut self, kind: FailureKind) -> Self {
        if !self.no_retry.contains(&kind) {
            self.no_retry.push(kind);
        }
        self
    }

    pub fn retries(&self, kind: FailureKind) -> bool {
        !self.no_retry.contains(&kind)
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: FailureKind) -> RetryDecision {
        if attempt >= self.max_attempts || !self.retries(kind) {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay)
    }
}
