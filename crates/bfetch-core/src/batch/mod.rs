//! Batch runner: fan out fetches under a concurrency cap, fan in outcomes.
//!
//! Keeps up to `concurrency_limit` items in flight; when one finishes, the
//! next queued item starts immediately (slot-based, no waves). Each task
//! is tracked by its task id and the runner is the only owner of the result
//! slots, so the report is rebuilt in input order whatever the completion
//! order was.

mod progress;
mod report;

pub use progress::ItemProgress;
pub use report::{BatchReport, BatchStatus, ItemReport, ItemStatus, ItemSummary, ReportSummary};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinSet};

use crate::config::ConfigError;
use crate::fetch::{FailureKind, FetchFailure, Fetcher};
use crate::item::WorkItem;
use crate::outcome::ItemOutcome;
use crate::retry::{fetch_with_retry, RetryPolicy};

/// Parameters for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum number of items in flight at once. Must be at least 1.
    pub concurrency_limit: usize,
    pub retry: RetryPolicy,
    /// Per-attempt timeout handed to the fetcher.
    pub timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: 4,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl BatchOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit < 1 {
            return Err(ConfigError::ConcurrencyLimit(self.concurrency_limit));
        }
        if self.retry.max_attempts < 1 {
            return Err(ConfigError::MaxAttempts(self.retry.max_attempts));
        }
        Ok(())
    }
}

/// Batch-level failure. Individual fetch failures, including tasks that died,
/// are never reported here.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Fetches every item through the retry policy with at most
/// `options.concurrency_limit` items in flight, and returns once each item has
/// a terminal outcome.
///
/// Options are validated before anything is dispatched. If `progress_tx` is
/// `Some`, an [`ItemProgress`] is sent as each item completes.
pub async fn run_batch<F>(
    fetcher: Arc<F>,
    items: &[WorkItem],
    options: &BatchOptions,
    progress_tx: Option<mpsc::Sender<ItemProgress>>,
) -> Result<BatchReport, BatchError>
where
    F: Fetcher + ?Sized + 'static,
{
    options.validate()?;
    let options = Arc::new(options.clone());
    let total = items.len();
    tracing::info!(
        items = total,
        concurrency = options.concurrency_limit,
        max_attempts = options.retry.max_attempts,
        "batch started"
    );

    let mut slots: Vec<Option<ItemOutcome>> = vec![None; total];
    let mut queue = items.iter().cloned().enumerate();
    let mut join_set = JoinSet::new();
    let mut pending: HashMap<task::Id, (usize, WorkItem)> = HashMap::new();
    let mut completed = 0usize;

    loop {
        while join_set.len() < options.concurrency_limit {
            let Some((index, item)) = queue.next() else {
                break;
            };
            let fetcher = Arc::clone(&fetcher);
            let options = Arc::clone(&options);
            let task_item = item.clone();
            let handle = join_set.spawn_blocking(move || {
                fetch_with_retry(&*fetcher, &task_item, &options.retry, options.timeout)
            });
            pending.insert(handle.id(), (index, item));
        }

        let Some(res) = join_set.join_next_with_id().await else {
            break;
        };
        let Some((index, item, outcome)) = settle(res, &mut pending) else {
            continue;
        };
        completed += 1;

        if let Some(tx) = &progress_tx {
            let progress = ItemProgress::new(index, item, &outcome, completed, total);
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(progress).await;
        }
        slots[index] = Some(outcome);
    }

    let report = BatchReport::from_slots(items, slots);
    tracing::info!(
        succeeded = report.succeeded_count(),
        failed = report.failed_count(),
        "batch finished"
    );
    Ok(report)
}

/// Pairs a finished task with its item. A task that died without returning
/// (a panic outside the retry loop, cancellation) becomes an `Other` failure
/// for that item only.
fn settle(
    res: Result<(task::Id, ItemOutcome), JoinError>,
    pending: &mut HashMap<task::Id, (usize, WorkItem)>,
) -> Option<(usize, WorkItem, ItemOutcome)> {
    match res {
        Ok((id, outcome)) => {
            let (index, item) = pending.remove(&id)?;
            Some((index, item, outcome))
        }
        Err(err) => {
            let (index, item) = pending.remove(&err.id())?;
            tracing::error!(item = %item, "fetch task did not complete: {}", err);
            let outcome = ItemOutcome::Failed {
                last_failure: FetchFailure::new(
                    FailureKind::Other,
                    format!("fetch task did not complete: {}", err),
                ),
                attempts: 1,
            };
            Some((index, item, outcome))
        }
    }
}
