//! Aggregated batch results.

use serde::{Deserialize, Serialize};

use crate::fetch::{FailureKind, FetchFailure};
use crate::item::WorkItem;
use crate::outcome::ItemOutcome;

/// Overall result of a batch. What counts as "failure" is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// No items were given.
    Empty,
    AllSucceeded,
    Partial,
    AllFailed,
}

/// One item and its terminal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub item: WorkItem,
    pub outcome: ItemOutcome,
}

/// Every item's outcome, in input order, plus counts.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    entries: Vec<ItemReport>,
    succeeded: usize,
    failed: usize,
}

impl BatchReport {
    /// Build from per-index slots filled by the runner. A slot left empty
    /// becomes a failure rather than vanishing from the report.
    pub(crate) fn from_slots(items: &[WorkItem], slots: Vec<Option<ItemOutcome>>) -> Self {
        debug_assert_eq!(items.len(), slots.len());
        let entries = items
            .iter()
            .cloned()
            .zip(slots)
            .map(|(item, slot)| {
                let outcome = slot.unwrap_or_else(|| ItemOutcome::Failed {
                    last_failure: FetchFailure::new(FailureKind::Other, "no outcome recorded"),
                    attempts: 1,
                });
                ItemReport { item, outcome }
            })
            .collect();
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ItemReport>) -> Self {
        let succeeded = entries.iter().filter(|e| e.outcome.is_success()).count();
        let failed = entries.len() - succeeded;
        Self {
            entries,
            succeeded,
            failed,
        }
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[ItemReport] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ItemReport> {
        self.entries
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome for `item` (the first one if the input listed it twice).
    pub fn get(&self, item: &WorkItem) -> Option<&ItemOutcome> {
        self.entries
            .iter()
            .find(|e| &e.item == item)
            .map(|e| &e.outcome)
    }

    pub fn status(&self) -> BatchStatus {
        match (self.succeeded, self.failed) {
            (0, 0) => BatchStatus::Empty,
            (_, 0) => BatchStatus::AllSucceeded,
            (0, _) => BatchStatus::AllFailed,
            _ => BatchStatus::Partial,
        }
    }

    /// Serializable view, without artifact paths or digests.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            status: self.status(),
            succeeded: self.succeeded,
            failed: self.failed,
            items: self.entries.iter().map(ItemSummary::from_entry).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Succeeded,
    Failed,
}

/// One row of `report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item: WorkItem,
    pub status: ItemStatus,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Payload file name, relative to the output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// SHA-256 (hex) of the payload file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ItemSummary {
    fn from_entry(entry: &ItemReport) -> Self {
        let failure = entry.outcome.failure();
        Self {
            item: entry.item.clone(),
            status: if entry.outcome.is_success() {
                ItemStatus::Succeeded
            } else {
                ItemStatus::Failed
            },
            attempts: entry.outcome.attempts(),
            error_kind: failure.map(|f| f.kind),
            error: failure.map(|f| f.message.clone()),
            file: None,
            sha256: None,
        }
    }
}

/// Serializable aggregate written as `report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub status: BatchStatus,
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ItemSummary>,
}
