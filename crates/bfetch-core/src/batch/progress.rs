//! Live progress events, one per completed item (completion order).

use crate::fetch::FetchFailure;
use crate::item::WorkItem;
use crate::outcome::ItemOutcome;

/// Announces that one item reached its terminal outcome.
#[derive(Debug, Clone)]
pub struct ItemProgress {
    /// Position of the item in the input list.
    pub index: usize,
    pub item: WorkItem,
    pub attempts: u32,
    /// `None` when the item succeeded.
    pub failure: Option<FetchFailure>,
    /// Items finished so far, including this one.
    pub completed: usize,
    pub total: usize,
}

impl ItemProgress {
    pub(crate) fn new(
        index: usize,
        item: WorkItem,
        outcome: &ItemOutcome,
        completed: usize,
        total: usize,
    ) -> Self {
        Self {
            index,
            item,
            attempts: outcome.attempts(),
            failure: outcome.failure().cloned(),
            completed,
            total,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Fraction of the batch finished, in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }
}
