//! Terminal per-item outcomes.

use crate::fetch::{FetchFailure, Payload};

/// Final status of one work item after all attempts. Created once, never updated.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Succeeded {
        payload: Payload,
        attempts: u32,
    },
    Failed {
        last_failure: FetchFailure,
        attempts: u32,
    },
}

impl ItemOutcome {
    /// Number of fetch attempts made, in `[1, max_attempts]`.
    pub fn attempts(&self) -> u32 {
        match self {
            ItemOutcome::Succeeded { attempts, .. } | ItemOutcome::Failed { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded { .. })
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ItemOutcome::Succeeded { payload, .. } => Some(payload),
            ItemOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            ItemOutcome::Succeeded { .. } => None,
            ItemOutcome::Failed { last_failure, .. } => Some(last_failure),
        }
    }
}
