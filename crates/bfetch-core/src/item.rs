//! Work item identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier naming one resource to fetch (e.g. a species name).
///
/// Immutable once created; the batch runner only ever clones it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItem(String);

impl WorkItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkItem {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WorkItem {
    fn from(s: String) -> Self {
        Self(s)
    }
}
