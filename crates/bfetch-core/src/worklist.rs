//! Worklist loading: items from text files and command-line arguments.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::item::WorkItem;

/// Parse one item per line. Surrounding whitespace is trimmed; blank lines
/// and lines starting with `#` are skipped.
pub fn parse_worklist(text: &str) -> Vec<WorkItem> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(WorkItem::from)
        .collect()
}

/// Read and parse a worklist file.
pub fn load_worklist(path: &Path) -> Result<Vec<WorkItem>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read worklist {}", path.display()))?;
    Ok(parse_worklist(&text))
}

/// Drop repeated items, keeping the first occurrence and the input order.
pub fn dedup_items<I>(items: I) -> Vec<WorkItem>
where
    I: IntoIterator<Item = WorkItem>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        } else {
            tracing::warn!(item = %item, "duplicate item dropped from worklist");
        }
    }
    out
}

/// Combine command-line items with an optional worklist file (arguments
/// first), then deduplicate.
pub fn collect_items(args: &[String], file: Option<&Path>) -> Result<Vec<WorkItem>> {
    let mut items: Vec<WorkItem> = args
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(WorkItem::from)
        .collect();
    if let Some(path) = file {
        items.extend(load_worklist(path)?);
    }
    Ok(dedup_items(items))
}
