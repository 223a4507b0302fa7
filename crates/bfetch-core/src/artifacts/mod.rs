//! Output artifacts: one JSON file per fetched item plus `report.json`.
//!
//! Every file is written to a `.part` temp path, synced, then renamed into
//! place, so a crash never leaves a half-written payload under its final name.

mod checksum;
mod sanitize;

pub use checksum::sha256_hex;
pub use sanitize::file_stem_for_item;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::batch::{BatchReport, ReportSummary};

/// Name of the aggregate report inside the output directory.
pub const REPORT_FILE: &str = "report.json";

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `final_path` via a synced temp file and a rename.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    let tmp = temp_path(final_path);
    let mut f = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    f.write_all(data)
        .with_context(|| format!("write {}", tmp.display()))?;
    f.sync_all()
        .with_context(|| format!("sync {}", tmp.display()))?;
    drop(f);
    fs::rename(&tmp, final_path).with_context(|| {
        format!("failed to rename {} to {}", tmp.display(), final_path.display())
    })?;
    Ok(())
}

/// `<stem>.json` if free, else `<stem>-<index>.json`, else
/// `<stem>-<index>-<n>.json` for the first free `n`. The name is reserved in `used`.
fn unique_name(stem: &str, index: usize, used: &mut HashSet<String>) -> String {
    let mut name = format!("{}.json", stem);
    if used.insert(name.clone()) {
        return name;
    }
    name = format!("{}-{}.json", stem, index);
    let mut n = 1usize;
    while !used.insert(name.clone()) {
        name = format!("{}-{}-{}.json", stem, index, n);
        n += 1;
    }
    name
}

/// Writes each successful payload as `<stem>.json` and the summary as
/// [`REPORT_FILE`] under `dir` (created if missing). Returns the summary with
/// file names and digests filled in.
///
/// Items whose stems collide (e.g. `a/b` and `a b`) get a `-<index>` suffix,
/// where index is the item's position in the input. No two items ever share a
/// file.
pub fn write_artifacts(dir: &Path, report: &BatchReport) -> Result<ReportSummary> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;

    let mut summary = report.summary();
    let mut used = HashSet::new();
    used.insert(REPORT_FILE.to_string());

    for (index, (entry, row)) in report.entries().iter().zip(summary.items.iter_mut()).enumerate() {
        let Some(payload) = entry.outcome.payload() else {
            continue;
        };
        let name = unique_name(&file_stem_for_item(entry.item.as_str()), index, &mut used);

        let bytes = payload
            .to_pretty_bytes()
            .with_context(|| format!("serialize payload for {}", entry.item))?;
        write_atomic(&dir.join(&name), &bytes)?;
        tracing::debug!(item = %entry.item, file = %name, "payload written");

        row.sha256 = Some(sha256_hex(&bytes));
        row.file = Some(name);
    }

    let report_bytes = serde_json::to_vec_pretty(&summary).context("serialize report")?;
    let report_path = dir.join(REPORT_FILE);
    write_atomic(&report_path, &report_bytes)?;
    tracing::info!("report written to {}", report_path.display());

    Ok(summary)
}
