//! JSON artifact persistence.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::fetcher::FetchReport;
use crate::query::Collection;

/// `<name> (<count>).json`, with path separators in the name neutralized.
pub fn artifact_file_name(collection: &Collection) -> String {
    let name: String = collection
        .name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{name} ({}).json", collection.token_count)
}

/// Write the report's entries as a pretty-printed JSON array into `dir`.
///
/// `dir` must already exist. The file is staged next to its final path and
/// renamed into place, so a failure never leaves a truncated artifact.
pub fn write_report(dir: &Path, report: &FetchReport) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(Error::Output(format!(
            "output directory {} does not exist",
            dir.display()
        )));
    }

    let json = serde_json::to_string_pretty(&report.entries)
        .map_err(|e| Error::Output(format!("Failed to serialize metadata: {e}")))?;

    let path = dir.join(artifact_file_name(&report.collection));
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes())
        .map_err(|e| Error::Output(format!("Failed to write {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        Error::Output(format!("Failed to move {} into place: {e}", path.display()))
    })?;

    info!(path = %path.display(), entries = report.entries.len(), "Metadata written");
    Ok(path)
}
