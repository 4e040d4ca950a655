//! Writes the JSON export to disk.

use oatrack_core::error::{OatrackError, Result};
use oatrack_core::export::{EXPORT_FILE_NAME, export_snapshot};
use oatrack_core::record::Record;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Writes `records` to `dir/answers.json`, creating `dir` if needed.
///
/// Returns the path written. An existing export is overwritten.
pub async fn write_export(dir: &Path, records: &[Record]) -> Result<PathBuf> {
    let bytes = export_snapshot(records)?;

    fs::create_dir_all(dir)
        .await
        .map_err(|e| OatrackError::io(format!("Failed to create {:?}: {}", dir, e)))?;

    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, bytes)
        .await
        .map_err(|e| OatrackError::io(format!("Failed to write {:?}: {}", path, e)))?;

    tracing::info!("[Export] Wrote {} records to {:?}", records.len(), path);
    Ok(path)
}
