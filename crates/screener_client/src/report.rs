use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::types::{ApiError, FailureKind};

/// Atomically writes the downloaded report to `{dir}/{filename}` by writing a
/// temp file then renaming.
pub(crate) fn write_report(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ApiError> {
    let target = dir.join(filename);
    let fail = |message: String| {
        ApiError::new(
            FailureKind::ReportWrite {
                path: target.display().to_string(),
            },
            message,
        )
    };

    fs::create_dir_all(dir).map_err(|err| fail(err.to_string()))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| fail(err.to_string()))?;
    tmp.write_all(bytes).map_err(|err| fail(err.to_string()))?;
    tmp.flush().map_err(|err| fail(err.to_string()))?;

    // Replace an existing report of the same name to keep reruns deterministic.
    if target.exists() {
        fs::remove_file(&target).map_err(|err| fail(err.to_string()))?;
    }
    tmp.persist(&target)
        .map_err(|err| fail(err.error.to_string()))?;
    Ok(target)
}
