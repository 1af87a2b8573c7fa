// demanda-core/src/infrastructure/io/discover.rs

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

/// Finds the most recent input spreadsheet under `dir`.
///
/// Input files carry a date suffix (`demandas_2025-08.csv`), so the
/// lexicographically greatest matching file name is the latest one.
pub fn find_latest_input(
    dir: &Path,
    prefix: Option<&str>,
) -> Result<PathBuf, InfrastructureError> {
    let mut latest: Option<PathBuf> = None;

    for entry in WalkDir::new(dir).max_depth(2).into_iter().flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "csv") {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if let Some(prefix) = prefix
            && !name.starts_with(prefix)
        {
            continue;
        }
        debug!(candidate = %name, "Input candidate");
        match &latest {
            Some(current)
                if current
                    .file_name()
                    .is_some_and(|c| c.to_string_lossy().as_ref() >= name.as_str()) => {}
            _ => latest = Some(path.to_path_buf()),
        }
    }

    latest.ok_or_else(|| {
        InfrastructureError::InputNotFound(format!(
            "no CSV input under {} (prefix: {})",
            dir.display(),
            prefix.unwrap_or("*")
        ))
    })
}
