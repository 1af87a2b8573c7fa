// demanda-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically via a temporary file in the same
/// directory, so readers never observe a half-written report or dataset.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_leaves_no_temp_file_behind() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("run_results.json");

        atomic_write(&target, "{\"success\":true}")?;
        atomic_write(&target, "{\"success\":false}")?;

        // Last write wins, and the directory holds only the target:
        // the intermediate temp file must have been renamed away.
        assert_eq!(fs::read_to_string(&target)?, "{\"success\":false}");
        let entries: Vec<_> = fs::read_dir(dir.path())?
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["run_results.json"]);
        Ok(())
    }

    #[test]
    fn test_atomic_write_into_nested_directory() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("output").join("2025-01");
        fs::create_dir_all(&nested)?;

        atomic_write(nested.join("report.json"), "{}")?;

        assert_eq!(fs::read_to_string(nested.join("report.json"))?, "{}");
        Ok(())
    }
}
