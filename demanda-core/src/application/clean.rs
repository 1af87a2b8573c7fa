// demanda-core/src/application/clean.rs

use crate::error::PipelineError;
use crate::infrastructure::config::project::load_pipeline_config;
use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::path::{Component, Path};

/// Removes generated artifacts (cleaned datasets, reports) from the project.
pub fn clean_output(project_dir: &Path) -> Result<(), PipelineError> {
    tracing::info!("🧹 Removing generated artifacts...");

    let config = load_pipeline_config(project_dir).map_err(PipelineError::Infrastructure)?;

    for target_rel_path in config.clean_targets {
        let target = Path::new(&target_rel_path);

        // Path traversal guard: a target must stay inside the project.
        // `starts_with` is a lexical check that "../x" would still pass,
        // so absolute targets and `..` components are rejected outright.
        if target.is_absolute()
            || target
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(PipelineError::UnsafePath(target_rel_path));
        }

        let full_path = project_dir.join(target);
        if !full_path.starts_with(project_dir) {
            return Err(PipelineError::UnsafePath(target_rel_path));
        }

        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)
                    .map_err(|e| PipelineError::Infrastructure(InfrastructureError::Io(e)))?;
            } else {
                fs::remove_file(&full_path)
                    .map_err(|e| PipelineError::Infrastructure(InfrastructureError::Io(e)))?;
            }
            println!("   🗑️  Artifact removed: {target_rel_path}");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_clean_removes_default_output_dir() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("output");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("report.json"), "{}").unwrap();

        clean_output(dir.path()).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_clean_rejects_escaping_target() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("demanda.yaml"),
            "clean_targets: [\"/etc/passwd\"]\n",
        )
        .unwrap();
        assert!(matches!(
            clean_output(dir.path()),
            Err(PipelineError::UnsafePath(_))
        ));
    }

    #[test]
    fn test_clean_rejects_relative_parent_target() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("projeto");
        fs::create_dir_all(&project).unwrap();
        let victim = dir.path().join("victim");
        fs::create_dir_all(&victim).unwrap();
        fs::write(victim.join("dados.csv"), "A\n1\n").unwrap();
        fs::write(
            project.join("demanda.yaml"),
            "clean_targets: [\"../victim\"]\n",
        )
        .unwrap();

        assert!(matches!(
            clean_output(&project),
            Err(PipelineError::UnsafePath(_))
        ));
        assert!(victim.join("dados.csv").exists());
    }

    #[test]
    fn test_clean_on_pristine_project_is_a_noop() {
        let dir = tempdir().unwrap();
        clean_output(dir.path()).unwrap();
    }
}
