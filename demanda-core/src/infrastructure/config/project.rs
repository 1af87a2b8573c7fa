// demanda-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::domain::cleaning::CleaningRules;
use crate::infrastructure::error::InfrastructureError;

/// Project-level settings, loaded from `demanda.yaml` at the project root.
/// Every field has a sane default so a bare data directory still works.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory scanned for input spreadsheets, relative to the project root.
    #[serde(default = "default_input_path")]
    pub input_path: String,

    /// When set, only files whose name starts with this prefix are considered.
    #[serde(default)]
    pub input_prefix: Option<String>,

    /// Where cleaned datasets and reports land.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Directories removed by `demanda clean`, relative to the project root.
    #[serde(default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    /// Fail the whole run on the first table error instead of skipping it.
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub rules: CleaningRules,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            input_path: default_input_path(),
            input_prefix: None,
            output_path: default_output_path(),
            clean_targets: default_clean_targets(),
            strict: false,
            rules: CleaningRules::default(),
        }
    }
}

fn default_name() -> String {
    "demandas".to_string()
}

fn default_input_path() -> String {
    "data".to_string()
}

fn default_output_path() -> String {
    "output".to_string()
}

fn default_clean_targets() -> Vec<String> {
    vec!["output".to_string()]
}

#[instrument(skip(project_dir))]
pub fn load_pipeline_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    let Some(config_path) = find_main_config(project_dir) else {
        // A project without a manifest runs on defaults. Common for one-off
        // cleanups of a single spreadsheet.
        warn!(dir = ?project_dir, "No demanda.yaml found, using default configuration");
        return Ok(PipelineConfig::default());
    };
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: PipelineConfig = serde_yaml::from_str(&content)?;

    load_satellite_configs(&mut config, project_dir)?;
    apply_env_overrides(&mut config);

    config
        .rules
        .check()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    let candidates = ["demanda.yaml", "demanda.yml"];
    candidates
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn load_satellite_configs(
    config: &mut PipelineConfig,
    project_dir: &Path,
) -> Result<(), InfrastructureError> {
    // Alias tables grow quickly and are maintained by hand, so they live in
    // their own file next to the manifest.
    let alias_path = project_dir.join("aliases.yml");
    if alias_path.exists() {
        #[derive(Deserialize)]
        struct AliasesWrapper {
            aliases: HashMap<String, String>,
        }

        let content = fs::read_to_string(&alias_path)?;
        let wrapper: AliasesWrapper = serde_yaml::from_str(&content)?;
        config.rules.aliases.extend(wrapper.aliases);
        info!(count = config.rules.aliases.len(), "Alias table loaded");
    }
    Ok(())
}

fn apply_env_overrides(config: &mut PipelineConfig) {
    if let Ok(val) = std::env::var("DEMANDA_OUTPUT_PATH") {
        info!(old = ?config.output_path, new = ?val, "Overriding output path via ENV");
        config.output_path = val;
    }
    if let Ok(val) = std::env::var("DEMANDA_STRICT") {
        let strict = matches!(val.as_str(), "1" | "true" | "yes");
        info!(strict, "Overriding strict mode via ENV");
        config.strict = strict;
    }
}
