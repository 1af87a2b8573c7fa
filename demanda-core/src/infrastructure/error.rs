// demanda-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- TABULAR INPUT ---
    #[error("CSV Parsing Error: {0}")]
    #[diagnostic(
        code(demanda::infra::csv),
        help("Check the delimiter and that every row has the expected number of fields.")
    )]
    Csv(#[from] csv::Error),

    #[error("No input file found under '{0}'")]
    #[diagnostic(
        code(demanda::infra::input_missing),
        help("Place at least one .csv file in the input directory, or pass --input.")
    )]
    InputNotFound(String),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(demanda::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(demanda::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),
}
