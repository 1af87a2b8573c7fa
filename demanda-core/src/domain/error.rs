// demanda-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid cleaning rules: {0}")]
    #[diagnostic(
        code(demanda::domain::rules),
        help("Check thresholds (0.0..=1.0) and field names in your rules file.")
    )]
    InvalidRules(String),

    #[error("Invalid date range: min {min} is after max {max}")]
    #[diagnostic(code(demanda::domain::date_range))]
    InvalidDateRange { min: String, max: String },

    #[error("Dataset '{0}' has no header row")]
    #[diagnostic(code(demanda::domain::headerless))]
    HeaderlessTable(String),
}
