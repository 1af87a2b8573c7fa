// demanda-core/src/domain/cleaning/rules.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;

/// Declarative cleaning/validation rules, loaded from YAML.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CleaningRules {
    /// Fields whose absence makes a record critically invalid.
    #[serde(default = "default_critical_fields")]
    pub critical_fields: Vec<String>,

    /// Allowed values per categorical column (e.g. banks, directors).
    #[validate(nested)]
    #[serde(default)]
    pub vocabularies: Vec<Vocabulary>,

    /// Known variant spelling -> canonical spelling.
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Minimum normalized similarity for auto-correcting a variant spelling.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    #[serde(default)]
    pub date_range: DateRange,

    /// Cross-field date-order rules (end must not precede start).
    #[serde(default)]
    pub consistency: Vec<DateOrderRule>,

    /// Share of dated records in a single month that counts as an anomaly.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_concentration_threshold")]
    pub temporal_concentration_threshold: f64,

    /// |z| above which a monetary value is reported as an outlier.
    #[serde(default = "default_outlier_threshold")]
    pub outlier_z_threshold: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct Vocabulary {
    #[validate(length(min = 1, message = "Vocabulary field name cannot be empty"))]
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    #[serde(default = "default_min_date")]
    pub min: NaiveDate,
    #[serde(default = "default_max_date")]
    pub max: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            min: default_min_date(),
            max: default_max_date(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DateOrderRule {
    pub start_field: String,
    pub end_field: String,
}

impl CleaningRules {
    /// Structural checks beyond what serde can express.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidRules(e.to_string()))?;
        if self.date_range.min > self.date_range.max {
            return Err(DomainError::InvalidDateRange {
                min: self.date_range.min.to_string(),
                max: self.date_range.max.to_string(),
            });
        }
        Ok(())
    }

    pub fn vocabulary_for(&self, field: &str) -> Option<&Vocabulary> {
        self.vocabularies
            .iter()
            .find(|v| v.field.eq_ignore_ascii_case(field))
    }
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            critical_fields: default_critical_fields(),
            vocabularies: vec![],
            aliases: HashMap::new(),
            similarity_threshold: default_similarity_threshold(),
            date_range: DateRange::default(),
            consistency: vec![],
            temporal_concentration_threshold: default_concentration_threshold(),
            outlier_z_threshold: default_outlier_threshold(),
        }
    }
}

fn default_critical_fields() -> Vec<String> {
    ["DATA", "RESPONSAVEL", "SITUACAO", "BANCO", "DIRETOR"]
        .map(String::from)
        .to_vec()
}

fn default_similarity_threshold() -> f64 {
    0.85
}

fn default_concentration_threshold() -> f64 {
    0.8
}

fn default_outlier_threshold() -> f64 {
    3.0
}

fn default_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or(NaiveDate::MAX)
}
