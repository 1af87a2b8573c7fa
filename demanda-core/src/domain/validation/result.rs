// demanda-core/src/domain/validation/result.rs

use serde::Serialize;

/// Stable identifiers for the business rules a record can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    MissingCritical,
    DateInvalid,
    DateOutOfRange,
    AmountInvalid,
    UnknownValue,
    InconsistentDates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Violation {
    pub rule: RuleId,
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn warning(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn critical(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Critical,
            message: message.into(),
        }
    }
}

/// Aggregate status of one record after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordStatus {
    Ok,
    Warning,
    Critical,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "OK",
            RecordStatus::Warning => "WARNING",
            RecordStatus::Critical => "CRITICAL",
        }
    }
}

/// Per-record outcome: pass, or the set of violated rules.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub row: usize,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn status(&self) -> RecordStatus {
        if self.violations.is_empty() {
            RecordStatus::Ok
        } else if self
            .violations
            .iter()
            .any(|v| v.severity == Severity::Critical)
        {
            RecordStatus::Critical
        } else {
            RecordStatus::Warning
        }
    }

    /// Semi-colon joined messages, written into the cleaned dataset's
    /// PROBLEMAS column.
    pub fn summary(&self) -> String {
        if self.violations.is_empty() {
            return "OK".to_string();
        }
        self.violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
