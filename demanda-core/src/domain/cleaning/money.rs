// demanda-core/src/domain/cleaning/money.rs

use regex::Regex;

use crate::domain::error::DomainError;
use crate::domain::record::FieldValue;

/// Normalizes monetary strings into a fixed-precision amount (2 decimals).
///
/// Handles both separator conventions seen in the wild:
/// `"R$ 1.234,56"` and `"1,234.56"` both resolve to `1234.56`.
pub struct MoneyNormalizer {
    symbols: Regex,
    grouped_dots: Regex,
    grouped_commas: Regex,
}

impl MoneyNormalizer {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            // Currency markers and whitespace are noise, the sign is not.
            symbols: Regex::new(r"(?i)(r\$|us\$|\$|€|\s)")
                .map_err(|e| DomainError::InvalidRules(format!("symbol regex: {e}")))?,
            // "1.234" / "12.345.678": dots as thousands grouping
            grouped_dots: Regex::new(r"^-?\d{1,3}(\.\d{3})+$")
                .map_err(|e| DomainError::InvalidRules(format!("grouping regex: {e}")))?,
            // "1,234" / "12,345,678": commas as thousands grouping
            grouped_commas: Regex::new(r"^-?\d{1,3}(,\d{3})+$")
                .map_err(|e| DomainError::InvalidRules(format!("grouping regex: {e}")))?,
        })
    }

    /// Parse a raw monetary string. `None` means unparseable (never zero).
    pub fn parse(&self, raw: &str) -> Option<f64> {
        let stripped = self.symbols.replace_all(raw, "").into_owned();
        if stripped.is_empty() {
            return None;
        }

        let unified = match (stripped.rfind('.'), stripped.rfind(',')) {
            // Both present: the rightmost one is the decimal separator.
            (Some(dot), Some(comma)) if comma > dot => {
                stripped.replace('.', "").replace(',', ".")
            }
            (Some(_), Some(_)) => stripped.replace(',', ""),
            // Comma only: grouping if it matches the 3-digit pattern, decimal otherwise.
            (None, Some(_)) => {
                if self.grouped_commas.is_match(&stripped) {
                    stripped.replace(',', "")
                } else {
                    stripped.replace(',', ".")
                }
            }
            // Dot only: same reasoning ("1.234" is pt-BR grouping, "1234.56" is decimal).
            (Some(_), None) => {
                if self.grouped_dots.is_match(&stripped) {
                    stripped.replace('.', "")
                } else {
                    stripped
                }
            }
            (None, None) => stripped,
        };

        unified.parse::<f64>().ok().map(round_cents)
    }

    /// Normalize a raw cell into a `Money` value or an explicit `Invalid` marker.
    pub fn normalize(&self, raw: &str) -> FieldValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return FieldValue::Missing;
        }
        match self.parse(trimmed) {
            Some(amount) => FieldValue::Money(amount),
            None => FieldValue::Invalid {
                raw: trimmed.to_string(),
            },
        }
    }

    /// Percentages share the separator logic, minus the `%` suffix.
    pub fn normalize_percent(&self, raw: &str) -> FieldValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return FieldValue::Missing;
        }
        match self.parse(trimmed.trim_end_matches('%')) {
            Some(pct) => FieldValue::Percent(pct),
            None => FieldValue::Invalid {
                raw: trimmed.to_string(),
            },
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
