// demanda-core/src/domain/cleaning/date.rs

use chrono::NaiveDate;

use crate::domain::record::FieldValue;

/// Canonical representation every recognized date is converted to (ISO 8601).
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// The supported input formats. Two-digit-year variants are listed before
/// their four-digit counterparts: `%Y` happily parses "25" as year 25, while
/// `%y` rejects four-digit years, so this order disambiguates both.
pub const SUPPORTED_FORMATS: [&str; 8] = [
    "%d/%m/%y", // 31/01/25
    "%d/%m/%Y", // 31/01/2025
    "%Y-%m-%d", // 2025-01-31 (canonical)
    "%d-%m-%Y", // 31-01-2025
    "%Y/%m/%d", // 2025/01/31
    "%d.%m.%y", // 31.01.25
    "%d.%m.%Y", // 31.01.2025
    "%Y.%m.%d", // 2025.01.31
];

pub struct DateNormalizer;

impl DateNormalizer {
    /// Try every supported format against the trimmed input.
    /// Returns `None` for unparseable strings and invalid calendar dates
    /// (chrono rejects 31/02/2024 at parse time).
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        SUPPORTED_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    }

    /// Normalize a raw cell: empty means missing, parse failure is flagged.
    pub fn normalize(raw: &str) -> FieldValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return FieldValue::Missing;
        }
        match Self::parse(trimmed) {
            Some(date) => FieldValue::Date(date),
            None => FieldValue::Invalid {
                raw: trimmed.to_string(),
            },
        }
    }
}
