// demanda-core/src/domain/record.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One table as read from disk: untyped string cells, possibly ragged rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The semantic kind of a column, inferred from its header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Date,
    Money,
    Percent,
    Text,
}

const MONEY_MARKERS: [&str; 4] = ["VALOR", "VLR", "SALDO", "DESCONTO"];

impl FieldKind {
    /// Header-name heuristic: `DATA` means date, `VALOR`/`VLR`/`SALDO`/`DESCONTO`
    /// mean monetary, `%`/`PERCENTUAL` mean percentage, everything else is text.
    pub fn infer(header: &str) -> Self {
        let upper = header.to_uppercase();
        if upper.contains("DATA") {
            FieldKind::Date
        } else if MONEY_MARKERS.iter().any(|m| upper.contains(m)) {
            FieldKind::Money
        } else if upper.contains('%') || upper.contains("PERCENTUAL") {
            FieldKind::Percent
        } else {
            FieldKind::Text
        }
    }
}

/// A normalized cell. `Invalid` is the explicit error marker: a value that
/// failed normalization is never coerced to zero, empty or null.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Text(String),
    Date(NaiveDate),
    Money(f64),
    Percent(f64),
    Invalid { raw: String },
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValue::Invalid { .. })
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<f64> {
        match self {
            FieldValue::Money(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical string rendering, used when writing the cleaned dataset back.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Missing => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.format(super::cleaning::date::CANONICAL_FORMAT).to_string(),
            FieldValue::Money(v) => format!("{:.2}", v),
            FieldValue::Percent(v) => format!("{:.2}", v),
            FieldValue::Invalid { raw } => raw.clone(),
        }
    }
}

/// One cleaned row. `row` is the 1-based position in the source table,
/// kept stable so report entries can point back at the spreadsheet line.
#[derive(Debug, Clone)]
pub struct Record {
    pub row: usize,
    pub values: Vec<FieldValue>,
}

/// A cleaned table: headers, inferred kinds and records. Records are only
/// written during cleaning; validation and reporting read them immutably.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub kinds: Vec<FieldKind>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    pub fn value<'a>(&self, record: &'a Record, name: &str) -> Option<&'a FieldValue> {
        self.column(name).and_then(|idx| record.values.get(idx))
    }

    /// Indices of all columns of a given kind, in header order.
    pub fn columns_of_kind(&self, kind: FieldKind) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_inference_from_headers() {
        assert_eq!(FieldKind::infer("DATA"), FieldKind::Date);
        assert_eq!(FieldKind::infer("Data Resolução"), FieldKind::Date);
        assert_eq!(FieldKind::infer("VALOR DO CLIENTE"), FieldKind::Money);
        assert_eq!(FieldKind::infer("saldo devedor"), FieldKind::Money);
        assert_eq!(FieldKind::infer("DESCONTO"), FieldKind::Money);
        assert_eq!(FieldKind::infer("% APROVADO"), FieldKind::Percent);
        assert_eq!(FieldKind::infer("PERCENTUAL"), FieldKind::Percent);
        assert_eq!(FieldKind::infer("RESPONSAVEL"), FieldKind::Text);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let ds = Dataset {
            name: "t".into(),
            headers: vec!["DATA".into(), "BANCO".into()],
            kinds: vec![FieldKind::Date, FieldKind::Text],
            records: vec![],
        };
        assert_eq!(ds.column("banco"), Some(1));
        assert_eq!(ds.column("missing"), None);
    }

    #[test]
    fn test_render_round_trips_canonical_forms() {
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(date.render(), "2025-01-31");
        assert_eq!(FieldValue::Money(1234.56).render(), "1234.56");
        assert_eq!(FieldValue::Missing.render(), "");
        let bad = FieldValue::Invalid { raw: "31/02/2024".into() };
        assert_eq!(bad.render(), "31/02/2024");
    }
}
