// demanda-core/src/domain/cleaning/mod.rs

pub mod date;
pub mod money;
pub mod rules;
pub mod similarity;
pub mod text;

// Re-exports
pub use date::DateNormalizer;
pub use money::MoneyNormalizer;
pub use rules::{CleaningRules, DateOrderRule, DateRange, Vocabulary};
pub use text::{CanonicalMatch, TextNormalizer};

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::record::{Dataset, FieldKind, FieldValue, RawTable, Record};

/// A variant spelling that was close enough to a known value to auto-correct.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Correction {
    pub row: usize,
    pub field: String,
    pub from: String,
    pub to: String,
    pub similarity: f64,
}

/// What the cleaning pass did besides normalizing cells.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanStats {
    pub duplicate_rows_removed: usize,
    pub dropped_columns: Vec<String>,
    pub corrections: Vec<Correction>,
}

/// Applies per-field normalization to a raw table, producing a typed dataset.
/// Cleaning never drops a bad value: failures become `FieldValue::Invalid`
/// and are surfaced by the validator.
pub struct Cleaner {
    rules: CleaningRules,
    text: TextNormalizer,
    money: MoneyNormalizer,
}

/// Columns where almost every cell is blank carry no signal.
const EMPTY_COLUMN_THRESHOLD: f64 = 0.9;

impl Cleaner {
    pub fn new(rules: &CleaningRules) -> Result<Self, DomainError> {
        rules.check()?;
        Ok(Self {
            text: TextNormalizer::new(&rules.aliases, rules.similarity_threshold),
            money: MoneyNormalizer::new()?,
            rules: rules.clone(),
        })
    }

    pub fn rules(&self) -> &CleaningRules {
        &self.rules
    }

    pub fn clean_table(&self, raw: &RawTable) -> Result<(Dataset, CleanStats), DomainError> {
        if raw.headers.is_empty() {
            return Err(DomainError::HeaderlessTable(raw.name.clone()));
        }

        let mut stats = CleanStats::default();
        let headers = normalize_headers(&raw.headers);

        // Exact duplicate rows are dropped, first occurrence wins.
        // Row numbers stay anchored to the source file (header is line 1).
        let mut seen: HashSet<&[String]> = HashSet::new();
        let mut kept: Vec<(usize, &Vec<String>)> = Vec::with_capacity(raw.rows.len());
        for (idx, row) in raw.rows.iter().enumerate() {
            if seen.insert(row.as_slice()) {
                kept.push((idx + 2, row));
            } else {
                stats.duplicate_rows_removed += 1;
            }
        }

        // Drop columns that are blank in (almost) every kept row.
        let keep_column: Vec<bool> = (0..headers.len())
            .map(|col| {
                if kept.is_empty() {
                    return true;
                }
                let blank = kept
                    .iter()
                    .filter(|(_, row)| is_blank(row.get(col)))
                    .count();
                let frac = blank as f64 / kept.len() as f64;
                frac <= EMPTY_COLUMN_THRESHOLD
            })
            .collect();

        let mut final_headers = Vec::new();
        let mut kept_indices = Vec::new();
        for (col, header) in headers.iter().enumerate() {
            if keep_column[col] {
                kept_indices.push(col);
                final_headers.push(header.clone());
            } else {
                stats.dropped_columns.push(header.clone());
            }
        }

        let kinds: Vec<FieldKind> = final_headers.iter().map(|h| FieldKind::infer(h)).collect();

        let mut records = Vec::with_capacity(kept.len());
        for (row_no, row) in kept {
            let mut values = Vec::with_capacity(final_headers.len());
            for (out_col, &src_col) in kept_indices.iter().enumerate() {
                let cell = row.get(src_col).map(String::as_str).unwrap_or("");
                let value = self.clean_cell(cell, kinds[out_col]);
                let value = self.canonicalize_if_vocab(
                    value,
                    &final_headers[out_col],
                    row_no,
                    &mut stats,
                );
                values.push(value);
            }
            records.push(Record { row: row_no, values });
        }

        let dataset = Dataset {
            name: raw.name.clone(),
            headers: final_headers,
            kinds,
            records,
        };
        Ok((dataset, stats))
    }

    fn clean_cell(&self, cell: &str, kind: FieldKind) -> FieldValue {
        match kind {
            FieldKind::Date => DateNormalizer::normalize(cell),
            FieldKind::Money => self.money.normalize(cell),
            FieldKind::Percent => self.money.normalize_percent(cell),
            FieldKind::Text => self.text.normalize(cell),
        }
    }

    /// For columns with a configured vocabulary, auto-correct close variants.
    fn canonicalize_if_vocab(
        &self,
        value: FieldValue,
        field: &str,
        row: usize,
        stats: &mut CleanStats,
    ) -> FieldValue {
        let FieldValue::Text(current) = &value else {
            return value;
        };
        let Some(vocab) = self.rules.vocabulary_for(field) else {
            return value;
        };
        match self.text.canonicalize(current, &vocab.values) {
            CanonicalMatch::Corrected { canonical, score } => {
                stats.corrections.push(Correction {
                    row,
                    field: field.to_string(),
                    from: current.clone(),
                    to: canonical.clone(),
                    similarity: score,
                });
                FieldValue::Text(canonical)
            }
            // Known and Unknown both pass through; the validator flags Unknown.
            _ => value,
        }
    }
}

fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let collapsed = h.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
            if collapsed.is_empty() || collapsed.starts_with("UNNAMED") {
                format!("COLUNA_{i}")
            } else {
                collapsed
            }
        })
        .collect()
}

fn is_blank(cell: Option<&String>) -> bool {
    match cell {
        None => true,
        Some(s) => {
            let t = s.trim();
            t.is_empty() || t.eq_ignore_ascii_case("nan")
        }
    }
}
