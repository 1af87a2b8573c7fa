// demanda-core/src/domain/report/quality.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::cleaning::{CleanStats, CleaningRules, Correction};
use crate::domain::record::{Dataset, FieldKind, FieldValue};
use crate::domain::report::outlier::{self, AmountOutlier};
use crate::domain::report::temporal::{self, TemporalSummary};
use crate::domain::validation::{RecordStatus, ValidationResult};

/// Only the most frequent problems and values make the report.
const TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub generated_at: DateTime<Utc>,
    pub similarity_threshold: f64,
    pub critical_fields: Vec<String>,
}

/// The full quality report for one pipeline run, one entry per input table.
/// Everything inside is deterministically ordered so two runs over the same
/// input produce byte-identical JSON (modulo `generated_at`).
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub meta: ReportMeta,
    pub tables: BTreeMap<String, TableReport>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProblemCount {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub total_records: usize,
    pub status: StatusCounts,
    /// (ok + 0.5 * warning) / total, in [0, 1]. 1.0 for an empty table.
    pub quality_score: f64,
    /// Per-column share of non-missing cells.
    pub completeness: BTreeMap<String, f64>,
    pub frequent_problems: Vec<ProblemCount>,
    /// Top value counts per categorical column.
    pub distributions: BTreeMap<String, Vec<ValueCount>>,
    pub temporal: Option<TemporalSummary>,
    pub outliers: Vec<AmountOutlier>,
    /// Unrecognized categorical values, per field, awaiting manual review.
    pub new_values: BTreeMap<String, Vec<String>>,
    pub corrections: Vec<Correction>,
    pub duplicate_rows_removed: usize,
    pub dropped_columns: Vec<String>,
    pub recommendations: Vec<String>,
}

pub struct ReportBuilder {
    rules: CleaningRules,
    tables: BTreeMap<String, TableReport>,
}

impl ReportBuilder {
    pub fn new(rules: &CleaningRules) -> Self {
        Self {
            rules: rules.clone(),
            tables: BTreeMap::new(),
        }
    }

    pub fn add_table(
        &mut self,
        dataset: &Dataset,
        results: &[ValidationResult],
        stats: &CleanStats,
        new_values: BTreeMap<String, Vec<String>>,
    ) {
        let report = self.build_table_report(dataset, results, stats, new_values);
        self.tables.insert(dataset.name.clone(), report);
    }

    pub fn finish(self) -> QualityReport {
        QualityReport {
            meta: ReportMeta {
                generated_at: Utc::now(),
                similarity_threshold: self.rules.similarity_threshold,
                critical_fields: self.rules.critical_fields.clone(),
            },
            tables: self.tables,
        }
    }

    fn build_table_report(
        &self,
        dataset: &Dataset,
        results: &[ValidationResult],
        stats: &CleanStats,
        new_values: BTreeMap<String, Vec<String>>,
    ) -> TableReport {
        let mut status = StatusCounts::default();
        for result in results {
            match result.status() {
                RecordStatus::Ok => status.ok += 1,
                RecordStatus::Warning => status.warning += 1,
                RecordStatus::Critical => status.critical += 1,
            }
        }

        let total = dataset.len();
        let quality_score = if total == 0 {
            1.0
        } else {
            (status.ok as f64 + 0.5 * status.warning as f64) / total as f64
        };

        let temporal = self.temporal_summary(dataset);
        let outliers = self.amount_outliers(dataset);
        let frequent_problems = frequent_problems(results);
        let completeness = completeness(dataset);
        let distributions = distributions(dataset);

        let recommendations = recommendations(
            quality_score,
            &status,
            &new_values,
            temporal.as_ref(),
            &outliers,
            stats,
        );

        TableReport {
            total_records: total,
            status,
            quality_score,
            completeness,
            frequent_problems,
            distributions,
            temporal,
            outliers,
            new_values,
            corrections: stats.corrections.clone(),
            duplicate_rows_removed: stats.duplicate_rows_removed,
            dropped_columns: stats.dropped_columns.clone(),
            recommendations,
        }
    }

    fn temporal_summary(&self, dataset: &Dataset) -> Option<TemporalSummary> {
        let dates: Vec<_> = dataset
            .columns_of_kind(FieldKind::Date)
            .into_iter()
            .flat_map(|col| {
                dataset
                    .records
                    .iter()
                    .filter_map(move |r| r.values.get(col).and_then(FieldValue::as_date))
            })
            .collect();
        temporal::summarize(&dates, self.rules.temporal_concentration_threshold)
    }

    fn amount_outliers(&self, dataset: &Dataset) -> Vec<AmountOutlier> {
        let mut outliers = Vec::new();
        for col in dataset.columns_of_kind(FieldKind::Money) {
            let samples: Vec<(usize, f64)> = dataset
                .records
                .iter()
                .filter_map(|r| {
                    r.values
                        .get(col)
                        .and_then(FieldValue::as_money)
                        .map(|v| (r.row, v))
                })
                .collect();
            outliers.extend(outlier::detect_outliers(
                &dataset.headers[col],
                &samples,
                self.rules.outlier_z_threshold,
            ));
        }
        outliers.sort_by(|a, b| a.row.cmp(&b.row).then(a.field.cmp(&b.field)));
        outliers
    }
}

fn completeness(dataset: &Dataset) -> BTreeMap<String, f64> {
    let total = dataset.len();
    dataset
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let filled = dataset
                .records
                .iter()
                .filter(|r| r.values.get(col).is_some_and(|v| !v.is_missing()))
                .count();
            let share = if total == 0 {
                1.0
            } else {
                filled as f64 / total as f64
            };
            (header.clone(), share)
        })
        .collect()
}

fn frequent_problems(results: &[ValidationResult]) -> Vec<ProblemCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for result in results {
        for violation in &result.violations {
            *counts.entry(violation.message.as_str()).or_default() += 1;
        }
    }
    let mut problems: Vec<ProblemCount> = counts
        .into_iter()
        .map(|(message, count)| ProblemCount {
            message: message.to_string(),
            count,
        })
        .collect();
    problems.sort_by(|a, b| b.count.cmp(&a.count).then(a.message.cmp(&b.message)));
    problems.truncate(TOP_N);
    problems
}

fn distributions(dataset: &Dataset) -> BTreeMap<String, Vec<ValueCount>> {
    let mut out = BTreeMap::new();
    for col in dataset.columns_of_kind(FieldKind::Text) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &dataset.records {
            if let Some(FieldValue::Text(value)) = record.values.get(col) {
                *counts.entry(value.as_str()).or_default() += 1;
            }
        }
        if counts.is_empty() {
            continue;
        }
        let mut values: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));
        values.truncate(TOP_N);
        out.insert(dataset.headers[col].clone(), values);
    }
    out
}

/// Actionable notes for whoever owns the spreadsheet, worst problems first.
fn recommendations(
    quality_score: f64,
    status: &StatusCounts,
    new_values: &BTreeMap<String, Vec<String>>,
    temporal: Option<&TemporalSummary>,
    outliers: &[AmountOutlier],
    stats: &CleanStats,
) -> Vec<String> {
    let mut recs = Vec::new();
    if status.critical > 0 {
        recs.push(format!(
            "{} record(s) have critical problems and need correction at the source",
            status.critical
        ));
    }
    if quality_score < 0.7 {
        recs.push(format!(
            "Overall quality score is low ({:.0}%); review data entry practices",
            quality_score * 100.0
        ));
    }
    for (field, values) in new_values {
        recs.push(format!(
            "{field}: {} unrecognized value(s) pending manual review ({})",
            values.len(),
            values.join(", ")
        ));
    }
    if let Some(t) = temporal
        && t.concentration_anomaly
    {
        recs.push(format!(
            "{:.0}% of dated records fall in {}; check for backdated or bulk-entered rows",
            t.peak_share * 100.0,
            t.peak_month
        ));
    }
    if !outliers.is_empty() {
        recs.push(format!(
            "{} monetary value(s) deviate strongly from their column; verify the amounts",
            outliers.len()
        ));
    }
    if stats.duplicate_rows_removed > 0 {
        recs.push(format!(
            "{} exact duplicate row(s) were removed; check for double entry",
            stats.duplicate_rows_removed
        ));
    }
    recs
}
