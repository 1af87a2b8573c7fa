// demanda-core/src/domain/report/temporal.rs

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Month-level distribution of the dated records in one table.
#[derive(Debug, Clone, Serialize)]
pub struct TemporalSummary {
    /// "YYYY-MM" -> record count, sorted chronologically.
    pub monthly: BTreeMap<String, usize>,
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub peak_month: String,
    /// Share of all dated records that fall in the peak month.
    pub peak_share: f64,
    /// Set when the peak share exceeds the configured concentration threshold.
    pub concentration_anomaly: bool,
}

/// Returns `None` when there are no parseable dates at all.
pub fn summarize(dates: &[NaiveDate], concentration_threshold: f64) -> Option<TemporalSummary> {
    let first = *dates.iter().min()?;
    let last = *dates.iter().max()?;

    let mut monthly: BTreeMap<String, usize> = BTreeMap::new();
    for date in dates {
        *monthly
            .entry(format!("{:04}-{:02}", date.year(), date.month()))
            .or_default() += 1;
    }

    // Ties resolve to the earliest month, BTreeMap iteration is ordered.
    let (peak_month, peak_count) = monthly
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(month, count)| (month.clone(), *count))?;
    let peak_share = peak_count as f64 / dates.len() as f64;

    Some(TemporalSummary {
        monthly,
        first,
        last,
        peak_month,
        peak_share,
        concentration_anomaly: peak_share > concentration_threshold,
    })
}
