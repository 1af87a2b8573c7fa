// demanda-core/src/domain/session.rs

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::Datelike;
use serde::Serialize;

use crate::domain::record::{Dataset, FieldKind, FieldValue, Record};

/// Column names accepted for the team filter, checked in order.
const TEAM_COLUMNS: [&str; 4] = ["EQUIPE", "Equipe", "TEAM", "Team"];
const PERIOD_COLUMN: &str = "PERIODO";

/// Resident-set size above which the session warns about memory pressure.
const MEMORY_WARN_BYTES: u64 = 500 * 1024 * 1024;
/// Session age above which a restart is suggested.
const UPTIME_WARN: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Idle,
    Processing,
    Completed,
    Error,
    Pending,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "IDLE",
            SessionStatus::Processing => "PROCESSING",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Error => "ERROR",
            SessionStatus::Pending => "PENDING",
        }
    }
}

/// Active dashboard filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// "YYYY-MM" period, matched against the PERIODO column when present,
    /// otherwise against the month of the first date column.
    pub period: Option<String>,
    pub team: Option<String>,
}

/// Snapshot shown in the dashboard's debug panel.
#[derive(Debug, Clone, Serialize)]
pub struct DebugPanel {
    /// e.g. "12.3s"
    pub uptime: String,
    pub error_count: usize,
    /// e.g. "48.1MB"
    pub memory_usage: String,
    pub status: SessionStatus,
    pub last_error: Option<String>,
}

/// Tracks session health: uptime, status transitions and the error trail.
pub struct SessionMonitor {
    started: Instant,
    status: SessionStatus,
    error_count: usize,
    last_error: Option<String>,
}

impl Default for SessionMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMonitor {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            status: SessionStatus::Idle,
            error_count: 0,
            last_error: None,
        }
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error_count += 1;
        self.last_error = Some(message.into());
        self.status = SessionStatus::Error;
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn debug_panel(&self, resident_bytes: u64) -> DebugPanel {
        DebugPanel {
            uptime: format!("{:.1}s", self.uptime().as_secs_f64()),
            error_count: self.error_count,
            memory_usage: format!("{:.1}MB", resident_bytes as f64 / (1024.0 * 1024.0)),
            status: self.status,
            last_error: self.last_error.clone(),
        }
    }

    /// Health warnings worth surfacing to the user, empty when all is well.
    pub fn system_warnings(&self, resident_bytes: u64) -> Vec<String> {
        let mut warnings = Vec::new();
        if resident_bytes > MEMORY_WARN_BYTES {
            warnings.push(format!(
                "High memory usage: {:.1}MB",
                resident_bytes as f64 / (1024.0 * 1024.0)
            ));
        }
        if self.uptime() > UPTIME_WARN {
            warnings.push(format!(
                "Session has been running for {:.0} minutes; consider restarting",
                self.uptime().as_secs_f64() / 60.0
            ));
        }
        warnings
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TeamStat {
    pub records: usize,
    pub total_amount: f64,
}

/// Per-team aggregation over the currently filtered records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamMetrics {
    pub total_records: usize,
    pub teams: BTreeMap<String, TeamStat>,
}

pub fn compute_metrics(dataset: &Dataset, filters: &FilterState) -> TeamMetrics {
    let team_col = TEAM_COLUMNS.iter().find_map(|name| dataset.column(name));
    let period_col = dataset.column(PERIOD_COLUMN);
    let date_col = dataset.columns_of_kind(FieldKind::Date).into_iter().next();
    let money_col = dataset.columns_of_kind(FieldKind::Money).into_iter().next();

    let mut metrics = TeamMetrics::default();
    for record in &dataset.records {
        if !matches_period(record, filters, period_col, date_col) {
            continue;
        }
        let team = team_col
            .and_then(|col| record.values.get(col))
            .and_then(FieldValue::as_text)
            .unwrap_or("SEM EQUIPE");
        if let Some(wanted) = &filters.team
            && !team.eq_ignore_ascii_case(wanted)
        {
            continue;
        }

        metrics.total_records += 1;
        let stat = metrics.teams.entry(team.to_string()).or_default();
        stat.records += 1;
        if let Some(amount) = money_col
            .and_then(|col| record.values.get(col))
            .and_then(FieldValue::as_money)
        {
            stat.total_amount += amount;
        }
    }
    metrics
}

fn matches_period(
    record: &Record,
    filters: &FilterState,
    period_col: Option<usize>,
    date_col: Option<usize>,
) -> bool {
    let Some(wanted) = &filters.period else {
        return true;
    };
    if let Some(col) = period_col {
        return record
            .values
            .get(col)
            .and_then(FieldValue::as_text)
            .is_some_and(|p| p.eq_ignore_ascii_case(wanted));
    }
    if let Some(col) = date_col {
        return record
            .values
            .get(col)
            .and_then(FieldValue::as_date)
            .is_some_and(|d| format!("{:04}-{:02}", d.year(), d.month()) == *wanted);
    }
    // No period information at all: the filter cannot match anything.
    false
}
