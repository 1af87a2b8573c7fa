// demanda-core/src/application/session.rs

use crate::domain::cleaning::{CleaningRules, Cleaner};
use crate::domain::record::Dataset;
use crate::domain::session::{
    self, DebugPanel, FilterState, SessionMonitor, SessionStatus, TeamMetrics,
};
use crate::error::PipelineError;
use crate::ports::{MemoryProbe, TableSource};

/// An interactive viewing session over one cleaned table: filters, per-team
/// metrics and the debug panel. Errors during loading are recorded in the
/// monitor rather than tearing the session down.
pub struct DashboardSession<P: MemoryProbe> {
    dataset: Option<Dataset>,
    filters: FilterState,
    monitor: SessionMonitor,
    probe: P,
}

impl<P: MemoryProbe> DashboardSession<P> {
    pub fn new(probe: P) -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            monitor: SessionMonitor::new(),
            probe,
        }
    }

    pub async fn load(
        &mut self,
        source: &dyn TableSource,
        table: &str,
        rules: &CleaningRules,
    ) -> Result<(), PipelineError> {
        self.monitor.set_status(SessionStatus::Processing);

        let loaded: Result<Dataset, PipelineError> = async {
            let raw = source.read_table(table).await?;
            let cleaner = Cleaner::new(rules)?;
            let (dataset, _) = cleaner.clean_table(&raw)?;
            Ok(dataset)
        }
        .await;

        match loaded {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.monitor.set_status(SessionStatus::Completed);
                Ok(())
            }
            Err(e) => {
                self.monitor.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Metrics over the records matching the current filters. An empty
    /// aggregation when nothing is loaded.
    pub fn metrics(&self) -> TeamMetrics {
        match &self.dataset {
            Some(dataset) => session::compute_metrics(dataset, &self.filters),
            None => TeamMetrics::default(),
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn debug_panel(&self) -> DebugPanel {
        self.monitor.debug_panel(self.probe.resident_bytes())
    }

    pub fn system_warnings(&self) -> Vec<String> {
        self.monitor.system_warnings(self.probe.resident_bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::io::CsvTableStore;
    use std::fs;
    use tempfile::tempdir;

    struct FixedProbe(u64);
    impl MemoryProbe for FixedProbe {
        fn resident_bytes(&self) -> u64 {
            self.0
        }
    }

    #[tokio::test]
    async fn test_load_filter_and_panel() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("demandas.csv"),
            "DATA,VALOR,EQUIPE\n05/01/2025,\"100,00\",NORTE\n10/02/2025,\"50,00\",SUL\n",
        )
        .unwrap();

        let source = CsvTableStore::new(dir.path(), None);
        let mut session = DashboardSession::new(FixedProbe(64 * 1024 * 1024));
        session
            .load(&source, "demandas", &CleaningRules::default())
            .await
            .unwrap();

        assert_eq!(session.metrics().total_records, 2);

        session.set_filters(FilterState {
            period: Some("2025-01".into()),
            team: None,
        });
        let metrics = session.metrics();
        assert_eq!(metrics.total_records, 1);
        assert_eq!(metrics.teams["NORTE"].records, 1);

        let panel = session.debug_panel();
        assert_eq!(panel.status, SessionStatus::Completed);
        assert_eq!(panel.error_count, 0);
        assert_eq!(panel.memory_usage, "64.0MB");
        assert!(session.system_warnings().is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_lands_in_monitor() {
        let dir = tempdir().unwrap();
        let source = CsvTableStore::new(dir.path(), None);
        let mut session = DashboardSession::new(FixedProbe(0));

        let res = session
            .load(&source, "missing", &CleaningRules::default())
            .await;
        assert!(res.is_err());

        let panel = session.debug_panel();
        assert_eq!(panel.status, SessionStatus::Error);
        assert_eq!(panel.error_count, 1);
        assert!(panel.last_error.is_some());
    }

    #[tokio::test]
    async fn test_memory_pressure_warning() {
        let session = DashboardSession::new(FixedProbe(600 * 1024 * 1024));
        let warnings = session.system_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("memory"));
    }
}
