// demanda-core/src/infrastructure/io/csv.rs

use std::fs::File;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::record::{Dataset, RawTable};
use crate::domain::validation::ValidationResult;
use crate::error::PipelineError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::TableSource;

/// CSV-backed table source. Each `.csv` file under the root directory is one
/// logical table, named after its file stem.
pub struct CsvTableStore {
    root: PathBuf,
    /// When scanning a directory, only file names starting with this prefix.
    prefix: Option<String>,
}

impl CsvTableStore {
    pub fn new(root: impl Into<PathBuf>, prefix: Option<String>) -> Self {
        Self {
            root: root.into(),
            prefix,
        }
    }

    /// Single-file mode: the store exposes exactly one table.
    pub fn for_file(path: &Path) -> Result<Self, InfrastructureError> {
        if !path.is_file() {
            return Err(InfrastructureError::InputNotFound(
                path.display().to_string(),
            ));
        }
        let root = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let prefix = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        Ok(Self { root, prefix })
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.csv"))
    }

    fn read_table_sync(&self, name: &str) -> Result<RawTable, InfrastructureError> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Err(InfrastructureError::InputNotFound(
                path.display().to_string(),
            ));
        }
        debug!(path = ?path, "Reading table");

        // Headers are handled by hand so ragged rows survive until cleaning.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(File::open(&path)?);

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(first) => first?.iter().map(str::to_string).collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(RawTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }
}

#[async_trait]
impl TableSource for CsvTableStore {
    async fn list_tables(&self) -> Result<Vec<String>, PipelineError> {
        if !self.root.is_dir() {
            return Err(InfrastructureError::InputNotFound(
                self.root.display().to_string(),
            )
            .into());
        }
        let mut tables = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(InfrastructureError::Io)? {
            let entry = entry.map_err(InfrastructureError::Io)?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "csv") {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(prefix) = &self.prefix
                && !stem.starts_with(prefix.as_str())
            {
                continue;
            }
            tables.push(stem);
        }
        tables.sort();
        Ok(tables)
    }

    async fn read_table(&self, name: &str) -> Result<RawTable, PipelineError> {
        Ok(self.read_table_sync(name)?)
    }
}

/// Writes the cleaned dataset back out as CSV, with STATUS and PROBLEMAS
/// columns appended so reviewers see each record's verdict inline.
pub fn write_dataset(
    path: &Path,
    dataset: &Dataset,
    results: &[ValidationResult],
) -> Result<(), InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header_row: Vec<&str> = dataset.headers.iter().map(String::as_str).collect();
    header_row.push("STATUS");
    header_row.push("PROBLEMAS");
    writer.write_record(&header_row)?;

    for (record, result) in dataset.records.iter().zip(results) {
        let mut row: Vec<String> = record.values.iter().map(|v| v.render()).collect();
        row.push(result.status().as_str().to_string());
        row.push(result.summary());
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))?;
    atomic_write(path, bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::cleaning::{Cleaner, CleaningRules};
    use crate::domain::validation::Validator;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_lists_and_reads_csv_tables() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("demandas_2025.csv"),
            "DATA,BANCO\n31/01/2025,BRADESCO\n",
        )
        .unwrap();
        fs::write(dir.path().join("notas.txt"), "ignored").unwrap();

        let store = CsvTableStore::new(dir.path(), None);
        assert_eq!(store.list_tables().await.unwrap(), vec!["demandas_2025"]);

        let raw = store.read_table("demandas_2025").await.unwrap();
        assert_eq!(raw.headers, vec!["DATA", "BANCO"]);
        assert_eq!(raw.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_prefix_filters_tables() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("demandas_jan.csv"), "A\n1\n").unwrap();
        fs::write(dir.path().join("backup_jan.csv"), "A\n1\n").unwrap();

        let store = CsvTableStore::new(dir.path(), Some("demandas".into()));
        assert_eq!(store.list_tables().await.unwrap(), vec!["demandas_jan"]);
    }

    #[tokio::test]
    async fn test_missing_table_is_an_error() {
        let dir = tempdir().unwrap();
        let store = CsvTableStore::new(dir.path(), None);
        assert!(store.read_table("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_ragged_rows_are_preserved_for_cleaning() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("t.csv"),
            "DATA,BANCO,EXTRA\n31/01/2025,BRADESCO\n",
        )
        .unwrap();
        let store = CsvTableStore::new(dir.path(), None);
        let raw = store.read_table("t").await.unwrap();
        assert_eq!(raw.rows[0].len(), 2);
    }

    #[test]
    fn test_write_dataset_appends_verdict_columns() {
        let dir = tempdir().unwrap();
        let rules = CleaningRules::default();
        let cleaner = Cleaner::new(&rules).unwrap();
        let raw = RawTable {
            name: "t".into(),
            headers: vec!["DATA".into(), "RESPONSAVEL".into()],
            rows: vec![vec!["31/01/2025".into(), "JULIO".into()]],
        };
        let (ds, _) = cleaner.clean_table(&raw).unwrap();
        let results = Validator::new(&rules).validate(&ds);

        let out = dir.path().join("t_clean.csv");
        write_dataset(&out, &ds, &results).unwrap();

        let content = fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("DATA,RESPONSAVEL,STATUS,PROBLEMAS"));
        assert!(content.contains("2025-01-31"));
    }
}
