// demanda-core/src/application/pipeline.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::domain::cleaning::{CleanStats, Cleaner};
use crate::domain::record::Dataset;
use crate::domain::report::{QualityReport, ReportBuilder};
use crate::domain::validation::{ValidationResult, Validator};
use crate::error::PipelineError;
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::fs::atomic_write;
use crate::infrastructure::io::write_dataset;
use crate::ports::TableSource;

/// Bounded concurrency for table processing.
const MAX_PARALLEL_TABLES: usize = 4;

#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub tables_processed: usize,
    pub records_processed: usize,
    pub records_flagged: usize,
    pub errors: Vec<String>,
}

struct TableOutcome {
    dataset: Dataset,
    results: Vec<ValidationResult>,
    stats: CleanStats,
    new_values: BTreeMap<String, Vec<String>>,
}

/// Full run: read every table from the source, clean, validate, write the
/// cleaned datasets and the quality report under `output_dir`.
pub async fn run_pipeline(
    source: &dyn TableSource,
    config: &PipelineConfig,
    output_dir: &Path,
) -> Result<(RunResult, QualityReport), PipelineError> {
    println!("🚀 Starting cleaning pipeline...");
    let start_time = std::time::Instant::now();

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let cleaner = Cleaner::new(&config.rules)?;
    let validator = Validator::new(&config.rules);

    let tables = source.list_tables().await?;
    println!("📦 {} table(s) discovered", tables.len());

    let strict_mode = config.strict || std::env::var("DEMANDA_STRICT").is_ok();
    if strict_mode {
        println!("    🔒 Strict mode: ON (first table error aborts the run)");
    }

    // Tables are independent, so clean and validate them in parallel with
    // bounded concurrency. Report assembly stays sequential and ordered.
    let futures = tables.iter().map(|name| {
        let cleaner = &cleaner;
        let validator = &validator;
        async move {
            let outcome = process_table(source, cleaner, validator, name).await;
            (name.clone(), outcome)
        }
    });
    let outcomes: Vec<_> = futures::stream::iter(futures)
        .buffer_unordered(MAX_PARALLEL_TABLES)
        .collect()
        .await;

    let mut builder = ReportBuilder::new(&config.rules);
    let mut errors = Vec::new();
    let mut tables_processed = 0;
    let mut records_processed = 0;
    let mut records_flagged = 0;

    for (name, outcome) in outcomes {
        match outcome {
            Ok(outcome) => {
                let flagged = outcome.results.iter().filter(|r| !r.passed()).count();
                println!(
                    "    ✅ {}: {} record(s), {} flagged",
                    name,
                    outcome.dataset.len(),
                    flagged
                );

                let out_path = output_dir.join(format!("{name}_limpo.csv"));
                write_dataset(&out_path, &outcome.dataset, &outcome.results)?;

                tables_processed += 1;
                records_processed += outcome.dataset.len();
                records_flagged += flagged;
                builder.add_table(
                    &outcome.dataset,
                    &outcome.results,
                    &outcome.stats,
                    outcome.new_values,
                );
            }
            Err(e) => {
                eprintln!("    ❌ {name}: {e}");
                if strict_mode {
                    return Err(e);
                }
                errors.push(format!("{name}: {e}"));
            }
        }
    }

    // Completion order depends on `buffer_unordered`; sort so the run
    // artifact is stable across runs.
    errors.sort();

    let report = builder.finish();
    save_json(&output_dir.join("report.json"), &report)?;

    let duration = start_time.elapsed();
    println!(
        "✨ Done in {:.2}s. {} table(s), {} record(s), {} flagged.",
        duration.as_secs_f64(),
        tables_processed,
        records_processed,
        records_flagged
    );

    let result = RunResult {
        success: errors.is_empty(),
        tables_processed,
        records_processed,
        records_flagged,
        errors,
    };
    save_json(&output_dir.join("run_results.json"), &result)?;

    Ok((result, report))
}

async fn process_table(
    source: &dyn TableSource,
    cleaner: &Cleaner,
    validator: &Validator,
    name: &str,
) -> Result<TableOutcome, PipelineError> {
    let raw = source.read_table(name).await?;
    let (dataset, stats) = cleaner.clean_table(&raw)?;
    let results = validator.validate(&dataset);
    let new_values = validator.collect_new_values(&dataset);
    Ok(TableOutcome {
        dataset,
        results,
        stats,
        new_values,
    })
}

fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), PipelineError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| PipelineError::InternalError(format!("Serialization: {e}")))?;
    atomic_write(path, content)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::io::CsvTableStore;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_run_pipeline_end_to_end() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(
            data.join("demandas.csv"),
            "DATA,RESPONSAVEL,SITUACAO,BANCO,DIRETOR,VALOR\n\
             31/01/2025,JULIO,ABERTA,BRADESCO,MARCOS,\"R$ 1.234,56\"\n\
             31/02/2025,ANA,ABERTA,SANTANDER,MARCOS,\"100,00\"\n",
        )
        .unwrap();

        let source = CsvTableStore::new(&data, None);
        let config = PipelineConfig::default();
        let output = dir.path().join("output");

        let (result, report) = run_pipeline(&source, &config, &output).await.unwrap();
        assert!(result.success);
        assert_eq!(result.tables_processed, 1);
        assert_eq!(result.records_processed, 2);
        assert_eq!(result.records_flagged, 1);

        assert!(output.join("demandas_limpo.csv").exists());
        assert!(output.join("report.json").exists());
        assert!(output.join("run_results.json").exists());
        assert_eq!(report.tables["demandas"].status.critical, 1);
    }

    #[tokio::test]
    async fn test_report_is_deterministic_across_runs() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(
            data.join("a.csv"),
            "DATA,BANCO\n31/01/2025,BRADESCO\n01/02/2025,ITAU\n",
        )
        .unwrap();
        fs::write(data.join("b.csv"), "DATA,BANCO\n05/01/2025,BV\n").unwrap();

        let source = CsvTableStore::new(&data, None);
        let config = PipelineConfig::default();

        let out1 = dir.path().join("out1");
        let out2 = dir.path().join("out2");
        run_pipeline(&source, &config, &out1).await.unwrap();
        run_pipeline(&source, &config, &out2).await.unwrap();

        let parse = |p: &Path| -> serde_json::Value {
            let v: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(p.join("report.json")).unwrap()).unwrap();
            v["tables"].clone()
        };
        assert_eq!(parse(&out1), parse(&out2));
    }

    #[tokio::test]
    async fn test_unreadable_table_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("ok.csv"), "DATA,BANCO\n31/01/2025,BRADESCO\n").unwrap();
        // Headerless file: cleaning rejects it
        fs::write(data.join("vazio.csv"), "").unwrap();

        let source = CsvTableStore::new(&data, None);
        let config = PipelineConfig::default();
        let output = dir.path().join("output");

        let (result, _) = run_pipeline(&source, &config, &output).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.tables_processed, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("vazio"));
    }

    #[tokio::test]
    async fn test_run_errors_are_sorted_by_table_name() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        // Several broken tables: whichever finishes first, the artifact
        // must list them in name order.
        fs::write(data.join("zebra.csv"), "").unwrap();
        fs::write(data.join("alfa.csv"), "").unwrap();
        fs::write(data.join("meio.csv"), "").unwrap();

        let source = CsvTableStore::new(&data, None);
        let config = PipelineConfig::default();
        let output = dir.path().join("output");

        let (result, _) = run_pipeline(&source, &config, &output).await.unwrap();
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].starts_with("alfa"));
        assert!(result.errors[1].starts_with("meio"));
        assert!(result.errors[2].starts_with("zebra"));

        let on_disk: RunResult =
            serde_json::from_str(&fs::read_to_string(output.join("run_results.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk.errors, result.errors);
    }
}
