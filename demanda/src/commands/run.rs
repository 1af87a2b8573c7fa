// demanda/src/commands/run.rs
//
// USE CASE: Run the cleaning pipeline.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};

use demanda_core::application::run_pipeline;
use demanda_core::domain::report::QualityReport;
use demanda_core::infrastructure::config::project::load_pipeline_config;
use demanda_core::infrastructure::io::{CsvTableStore, find_latest_input};

pub async fn execute(project_dir: PathBuf, input: Option<PathBuf>) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    println!("⚙️  Loading configuration...");
    let config = load_pipeline_config(&project_dir)
        .with_context(|| format!("Failed to load configuration from {project_dir:?}"))?;
    println!("   Project: {}", config.name);

    let source = match input {
        Some(path) => CsvTableStore::for_file(&path)
            .with_context(|| format!("Cannot read input file {path:?}"))?,
        None => {
            let data_dir = project_dir.join(&config.input_path);
            // Fail early with a useful message when there is nothing to do.
            let latest = find_latest_input(&data_dir, config.input_prefix.as_deref())
                .with_context(|| format!("No input found under {data_dir:?}"))?;
            println!(
                "   Scanning {} (newest: {})",
                data_dir.display(),
                latest.display()
            );
            CsvTableStore::new(&data_dir, config.input_prefix.clone())
        }
    };

    let output_dir = project_dir.join(&config.output_path);
    let result = run_pipeline(&source, &config, &output_dir).await;

    match result {
        Ok((run_res, report)) => {
            print_summary(&report);
            if run_res.success {
                println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
            } else {
                eprintln!("\n❌ FAILURE. {} table(s) failed.", run_res.errors.len());
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(report: &QualityReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Table", "Records", "OK", "Warning", "Critical", "Score",
    ]);
    for (name, t) in &report.tables {
        table.add_row(vec![
            name.clone(),
            t.total_records.to_string(),
            t.status.ok.to_string(),
            t.status.warning.to_string(),
            t.status.critical.to_string(),
            format!("{:.0}%", t.quality_score * 100.0),
        ]);
    }
    println!("\n{table}");

    for (name, t) in &report.tables {
        for rec in &t.recommendations {
            println!("   💡 [{name}] {rec}");
        }
    }
}
