// demanda/src/commands/inspect.rs
//
// USE CASE: Inspect a CSV file (inferred column kinds + sample rows).

use std::path::PathBuf;

use comfy_table::{Table, presets::UTF8_FULL};

use demanda_core::domain::cleaning::{Cleaner, CleaningRules};
use demanda_core::infrastructure::io::CsvTableStore;
use demanda_core::ports::TableSource;

pub async fn execute(input: PathBuf, limit: usize) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("❌ Input file not found: {}", input.display());
    }

    let source = CsvTableStore::for_file(&input)?;
    let tables = source.list_tables().await?;
    let Some(name) = tables.first() else {
        anyhow::bail!("❌ No table found in {}", input.display());
    };

    let raw = source.read_table(name).await?;
    let cleaner = Cleaner::new(&CleaningRules::default())?;
    let (dataset, stats) = cleaner.clean_table(&raw)?;

    println!("\n🔍 Inspecting: '{name}'");
    println!(
        "   {} record(s), {} duplicate(s) removed, {} column(s) dropped",
        dataset.len(),
        stats.duplicate_rows_removed,
        stats.dropped_columns.len()
    );

    let mut schema = Table::new();
    schema.load_preset(UTF8_FULL);
    schema.set_header(vec!["Column", "Kind"]);
    for (header, kind) in dataset.headers.iter().zip(&dataset.kinds) {
        schema.add_row(vec![header.clone(), format!("{kind:?}")]);
    }
    println!("{schema}");

    println!("   --- Rows (Limit {limit}) ---");
    for record in dataset.records.iter().take(limit) {
        let values: Vec<String> = record.values.iter().map(|v| v.render()).collect();
        println!("   ➜ {}", values.join(" | "));
    }

    Ok(())
}
