// demanda/src/commands/dashboard.rs
//
// USE CASE: Per-team metrics over one table, with the session debug panel.

use std::path::PathBuf;

use comfy_table::{Table, presets::UTF8_FULL};

use demanda_core::application::DashboardSession;
use demanda_core::domain::cleaning::CleaningRules;
use demanda_core::domain::session::FilterState;
use demanda_core::infrastructure::io::CsvTableStore;
use demanda_core::infrastructure::memory::ProcfsMemoryProbe;
use demanda_core::ports::TableSource;

pub async fn execute(
    input: PathBuf,
    period: Option<String>,
    team: Option<String>,
    debug: bool,
) -> anyhow::Result<()> {
    let source = CsvTableStore::for_file(&input)?;
    let tables = source.list_tables().await?;
    let Some(name) = tables.first() else {
        anyhow::bail!("❌ No table found in {}", input.display());
    };

    let mut session = DashboardSession::new(ProcfsMemoryProbe);
    let load_result = session
        .load(&source, name, &CleaningRules::default())
        .await;

    // The panel is printed even when loading failed, that is its whole point.
    if let Err(e) = &load_result {
        eprintln!("❌ Failed to load {}: {e}", input.display());
    } else {
        session.set_filters(FilterState { period, team });
        let metrics = session.metrics();

        println!("\n📊 Dashboard: '{name}'");
        if session.filters().period.is_some() || session.filters().team.is_some() {
            println!(
                "   Filters: period={} team={}",
                session.filters().period.as_deref().unwrap_or("*"),
                session.filters().team.as_deref().unwrap_or("*")
            );
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Team", "Records", "Total amount"]);
        for (team, stat) in &metrics.teams {
            table.add_row(vec![
                team.clone(),
                stat.records.to_string(),
                format!("{:.2}", stat.total_amount),
            ]);
        }
        println!("{table}");
        println!("   {} record(s) after filters", metrics.total_records);
    }

    for warning in session.system_warnings() {
        eprintln!("⚠️  {warning}");
    }

    if debug {
        let panel = session.debug_panel();
        println!("{}", serde_json::to_string_pretty(&panel)?);
    }

    if load_result.is_err() && !debug {
        std::process::exit(1);
    }
    Ok(())
}
