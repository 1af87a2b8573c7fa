// demanda/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "demanda")]
#[command(about = "Spreadsheet cleaning, validation and quality reporting", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the full pipeline (clean -> validate -> report)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Process a single CSV file instead of scanning the data directory
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// 🧹 Removes generated artifacts (output/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a CSV file (inferred column kinds + sample rows)
    Inspect {
        /// CSV file to inspect
        input: PathBuf,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// 📊 Shows per-team metrics for a cleaned table
    Dashboard {
        /// CSV file to load
        input: PathBuf,

        /// Period filter, "YYYY-MM"
        #[arg(long)]
        period: Option<String>,

        /// Team filter
        #[arg(long)]
        team: Option<String>,

        /// Also print the session debug panel as JSON
        #[arg(long)]
        debug: bool,
    },
}
