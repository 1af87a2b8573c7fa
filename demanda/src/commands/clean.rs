// demanda/src/commands/clean.rs
//
// USE CASE: Remove generated artifacts.

use std::path::PathBuf;

use demanda_core::application::clean_output;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    if let Err(e) = clean_output(&project_dir) {
        eprintln!("❌ Clean failed: {e}");
        std::process::exit(1);
    }
    Ok(())
}
