// demanda-core/src/application/mod.rs

pub mod clean;
pub mod pipeline;
pub mod session;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI do `use demanda_core::application::{run_pipeline, clean_output};`
// without knowing the file layout.

pub use clean::clean_output;
pub use pipeline::{RunResult, run_pipeline};
pub use session::DashboardSession;
