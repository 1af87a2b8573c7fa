// demanda-core/src/ports/source.rs

// Contracts the application layer depends on, with no knowledge of how they
// are fulfilled. The CSV store and the procfs probe are just the adapters we
// happen to ship.

use crate::domain::record::RawTable;
use crate::error::PipelineError;
use async_trait::async_trait;

#[async_trait]
pub trait TableSource: Send + Sync {
    /// Logical table names available from this source, sorted.
    async fn list_tables(&self) -> Result<Vec<String>, PipelineError>;

    /// Reads one table as untyped rows; cleaning happens downstream.
    async fn read_table(&self, name: &str) -> Result<RawTable, PipelineError>;
}

/// Where the dashboard gets its memory reading from.
pub trait MemoryProbe: Send + Sync {
    /// Current resident set size in bytes, 0 when unknown.
    fn resident_bytes(&self) -> u64;
}
