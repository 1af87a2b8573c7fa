// demanda-core/src/domain/report/mod.rs

pub mod outlier;
pub mod quality;
pub mod temporal;

pub use outlier::AmountOutlier;
pub use quality::{QualityReport, ReportBuilder, StatusCounts, TableReport};
pub use temporal::TemporalSummary;
