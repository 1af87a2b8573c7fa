// demanda-core/src/infrastructure/io/mod.rs

pub mod csv;
pub mod discover;

pub use csv::{CsvTableStore, write_dataset};
pub use discover::find_latest_input;
