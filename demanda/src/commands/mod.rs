// demanda/src/commands/mod.rs

pub mod clean;
pub mod dashboard;
pub mod inspect;
pub mod run;
