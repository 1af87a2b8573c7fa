// demanda-core/src/domain/mod.rs

pub mod cleaning;
pub mod error;
pub mod record;
pub mod report;
pub mod session;
pub mod validation;

// Re-exports to simplify imports elsewhere
pub use error::DomainError;
