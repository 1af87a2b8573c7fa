// demanda-core/src/domain/validation/mod.rs

pub mod result;
pub mod validator;

pub use result::{RecordStatus, RuleId, Severity, ValidationResult, Violation};
pub use validator::Validator;
