//! Error types for the carbon accounting core.
//!
//! Every variant is local to a single calculation and recoverable at the
//! call site. Batch helpers turn them into [`crate::models::BatchFailure`]
//! entries instead of aborting.

/// Main engine error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A consumption quantity was negative or not a finite number
    #[error("invalid consumption for `{field}`: {reason}")]
    InvalidConsumption { field: String, reason: String },

    /// The region key is not registered
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// Baseline equals target, dates are malformed, or values are not finite
    #[error("invalid target `{name}`: {reason}")]
    InvalidTargetDefinition { name: String, reason: String },

    /// A normalising divisor (employees, revenue) was zero or negative
    #[error("division by zero: {quantity} must be greater than zero")]
    DivisionByZero { quantity: &'static str },

    /// An assessed E/S/G score fell outside 0..=100
    #[error("invalid {dimension} score: {value}")]
    InvalidScore { dimension: &'static str, value: f64 },

    /// Engine configuration could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A custom emission factor table failed validation
    #[error("invalid emission factor table: {0}")]
    FactorTable(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
