//! Error types for tf-core

use thiserror::Error;

/// Core error type for Typeflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// Duplicate type name in a catalog
    #[error("Duplicate type name: {name}")]
    DuplicateType { name: String },

    /// A reference to a type that was never declared
    #[error("Undeclared type: {name} (referenced by {referrer})")]
    UndeclaredType { name: String, referrer: String },

    /// A function with an empty domain
    #[error("Function {name} has an empty domain")]
    EmptyDomain { name: String },

    /// A cost or confidence outside its allowed range
    #[error("Invalid {field} for function {name}: {value}")]
    InvalidWeight {
        name: String,
        field: &'static str,
        value: f64,
    },

    /// A value that cannot be represented in the runtime value model
    #[error("Unsupported value: {message}")]
    UnsupportedValue { message: String },

    /// A solution plan that is not a DAG
    #[error("Cyclic solution plan: {cycle}")]
    CyclicPlan { cycle: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
