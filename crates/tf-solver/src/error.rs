//! Error types for tf-solver

use thiserror::Error;

/// Solver errors. The absence of a plan is not an error (the result is
/// simply empty); only invalid inputs are reported.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The goal type is not declared in the catalog
    #[error("unknown goal type: {name}")]
    UnknownGoalType { name: String },

    /// A source type is not declared in the catalog
    #[error("unknown source type: {name}")]
    UnknownSourceType { name: String },
}

/// Result type alias for SolverError
pub type SolverResult<T> = Result<T, SolverError>;
