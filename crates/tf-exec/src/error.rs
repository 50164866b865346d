//! Error types for tf-exec

use tf_core::CoreError;
use tf_expr::EvalError;
use thiserror::Error;

/// Execution errors, each naming the function at fault. The first error
/// terminates the evaluation; there are no retries and no partial
/// results.
#[derive(Error, Debug)]
pub enum ExecError {
    /// A leaf demanded a context binding that is not present
    #[error("missing source binding: {name}")]
    MissingSourceBinding { name: String },

    /// An expression failed inside a formula, json, or template binding
    #[error("function {function}: {source}")]
    Expression {
        function: String,
        #[source]
        source: EvalError,
    },

    /// Template rendering failed (for example an unknown placeholder)
    #[error("function {function}: template error: {message}")]
    Template { function: String, message: String },

    /// A builtin aggregate received unusable input
    #[error("function {function}: {message}")]
    Builtin { function: String, message: String },

    /// A registered external resolver failed
    #[error("function {function}: resolver error: {message}")]
    Resolver { function: String, message: String },

    /// A produced value cannot be represented (for example non-finite
    /// numbers in JSON output)
    #[error("function {function}: invalid result: {message}")]
    BadResult { function: String, message: String },

    /// Schedule construction failed
    #[error(transparent)]
    Schedule(#[from] CoreError),
}

/// Result type alias for ExecError
pub type ExecResult<T> = Result<T, ExecError>;
