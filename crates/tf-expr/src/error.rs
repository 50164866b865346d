//! Error types for tf-expr

use thiserror::Error;

/// The underlying cause of an expression failure.
#[derive(Error, Debug, PartialEq)]
pub enum EvalCause {
    /// Lexing or parsing failed
    #[error("syntax error: {0}")]
    Syntax(String),

    /// An identifier not bound in the scope
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    /// A call to a function outside the whitelist
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// An operation applied to values of the wrong kind
    #[error("type error: {0}")]
    Type(String),

    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// A record access with a missing key
    #[error("missing key '{0}'")]
    MissingKey(String),

    /// A sequence index outside the valid range
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    /// A whitelisted function called with the wrong number of arguments
    #[error("wrong number of arguments to {name}: expected {expected}, got {got}")]
    Arity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },
}

/// Failure to evaluate an expression, carrying the expression text and the
/// scope keys that were visible.
#[derive(Error, Debug)]
#[error("cannot evaluate '{expression}': {cause} (scope keys: {scope_keys:?})")]
pub struct EvalError {
    /// The expression that failed
    pub expression: String,

    /// Names visible in the scope at the time of failure, sorted
    pub scope_keys: Vec<String>,

    /// What went wrong
    pub cause: EvalCause,
}

/// Result type alias for EvalCause, used inside the crate
pub(crate) type CauseResult<T> = Result<T, EvalCause>;

/// Result type alias for EvalError
pub type EvalResult<T> = Result<T, EvalError>;
