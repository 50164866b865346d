//! Error types for tf-catalog

use tf_core::CoreError;
use thiserror::Error;

/// Catalog language parse errors, each carrying the offending 1-based
/// line number.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A type name declared twice
    #[error("line {line}: duplicate type name: {name}")]
    DuplicateTypeName { name: String, line: usize },

    /// A reference to a type that is never declared anywhere in the file
    #[error("line {line}: undeclared type {name} (referenced by {referrer})")]
    UndeclaredTypeReference {
        name: String,
        referrer: String,
        line: usize,
    },

    /// A malformed type declaration
    #[error("line {line}: malformed type declaration: {message}")]
    MalformedType { line: usize, message: String },

    /// A malformed function block opener or field
    #[error("line {line}: malformed function declaration: {message}")]
    MalformedFunction { line: usize, message: String },

    /// A malformed `sig:` field
    #[error("line {line}: malformed signature: {message}")]
    MalformedSignature { line: usize, message: String },

    /// A malformed `impl:` field
    #[error("line {line}: malformed impl: {message}")]
    MalformedImpl { line: usize, message: String },

    /// A `fn name {` block without a closing brace
    #[error("line {line}: unterminated function block: {name}")]
    UnterminatedFunctionBlock { name: String, line: usize },

    /// A name that is not a valid identifier
    #[error("line {line}: invalid identifier: {name}")]
    InvalidName { name: String, line: usize },

    /// A line that is not part of any declaration
    #[error("line {line}: unexpected line: {content}")]
    UnexpectedLine { line: usize, content: String },

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CoreError),
}

/// Result type alias for ParseError
pub type ParseResult<T> = Result<T, ParseError>;
