//! tf-expr - Restricted expression sub-language for Typeflow
//!
//! Formula, JSON-template, and string-template implementations all funnel
//! their expressions through this crate: a lexer, a Pratt parser producing
//! a static AST, and a pure interpreter with a closed call whitelist. No
//! dynamic string-to-code conversion is possible.

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod scope;
pub mod token;

pub use error::{EvalCause, EvalError, EvalResult};
pub use eval::{evaluate, truthy, WHITELIST};
pub use parser::parse;
pub use scope::{strip_assignment_prefix, Scope};
