//! Strongly-typed function name wrapper.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Strongly-typed wrapper for catalog function names.
    ///
    /// Function names need not be unique within a catalog (overloads
    /// producing the same codomain are distinct functions with distinct
    /// ordinal ids), but every name is a valid identifier.
    pub struct FunctionName;
}
