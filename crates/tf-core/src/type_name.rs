//! Strongly-typed type name wrapper.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Strongly-typed wrapper for catalog type names.
    ///
    /// Prevents accidental mixing of type names with function names, source
    /// ids, or other string types. Guaranteed to be a valid identifier after
    /// construction.
    pub struct TypeName;
}

#[cfg(test)]
#[path = "type_name_test.rs"]
mod tests;
