//! Strongly-typed source id wrapper.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Strongly-typed wrapper for user-given source identifiers.
    ///
    /// In multi-source synthesis two sources may share a type name but never
    /// a source id; solution leaves are keyed by this id.
    pub struct SourceId;
}
