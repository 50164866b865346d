//! Type definitions: atomic types with attributes and product types.

use crate::type_name::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named type in the catalog.
///
/// A type is either **atomic** (attributes only, e.g. `unit=kWh`) or a
/// **product** (an ordered sequence of component type names, interpreted as
/// a tuple). Products carry no attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Type name, unique within the catalog
    pub name: TypeName,

    /// String-keyed attributes (typical keys: `unit`, `range`, `format`)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Ordered component type names for product types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<TypeName>>,
}

impl TypeDefinition {
    /// Create an atomic type with no attributes.
    pub fn atomic(name: TypeName) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
            components: None,
        }
    }

    /// Create an atomic type with attributes.
    pub fn atomic_with_attributes(name: TypeName, attributes: BTreeMap<String, String>) -> Self {
        Self {
            name,
            attributes,
            components: None,
        }
    }

    /// Create a product type from its ordered components.
    pub fn product(name: TypeName, components: Vec<TypeName>) -> Self {
        Self {
            name,
            attributes: BTreeMap::new(),
            components: Some(components),
        }
    }

    /// Whether this type is a product of component types.
    pub fn is_product(&self) -> bool {
        self.components.is_some()
    }

    /// Look up a single attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "typedef_test.rs"]
mod tests;
