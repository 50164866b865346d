//! The immutable catalog: declared types, declared functions, and the
//! derived codomain/domain indices the solver searches over.

use crate::error::{CoreError, CoreResult};
use crate::function::FunctionDefinition;
use crate::type_name::TypeName;
use crate::typedef::TypeDefinition;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A parsed catalog of types and functions.
///
/// Built once, then shared immutably between solver invocations and
/// executions.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Declared types by name
    types: BTreeMap<TypeName, TypeDefinition>,

    /// Declared functions in declaration order; `functions[i].id == i`
    functions: Vec<Arc<FunctionDefinition>>,

    /// Type name -> ids of functions producing it
    by_codomain: HashMap<TypeName, Vec<usize>>,

    /// Type name -> ids of functions consuming it (each id at most once
    /// per bucket)
    by_domain: HashMap<TypeName, Vec<usize>>,
}

impl Catalog {
    /// Build a catalog from declarations, assigning ordinal function ids
    /// and the derived indices.
    ///
    /// Validates that type names are unique, every referenced type is
    /// declared, domains are non-empty, costs are finite and non-negative,
    /// and confidences lie in `[0, 1]`.
    pub fn build(
        types: Vec<TypeDefinition>,
        mut functions: Vec<FunctionDefinition>,
    ) -> CoreResult<Self> {
        let mut type_map: BTreeMap<TypeName, TypeDefinition> = BTreeMap::new();
        for ty in types {
            if type_map.contains_key(&ty.name) {
                return Err(CoreError::DuplicateType {
                    name: ty.name.to_string(),
                });
            }
            type_map.insert(ty.name.clone(), ty);
        }

        for ty in type_map.values() {
            if let Some(components) = &ty.components {
                for component in components {
                    if !type_map.contains_key(component) {
                        return Err(CoreError::UndeclaredType {
                            name: component.to_string(),
                            referrer: format!("type {}", ty.name),
                        });
                    }
                }
            }
        }

        for func in &functions {
            if func.domain.is_empty() {
                return Err(CoreError::EmptyDomain {
                    name: func.name.to_string(),
                });
            }
            if !(func.cost.is_finite() && func.cost >= 0.0) {
                return Err(CoreError::InvalidWeight {
                    name: func.name.to_string(),
                    field: "cost",
                    value: func.cost,
                });
            }
            if !(func.confidence.is_finite() && (0.0..=1.0).contains(&func.confidence)) {
                return Err(CoreError::InvalidWeight {
                    name: func.name.to_string(),
                    field: "confidence",
                    value: func.confidence,
                });
            }
            for ty in func.domain.iter().chain(std::iter::once(&func.codomain)) {
                if !type_map.contains_key(ty) {
                    return Err(CoreError::UndeclaredType {
                        name: ty.to_string(),
                        referrer: format!("fn {}", func.name),
                    });
                }
            }
        }

        let mut by_codomain: HashMap<TypeName, Vec<usize>> = HashMap::new();
        let mut by_domain: HashMap<TypeName, Vec<usize>> = HashMap::new();
        for (id, func) in functions.iter_mut().enumerate() {
            func.id = id;
            by_codomain
                .entry(func.codomain.clone())
                .or_default()
                .push(id);
            let mut seen: Vec<&TypeName> = Vec::new();
            for ty in &func.domain {
                if !seen.contains(&ty) {
                    seen.push(ty);
                    by_domain.entry(ty.clone()).or_default().push(id);
                }
            }
        }

        debug!(
            "built catalog: {} types, {} functions",
            type_map.len(),
            functions.len()
        );

        Ok(Self {
            types: type_map,
            functions: functions.into_iter().map(Arc::new).collect(),
            by_codomain,
            by_domain,
        })
    }

    /// Whether a type with this name is declared.
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Look up a type definition by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// All declared types, in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Number of declared types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All declared functions, in declaration order.
    pub fn functions(&self) -> &[Arc<FunctionDefinition>] {
        &self.functions
    }

    /// Look up a function by ordinal id.
    pub fn function(&self, id: usize) -> Option<&Arc<FunctionDefinition>> {
        self.functions.get(id)
    }

    /// Functions whose codomain is `name`, in declaration order.
    pub fn producers_of(&self, name: &str) -> impl Iterator<Item = &Arc<FunctionDefinition>> {
        self.by_codomain
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&id| &self.functions[id])
    }

    /// Functions with `name` somewhere in their domain, in declaration
    /// order.
    pub fn consumers_of(&self, name: &str) -> impl Iterator<Item = &Arc<FunctionDefinition>> {
        self.by_domain
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&id| &self.functions[id])
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
