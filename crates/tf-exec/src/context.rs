//! Execution contexts: the named runtime inputs of one evaluation.

use std::collections::BTreeMap;
use tf_core::{CoreError, CoreResult, Value};

/// A read-only mapping from name to runtime value.
///
/// Keys are type names for tree execution and source ids for DAG
/// execution; remote implementations may additionally be overridden by a
/// binding under the function name.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    bindings: BTreeMap<String, Value>,
}

impl ExecutionContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.bindings.insert(name.into(), value);
        self
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// The bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }

    /// Build a context from a JSON object; each member becomes a binding.
    pub fn from_json_object(json: &serde_json::Value) -> CoreResult<Self> {
        let map = json.as_object().ok_or_else(|| CoreError::UnsupportedValue {
            message: format!("context must be a JSON object, got {json}"),
        })?;
        let mut ctx = Self::new();
        for (name, value) in map {
            ctx.bind(name.clone(), Value::from_json(value)?);
        }
        Ok(ctx)
    }
}

impl FromIterator<(String, Value)> for ExecutionContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
