//! Evaluation scope and its construction from function inputs.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tf_core::Value;

/// A named, read-only scope for one expression evaluation.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: BTreeMap<String, Value>,
}

impl Scope {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// The visible names, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }

    /// Build the scope for a function invocation with the given inputs.
    ///
    /// Record inputs are spread first, so the positional `arg{i}` names
    /// (and later records) override earlier spread entries. A single input
    /// is additionally visible as `value`, `input`, and `x`; a ternary
    /// invocation additionally binds `scope1`..`scope3`.
    pub fn for_inputs(inputs: &[Value]) -> Self {
        let mut scope = Scope::new();
        for input in inputs {
            if let Value::Record(fields) = input {
                for (key, value) in fields {
                    scope.bind(key.clone(), value.clone());
                }
            }
        }
        for (i, input) in inputs.iter().enumerate() {
            scope.bind(format!("arg{i}"), input.clone());
        }
        if let [input] = inputs {
            scope.bind("value", input.clone());
            scope.bind("input", input.clone());
            scope.bind("x", input.clone());
        }
        if inputs.len() == 3 {
            for (i, input) in inputs.iter().enumerate() {
                scope.bind(format!("scope{}", i + 1), input.clone());
            }
        }
        scope
    }
}

static ASSIGNMENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_]*\s*=").expect("prefix regex"));

/// Strip a single `identifier =` prefix from a formula expression.
///
/// The value of the formula is the value of the right-hand side; `==` at
/// the same position is a comparison and is left alone.
pub fn strip_assignment_prefix(expr: &str) -> &str {
    if let Some(found) = ASSIGNMENT_PREFIX.find(expr) {
        let rest = &expr[found.end()..];
        if !rest.starts_with('=') {
            return rest;
        }
    }
    expr
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
