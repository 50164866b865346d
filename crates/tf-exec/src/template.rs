//! String-template implementations, rendered through minijinja.
//!
//! `{{name}}` placeholders resolve against the evaluated bindings only;
//! strict undefined behavior makes unknown placeholders fail rather than
//! render empty.

use minijinja::{Environment, UndefinedBehavior};
use std::collections::BTreeMap;
use tf_core::Value;
use tf_expr::{evaluate, EvalError, Scope};
use thiserror::Error;

/// Why a template failed: one of its binding expressions, or rendering
/// itself.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A binding expression failed to evaluate
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Rendering failed (unknown placeholder, bad syntax)
    #[error("{0}")]
    Render(String),
}

/// Evaluate the bindings against the scope and render the pattern.
pub fn render(
    pattern: &str,
    bindings: &BTreeMap<String, String>,
    scope: &Scope,
) -> Result<Value, TemplateError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let mut ctx: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    for (name, expr) in bindings {
        let value = evaluate(expr, scope)?;
        let json = value
            .to_json()
            .map_err(|e| TemplateError::Render(e.to_string()))?;
        ctx.insert(name.clone(), json);
    }

    let rendered = env
        .render_str(pattern, ctx)
        .map_err(|e| TemplateError::Render(e.to_string()))?;
    Ok(Value::Str(rendered))
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
