//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use tf_core::{Catalog, SourceId, TypeName};
use tf_exec::ExecutionContext;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub struct ExitCode(pub i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty display — main.rs handles the exit code without printing
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code for "no plan found".
pub const NO_PLAN: i32 = 2;

/// Read and parse a catalog file.
pub fn load_catalog(path: &str) -> Result<Catalog> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read catalog file {path}"))?;
    let catalog = tf_catalog::parse_catalog(&text)
        .with_context(|| format!("cannot parse catalog file {path}"))?;
    log::debug!(
        "loaded {} type(s), {} function(s) from {path}",
        catalog.type_count(),
        catalog.functions().len()
    );
    Ok(catalog)
}

/// Read a context file (YAML or JSON object) into an execution context.
pub fn load_context(path: &str) -> Result<ExecutionContext> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read context file {path}"))?;
    // YAML is a superset of JSON, so one parser covers both.
    let json: serde_json::Value = serde_yaml::from_str(&text)
        .with_context(|| format!("cannot parse context file {path}"))?;
    let ctx = ExecutionContext::from_json_object(&json)
        .with_context(|| format!("invalid context in {path}"))?;
    Ok(ctx)
}

/// Parse a goal or source type name.
pub fn type_name(name: &str) -> Result<TypeName> {
    TypeName::try_new(name)
        .with_context(|| format!("'{name}' is not a valid type name"))
}

/// Parse an `id=Type` source binding.
pub fn source_binding(spec: &str) -> Result<(SourceId, TypeName)> {
    let (id, ty) = spec
        .split_once('=')
        .with_context(|| format!("expected id=Type, got '{spec}'"))?;
    let id = SourceId::try_new(id.trim())
        .with_context(|| format!("'{}' is not a valid source id", id.trim()))?;
    let ty = type_name(ty.trim())?;
    Ok((id, ty))
}
