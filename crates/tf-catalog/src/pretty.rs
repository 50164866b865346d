//! Canonical pretty-printer for catalogs.
//!
//! The output parses back to an identical catalog, and pretty-printing the
//! reparsed catalog reproduces the text byte for byte (comments are
//! dropped by the scanner and so do not survive).

use tf_core::value::fmt_f64;
use tf_core::{Catalog, Implementation, TypeName};

/// Render a catalog in canonical text form.
pub fn to_canonical_text(catalog: &Catalog) -> String {
    let mut out = String::new();

    for ty in catalog.types() {
        match &ty.components {
            Some(components) => {
                let joined = components
                    .iter()
                    .map(TypeName::as_str)
                    .collect::<Vec<_>>()
                    .join(" x ");
                out.push_str(&format!("type {} = {}\n", ty.name, joined));
            }
            None if ty.attributes.is_empty() => {
                out.push_str(&format!("type {}\n", ty.name));
            }
            None => {
                let attrs = ty
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("type {} [{}]\n", ty.name, attrs));
            }
        }
    }

    for func in catalog.functions() {
        out.push('\n');
        out.push_str(&format!("fn {} {{\n", func.name));
        out.push_str(&format!("    sig: {}\n", func.signature()));
        out.push_str(&format!("    impl: {}\n", render_impl(&func.implementation)));
        out.push_str(&format!("    cost: {}\n", fmt_f64(func.cost)));
        out.push_str(&format!("    confidence: {}\n", fmt_f64(func.confidence)));
        if let Some(doc) = &func.doc {
            out.push_str(&format!(
                "    doc: {}\n",
                serde_json::to_string(doc).expect("string serializes")
            ));
        }
        if let Some(inverse) = &func.inverse_of {
            out.push_str(&format!("    inverse_of: {inverse}\n"));
        }
        out.push_str("}\n");
    }

    out
}

fn render_impl(implementation: &Implementation) -> String {
    match implementation {
        Implementation::Formula(expr) => {
            format!("formula({})", serde_json::to_string(expr).expect("string serializes"))
        }
        Implementation::Sparql(query) => {
            format!("sparql({})", serde_json::to_string(query).expect("string serializes"))
        }
        Implementation::Rest(target) => {
            format!("rest({})", serde_json::to_string(target).expect("string serializes"))
        }
        Implementation::Builtin(kind) => format!("builtin(\"{kind}\")"),
        Implementation::Json(schema) => {
            format!("json({})", serde_json::to_string(schema).expect("schema serializes"))
        }
        Implementation::Template { pattern, bindings } => format!(
            "template({}, {})",
            serde_json::to_string(pattern).expect("string serializes"),
            serde_json::to_string(bindings).expect("bindings serialize"),
        ),
    }
}

#[cfg(test)]
#[path = "pretty_test.rs"]
mod tests;
