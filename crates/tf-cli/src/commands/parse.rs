//! Implementation of the `parse` command

use super::common;
use crate::cli::{GlobalArgs, OutputFormat, ParseArgs};
use anyhow::Result;
use serde_json::json;

pub fn execute(args: &ParseArgs, global: &GlobalArgs) -> Result<()> {
    let catalog = common::load_catalog(&args.catalog)?;

    match args.output {
        OutputFormat::Pretty => {
            print!("{}", tf_catalog::to_canonical_text(&catalog));
        }
        OutputFormat::Json => {
            let functions: Vec<serde_json::Value> = catalog
                .functions()
                .iter()
                .map(|func| {
                    json!({
                        "id": func.id,
                        "name": func.name.as_str(),
                        "signature": func.signature(),
                        "impl_kind": func.implementation.kind_name(),
                        "cost": func.cost,
                        "confidence": func.confidence,
                        "doc": func.doc,
                    })
                })
                .collect();
            let summary = json!({
                "types": catalog.types().collect::<Vec<_>>(),
                "functions": functions,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if global.verbose {
        eprintln!(
            "parsed {} type(s), {} function(s) from {}",
            catalog.type_count(),
            catalog.functions().len(),
            args.catalog
        );
    }

    Ok(())
}
