//! Implementation of the `ls` command

use super::common;
use crate::cli::{GlobalArgs, LsArgs};
use anyhow::Result;
use tf_core::value::fmt_f64;

pub fn execute(args: &LsArgs, _global: &GlobalArgs) -> Result<()> {
    let catalog = common::load_catalog(&args.catalog)?;

    println!("types:");
    for ty in catalog.types() {
        match &ty.components {
            Some(components) => {
                let joined = components
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(" x ");
                println!("  {} = {joined}", ty.name);
            }
            None if ty.attributes.is_empty() => println!("  {}", ty.name),
            None => {
                let attrs = ty
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {} [{attrs}]", ty.name);
            }
        }
    }

    println!("functions:");
    for func in catalog.functions() {
        println!(
            "  #{} {}: {} ({}, cost {}, confidence {})",
            func.id,
            func.name,
            func.signature(),
            func.implementation.kind_name(),
            fmt_f64(func.cost),
            fmt_f64(func.confidence),
        );
    }

    Ok(())
}
