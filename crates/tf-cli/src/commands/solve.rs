//! Implementation of the `solve` command

use super::common::{self, ExitCode, NO_PLAN};
use crate::cli::{GlobalArgs, OutputFormat, SolveArgs};
use anyhow::Result;
use std::collections::BTreeSet;
use tf_core::TypeName;

pub fn execute(args: &SolveArgs, global: &GlobalArgs) -> Result<()> {
    let catalog = common::load_catalog(&args.catalog)?;
    let goal = common::type_name(&args.goal)?;
    let sources: BTreeSet<TypeName> = args
        .sources
        .iter()
        .map(|s| common::type_name(s))
        .collect::<Result<_>>()?;

    let roots = tf_solver::solve(&catalog, &sources, &goal, args.max_depth)?;
    if roots.is_empty() {
        eprintln!("no plan found for goal {goal}");
        return Err(ExitCode(NO_PLAN).into());
    }
    if global.verbose {
        eprintln!("{} candidate plan(s)", roots.len());
    }

    let selected: &[_] = if args.all { &roots } else { &roots[..1] };
    match args.output {
        OutputFormat::Pretty => {
            for (rank, root) in selected.iter().enumerate() {
                if args.all {
                    println!("plan {}:", rank + 1);
                }
                print!("{}", root.render());
            }
        }
        OutputFormat::Json => {
            let json: Vec<serde_json::Value> = selected.iter().map(|r| r.to_json()).collect();
            if args.all {
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&json[0])?);
            }
        }
    }

    Ok(())
}
