//! Implementation of the `run` command

use super::common::{self, ExitCode, NO_PLAN};
use crate::cli::{GlobalArgs, OutputFormat, ProvFormat, RunArgs};
use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::fs;
use tf_core::{SourceId, TypeName, Value};
use tf_exec::Executor;

pub fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let catalog = common::load_catalog(&args.catalog)?;
    let goal = common::type_name(&args.goal)?;
    let context = common::load_context(&args.context)?;

    let mut executor = Executor::new();
    if args.prov.is_some() {
        executor = executor.with_provenance();
    }

    let value = if !args.from.is_empty() {
        let sources: Vec<(SourceId, TypeName)> = args
            .from
            .iter()
            .map(|spec| common::source_binding(spec))
            .collect::<Result<_>>()?;
        let Some(dag) = tf_solver::solve_dag(&catalog, &sources, &goal, args.max_depth)? else {
            eprintln!("no plan found for goal {goal}");
            return Err(ExitCode(NO_PLAN).into());
        };
        if global.verbose {
            eprint!("{}", dag.root.render());
        }
        executor.execute_dag(&dag, &context)?
    } else {
        if args.sources.is_empty() {
            bail!("run requires at least one --source or --from binding");
        }
        let sources: BTreeSet<TypeName> = args
            .sources
            .iter()
            .map(|s| common::type_name(s))
            .collect::<Result<_>>()?;
        let roots = tf_solver::solve(&catalog, &sources, &goal, args.max_depth)?;
        let Some(plan) = roots.first() else {
            eprintln!("no plan found for goal {goal}");
            return Err(ExitCode(NO_PLAN).into());
        };
        if global.verbose {
            eprint!("{}", plan.render());
        }
        executor.execute(plan, &context)?
    };

    print_value(&value, args.output)?;

    if let Some(path) = &args.prov {
        let graph = executor
            .take_provenance()
            .expect("provenance was enabled above");
        let exported = match args.prov_format {
            ProvFormat::Json => serde_json::to_string_pretty(&graph.to_json())?,
            ProvFormat::Turtle => graph.to_turtle(),
            ProvFormat::Jsonld => serde_json::to_string_pretty(&graph.to_jsonld())?,
        };
        fs::write(path, exported)?;
        if global.verbose {
            eprintln!("wrote provenance to {path}");
        }
    }

    Ok(())
}

fn print_value(value: &Value, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Pretty => println!("{value}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value.to_json()?)?),
    }
    Ok(())
}
