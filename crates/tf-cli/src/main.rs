//! Typeflow CLI - parse catalogs, search for plans, and execute pipelines

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{ls, parse, run, solve};

fn main() {
    let cli = Cli::parse();

    let result: Result<()> = match &cli.command {
        cli::Commands::Parse(args) => parse::execute(args, &cli.global),
        cli::Commands::Ls(args) => ls::execute(args, &cli.global),
        cli::Commands::Solve(args) => solve::execute(args, &cli.global),
        cli::Commands::Run(args) => run::execute(args, &cli.global),
    };

    if let Err(err) = result {
        // Check if this is an ExitCode (structured exit, not a real error)
        if let Some(exit_code) = err.downcast_ref::<commands::common::ExitCode>() {
            std::process::exit(exit_code.0);
        }
        // Real error — print and exit 1
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
