//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Typeflow - type-directed synthesis and execution of data pipelines
#[derive(Parser, Debug)]
#[command(name = "tf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and validate a catalog file
    Parse(ParseArgs),

    /// List catalog types and functions
    Ls(LsArgs),

    /// Search for plans producing a goal type
    Solve(SolveArgs),

    /// Solve and execute a pipeline against concrete inputs
    Run(RunArgs),
}

/// Output formats for parse and solve
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Pretty,
    /// JSON
    Json,
}

/// Provenance export formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvFormat {
    /// JSON object
    Json,
    /// Turtle/RDF with the prov: vocabulary
    Turtle,
    /// JSON-LD with the PROV-O context
    Jsonld,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Catalog file
    pub catalog: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Catalog file
    pub catalog: String,
}

/// Arguments for the solve command
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Catalog file
    pub catalog: String,

    /// Goal type name
    #[arg(short, long)]
    pub goal: String,

    /// Source type name (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// Maximum function applications from the root
    #[arg(long, default_value_t = tf_solver::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print all ranked candidates, not just the recommended plan
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Catalog file
    pub catalog: String,

    /// Goal type name
    #[arg(short, long)]
    pub goal: String,

    /// Source type name (repeatable); context keys are type names
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// Named source binding `id=Type` (repeatable); switches to DAG
    /// synthesis and context keys become source ids
    #[arg(long = "from")]
    pub from: Vec<String>,

    /// Context file (YAML or JSON object)
    #[arg(short, long)]
    pub context: String,

    /// Maximum function applications from the root
    #[arg(long, default_value_t = tf_solver::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Output format for the result value
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,

    /// Record provenance and write it to this file
    #[arg(long)]
    pub prov: Option<String>,

    /// Provenance export format
    #[arg(long, value_enum, default_value = "json")]
    pub prov_format: ProvFormat,
}
