//! tf-exec - Pipeline execution engine for Typeflow
//!
//! Walks a solution plan in topological order, dispatches on the
//! function's implementation kind (formula, json, template, remote,
//! builtin), and produces the final value. Optionally records a PROV-style
//! provenance graph of the run.

pub mod builtins;
pub mod context;
pub mod error;
pub mod executor;
pub mod provenance;
pub mod resolver;
pub mod template;

pub use context::ExecutionContext;
pub use error::{ExecError, ExecResult};
pub use executor::{execute, execute_dag, Executor};
pub use provenance::{ProvenanceGraph, ProvenanceRecorder};
pub use resolver::{RemoteResolver, REMOTE_MOCK_VALUE};
