//! tf-core - Core library for Typeflow
//!
//! This crate provides the shared data model used across all Typeflow
//! components: strongly-typed names, type and function definitions, the
//! immutable catalog with its derived indices, runtime values, solution
//! plans, and the topological execution schedule.

pub mod catalog;
pub mod error;
pub mod function;
pub mod function_name;
mod newtype_string;
pub mod schedule;
pub mod solution;
pub mod source_id;
pub mod type_name;
pub mod typedef;
pub mod value;

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult};
pub use function::{BuiltinKind, FunctionDefinition, Implementation};
pub use function_name::FunctionName;
pub use schedule::PlanSchedule;
pub use solution::{SolutionDag, SolutionNode};
pub use source_id::SourceId;
pub use type_name::TypeName;
pub use typedef::TypeDefinition;
pub use value::Value;
