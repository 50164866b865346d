//! tf-solver - Type-inhabitation solver for Typeflow
//!
//! Given a catalog, a goal type, and a set of source types, enumerates
//! ranked compositions of catalog functions producing the goal. With
//! named sources, additionally binds plan leaves to source ids, sharing a
//! single leaf per id (a DAG rather than a tree).

pub mod dag;
pub mod error;
pub mod rank;
pub mod solver;

pub use dag::solve_dag;
pub use error::{SolverError, SolverResult};
pub use solver::{solve, DEFAULT_MAX_DEPTH};
