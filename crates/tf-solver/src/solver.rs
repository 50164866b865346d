//! Depth-bounded backtracking search for goal-type inhabitation.

use crate::error::{SolverError, SolverResult};
use crate::rank;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tf_core::{Catalog, SolutionNode, TypeName};

/// Default bound on function applications from the root.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Sub-problem cache: `(type, remaining depth)` to ranked candidates.
type Memo = HashMap<(TypeName, usize), Vec<Arc<SolutionNode>>>;

/// Enumerate ranked compositions of catalog functions that produce `goal`
/// from the given source types.
///
/// The first candidate, if any, is the recommended plan. An empty result
/// means no plan exists within `max_depth`; that is not an error.
pub fn solve(
    catalog: &Catalog,
    sources: &BTreeSet<TypeName>,
    goal: &TypeName,
    max_depth: usize,
) -> SolverResult<Vec<Arc<SolutionNode>>> {
    if !catalog.has_type(goal) {
        return Err(SolverError::UnknownGoalType {
            name: goal.to_string(),
        });
    }
    for source in sources {
        if !catalog.has_type(source) {
            return Err(SolverError::UnknownSourceType {
                name: source.to_string(),
            });
        }
    }

    let mut memo = Memo::new();
    let roots = candidates(catalog, sources, goal, max_depth, &mut memo);
    debug!(
        "solve {goal}: {} candidate(s) from {} source type(s)",
        roots.len(),
        sources.len()
    );
    Ok(roots)
}

/// Ranked candidates producing `ty` with `budget` remaining applications.
///
/// The base case (a leaf when `ty` is a source) survives at any depth;
/// the recursive case is cut off when the budget is exhausted. Cycles
/// through a type are pruned by the same budget.
fn candidates(
    catalog: &Catalog,
    sources: &BTreeSet<TypeName>,
    ty: &TypeName,
    budget: usize,
    memo: &mut Memo,
) -> Vec<Arc<SolutionNode>> {
    if let Some(cached) = memo.get(&(ty.clone(), budget)) {
        return cached.clone();
    }

    let mut result: Vec<Arc<SolutionNode>> = Vec::new();
    if sources.contains(ty) {
        result.push(SolutionNode::leaf(ty.clone()));
    }

    if budget > 0 {
        'functions: for func in catalog.producers_of(ty) {
            let mut children = Vec::with_capacity(func.domain.len());
            for domain_ty in &func.domain {
                let sub = candidates(catalog, sources, domain_ty, budget - 1, memo);
                match sub.first() {
                    Some(best) => children.push(Arc::clone(best)),
                    None => continue 'functions,
                }
            }
            result.push(SolutionNode::apply(Arc::clone(func), children));
        }
    }

    rank::sort_candidates(&mut result);
    memo.insert((ty.clone(), budget), result.clone());
    result
}

#[cfg(test)]
#[path = "solver_test.rs"]
mod tests;
