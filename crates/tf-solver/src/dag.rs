//! Multi-source synthesis: bind plan leaves to named sources, sharing one
//! leaf node per source id.

use crate::error::{SolverError, SolverResult};
use crate::solver::solve;
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tf_core::{Catalog, SolutionDag, SolutionNode, SourceId, TypeName};

/// Synthesize a plan for `goal` from named sources and bind its leaves.
///
/// Distinct source ids are distinct leaves even when they share a type;
/// every position demanding the same source id receives the identical
/// leaf node. Returns `Ok(None)` when no plan exists.
pub fn solve_dag(
    catalog: &Catalog,
    sources: &[(SourceId, TypeName)],
    goal: &TypeName,
    max_depth: usize,
) -> SolverResult<Option<SolutionDag>> {
    for (_, ty) in sources {
        if !catalog.has_type(ty) {
            return Err(SolverError::UnknownSourceType {
                name: ty.to_string(),
            });
        }
    }
    let source_types: BTreeSet<TypeName> = sources.iter().map(|(_, ty)| ty.clone()).collect();
    let roots = solve(catalog, &source_types, goal, max_depth)?;
    let Some(best) = roots.first() else {
        return Ok(None);
    };

    let mut binder = LeafBinder {
        sources,
        cursors: HashMap::new(),
        leaves: BTreeMap::new(),
    };
    let root = binder.bind(best);
    debug!("solve_dag {goal}: bound {} source leaf/leaves", binder.leaves.len());
    Ok(Some(SolutionDag {
        root,
        leaves: binder.leaves,
    }))
}

/// Rebuilds the best plan, replacing anonymous leaves with shared
/// source-bound leaves.
struct LeafBinder<'a> {
    sources: &'a [(SourceId, TypeName)],
    /// Per type, how many matching source ids have been consumed
    cursors: HashMap<TypeName, usize>,
    leaves: BTreeMap<SourceId, Arc<SolutionNode>>,
}

impl LeafBinder<'_> {
    fn bind(&mut self, node: &Arc<SolutionNode>) -> Arc<SolutionNode> {
        match &node.func {
            None => {
                let ty = &node.produced;
                let matching: Vec<&SourceId> = self
                    .sources
                    .iter()
                    .filter(|(_, source_ty)| source_ty == ty)
                    .map(|(id, _)| id)
                    .collect();
                // The solver only places leaves on source types, so at
                // least one id matches.
                let cursor = self.cursors.entry(ty.clone()).or_insert(0);
                let index = (*cursor).min(matching.len() - 1);
                if *cursor < matching.len() {
                    *cursor += 1;
                }
                let id = matching[index].clone();
                if let Some(existing) = self.leaves.get(&id) {
                    return Arc::clone(existing);
                }
                let leaf = SolutionNode::source_leaf(ty.clone(), id.clone());
                self.leaves.insert(id, Arc::clone(&leaf));
                leaf
            }
            Some(func) => {
                let children = node.children.iter().map(|child| self.bind(child)).collect();
                SolutionNode::apply(Arc::clone(func), children)
            }
        }
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
