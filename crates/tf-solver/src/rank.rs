//! Total ranking order over solution candidates.

use std::cmp::Ordering;
use std::sync::Arc;
use tf_core::SolutionNode;

/// Costs within this distance rank as equal and fall through to
/// confidence.
pub const COST_TOLERANCE: f64 = 1e-3;

/// Bucket a cost so the tolerance comparison stays transitive.
fn cost_bucket(cost: f64) -> i64 {
    (cost / COST_TOLERANCE).round() as i64
}

/// Pre-order sequence of applied function ids; leaves contribute nothing.
/// Lexicographic comparison of these sequences is the deterministic final
/// tiebreaker.
fn plan_signature(node: &SolutionNode, out: &mut Vec<usize>) {
    if let Some(func) = &node.func {
        out.push(func.id);
    }
    for child in &node.children {
        plan_signature(child, out);
    }
}

/// Compare two candidates: cost ascending (with tolerance), confidence
/// descending, then function-id signature.
pub fn compare(a: &SolutionNode, b: &SolutionNode) -> Ordering {
    cost_bucket(a.cost)
        .cmp(&cost_bucket(b.cost))
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| {
            let mut sig_a = Vec::new();
            let mut sig_b = Vec::new();
            plan_signature(a, &mut sig_a);
            plan_signature(b, &mut sig_b);
            sig_a.cmp(&sig_b)
        })
}

/// Sort candidates into ranking order.
pub fn sort_candidates(candidates: &mut [Arc<SolutionNode>]) {
    candidates.sort_by(|a, b| compare(a, b));
}

#[cfg(test)]
#[path = "rank_test.rs"]
mod tests;
