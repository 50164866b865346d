//! Topological execution schedule over a solution plan.
//!
//! The executor evaluates children strictly before parents and each shared
//! node exactly once. Nodes are keyed by `Arc` pointer identity so a leaf
//! shared across several positions schedules once.

use crate::error::{CoreError, CoreResult};
use crate::solution::SolutionNode;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::sync::Arc;

/// Identity key for a solution node.
pub fn node_key(node: &Arc<SolutionNode>) -> usize {
    Arc::as_ptr(node) as usize
}

/// A valid evaluation order for a solution plan.
#[derive(Debug)]
pub struct PlanSchedule {
    order: Vec<Arc<SolutionNode>>,
}

impl PlanSchedule {
    /// Build the schedule for the plan rooted at `root`.
    ///
    /// Solver output is always acyclic; the cycle branch guards against
    /// hand-built plans.
    pub fn build(root: &Arc<SolutionNode>) -> CoreResult<Self> {
        let mut graph: DiGraph<Arc<SolutionNode>, ()> = DiGraph::new();
        let mut index_of: HashMap<usize, NodeIndex> = HashMap::new();

        let mut stack = vec![Arc::clone(root)];
        while let Some(node) = stack.pop() {
            let key = node_key(&node);
            if index_of.contains_key(&key) {
                continue;
            }
            let idx = graph.add_node(Arc::clone(&node));
            index_of.insert(key, idx);
            for child in &node.children {
                stack.push(Arc::clone(child));
            }
        }

        // Edge from child to parent so topological sort yields children
        // first.
        let mut edges = Vec::new();
        for idx in graph.node_indices() {
            let node = Arc::clone(&graph[idx]);
            for child in &node.children {
                let child_idx = index_of[&node_key(child)];
                edges.push((child_idx, idx));
            }
        }
        for (from, to) in edges {
            graph.update_edge(from, to, ());
        }

        match toposort(&graph, None) {
            Ok(indices) => Ok(Self {
                order: indices.into_iter().map(|idx| Arc::clone(&graph[idx])).collect(),
            }),
            Err(cycle) => Err(CoreError::CyclicPlan {
                cycle: graph[cycle.node_id()].produced.to_string(),
            }),
        }
    }

    /// Nodes in evaluation order (children before parents, each node
    /// once).
    pub fn evaluation_order(&self) -> &[Arc<SolutionNode>] {
        &self.order
    }

    /// Number of distinct nodes in the plan.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the plan is empty (never true for a built schedule).
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
