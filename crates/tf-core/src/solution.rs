//! Solution nodes: the proof terms produced by the solver.
//!
//! A solution is a tree (or, with shared source leaves, a DAG) of function
//! applications ending in leaves supplied from sources. Nodes are always
//! handled as `Arc<SolutionNode>`; sharing and executor memoization key on
//! pointer identity, not structural equality.

use crate::function::FunctionDefinition;
use crate::source_id::SourceId;
use crate::type_name::TypeName;
use crate::value::fmt_f64;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One node of a solution: a produced type, the function producing it (or
/// none for a leaf), the child solutions in domain order, and the
/// accumulated cost and confidence.
#[derive(Debug)]
pub struct SolutionNode {
    /// The type this node produces
    pub produced: TypeName,

    /// The applied function; `None` iff the node is a source-supplied leaf
    pub func: Option<Arc<FunctionDefinition>>,

    /// One child per domain position, in declaration order
    pub children: Vec<Arc<SolutionNode>>,

    /// Source id, for leaves bound during DAG synthesis
    pub source: Option<SourceId>,

    /// Accumulated cost: children's costs plus the function's own
    pub cost: f64,

    /// Accumulated confidence: children's confidences times the function's
    /// own
    pub confidence: f64,
}

impl SolutionNode {
    /// A leaf supplied from a source of the given type. Cost 0,
    /// confidence 1.
    pub fn leaf(produced: TypeName) -> Arc<Self> {
        Arc::new(Self {
            produced,
            func: None,
            children: Vec::new(),
            source: None,
            cost: 0.0,
            confidence: 1.0,
        })
    }

    /// A leaf bound to a named source.
    pub fn source_leaf(produced: TypeName, source: SourceId) -> Arc<Self> {
        Arc::new(Self {
            produced,
            func: None,
            children: Vec::new(),
            source: Some(source),
            cost: 0.0,
            confidence: 1.0,
        })
    }

    /// Apply a function to child solutions, accumulating cost and
    /// confidence.
    ///
    /// Panics if the children do not match the function's domain; the
    /// solver only ever constructs matching applications.
    pub fn apply(func: Arc<FunctionDefinition>, children: Vec<Arc<SolutionNode>>) -> Arc<Self> {
        assert_eq!(
            children.len(),
            func.domain.len(),
            "child count must match domain arity of {}",
            func.name
        );
        for (child, expected) in children.iter().zip(&func.domain) {
            assert_eq!(
                &child.produced, expected,
                "child type must match domain position of {}",
                func.name
            );
        }
        let cost = children.iter().map(|c| c.cost).sum::<f64>() + func.cost;
        let confidence = children.iter().map(|c| c.confidence).product::<f64>() * func.confidence;
        Arc::new(Self {
            produced: func.codomain.clone(),
            func: Some(func),
            children,
            source: None,
            cost,
            confidence,
        })
    }

    /// Whether the node is a source-supplied leaf.
    pub fn is_leaf(&self) -> bool {
        self.func.is_none()
    }

    /// Number of function applications on the longest path from this node
    /// to a leaf.
    pub fn depth(&self) -> usize {
        match &self.func {
            None => 0,
            Some(_) => 1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0),
        }
    }

    /// The recommended JSON serialization: `type`, optional `func`,
    /// optional `source`, `children`, `cost`, `confidence`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("type".to_string(), json!(self.produced.as_str()));
        if let Some(func) = &self.func {
            obj.insert(
                "func".to_string(),
                json!({
                    "name": func.name.as_str(),
                    "signature": func.signature(),
                    "impl_kind": func.implementation.kind_name(),
                }),
            );
        }
        if let Some(source) = &self.source {
            obj.insert("source".to_string(), json!(source.as_str()));
        }
        obj.insert(
            "children".to_string(),
            serde_json::Value::Array(self.children.iter().map(|c| c.to_json()).collect()),
        );
        obj.insert("cost".to_string(), json!(self.cost));
        obj.insert("confidence".to_string(), json!(self.confidence));
        serde_json::Value::Object(obj)
    }

    /// Human-readable indented rendering of the plan.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(0, &mut out);
        out
    }

    fn render_into(&self, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        match &self.func {
            Some(func) => {
                out.push_str(&format!(
                    "{pad}{} = {}({}) [{}] cost {} confidence {}\n",
                    self.produced,
                    func.name,
                    func.domain
                        .iter()
                        .map(TypeName::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                    func.implementation.kind_name(),
                    fmt_f64(self.cost),
                    fmt_f64(self.confidence),
                ));
                for child in &self.children {
                    child.render_into(indent + 1, out);
                }
            }
            None => match &self.source {
                Some(source) => out.push_str(&format!("{pad}{} <- source {}\n", self.produced, source)),
                None => out.push_str(&format!("{pad}{} <- source\n", self.produced)),
            },
        }
    }
}

/// A solution whose leaves are bound to named sources; leaves demanded by
/// several positions are shared by identity.
#[derive(Debug)]
pub struct SolutionDag {
    /// The root of the (possibly sharing) solution
    pub root: Arc<SolutionNode>,

    /// The single leaf node per bound source id
    pub leaves: BTreeMap<SourceId, Arc<SolutionNode>>,
}

impl SolutionDag {
    /// JSON form of the underlying plan.
    pub fn to_json(&self) -> serde_json::Value {
        self.root.to_json()
    }
}

#[cfg(test)]
#[path = "solution_test.rs"]
mod tests;
