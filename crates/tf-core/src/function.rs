//! Function definitions and their implementation records.

use crate::function_name::FunctionName;
use crate::type_name::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of built-in aggregate implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    /// Pass the sole input through unchanged
    Identity,
    /// Sum of a sequence input
    Sum,
    /// Product of a sequence input
    Product,
    /// Arithmetic mean of a sequence input
    Average,
    /// First element of a sequence input
    First,
    /// Last element of a sequence input
    Last,
    /// Length of a sequence input
    Count,
    /// Absolute value of a numeric input
    Abs,
    /// Nearest integer of a numeric input
    Round,
}

impl BuiltinKind {
    /// All builtin kinds, in display order.
    pub const ALL: [BuiltinKind; 9] = [
        BuiltinKind::Identity,
        BuiltinKind::Sum,
        BuiltinKind::Product,
        BuiltinKind::Average,
        BuiltinKind::First,
        BuiltinKind::Last,
        BuiltinKind::Count,
        BuiltinKind::Abs,
        BuiltinKind::Round,
    ];

    /// The builtin's name as written in catalog text.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinKind::Identity => "identity",
            BuiltinKind::Sum => "sum",
            BuiltinKind::Product => "product",
            BuiltinKind::Average => "average",
            BuiltinKind::First => "first",
            BuiltinKind::Last => "last",
            BuiltinKind::Count => "count",
            BuiltinKind::Abs => "abs",
            BuiltinKind::Round => "round",
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown builtin '{s}'"))
    }
}

/// How a function computes its output. A closed tagged union; the executor
/// pattern-matches once per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "arg", rename_all = "lowercase")]
pub enum Implementation {
    /// Restricted arithmetic expression over the input scope
    Formula(String),
    /// Structured-data template; string leaves are expressions
    Json(serde_json::Value),
    /// String template with `{{key}}` placeholders and a binding map
    Template {
        /// The template pattern
        pattern: String,
        /// Placeholder name to expression
        bindings: BTreeMap<String, String>,
    },
    /// Remote SPARQL query placeholder, resolved from context or mocked
    Sparql(String),
    /// Remote REST call placeholder, resolved from context or mocked
    Rest(String),
    /// One of the closed set of built-in aggregates
    Builtin(BuiltinKind),
}

impl Implementation {
    /// Short kind name (`formula`, `json`, `template`, `sparql`, `rest`,
    /// `builtin`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Implementation::Formula(_) => "formula",
            Implementation::Json(_) => "json",
            Implementation::Template { .. } => "template",
            Implementation::Sparql(_) => "sparql",
            Implementation::Rest(_) => "rest",
            Implementation::Builtin(_) => "builtin",
        }
    }

    /// Whether this implementation is resolved remotely (or mocked).
    pub fn is_remote(&self) -> bool {
        matches!(self, Implementation::Sparql(_) | Implementation::Rest(_))
    }
}

/// A typed operation in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Ordinal position in catalog declaration order; the deterministic
    /// ranking tiebreaker
    pub id: usize,

    /// Function name (not necessarily unique; overloads are allowed)
    pub name: FunctionName,

    /// Ordered, non-empty input type names
    pub domain: Vec<TypeName>,

    /// Result type name
    pub codomain: TypeName,

    /// Additive non-negative cost
    pub cost: f64,

    /// Multiplicative confidence in `[0, 1]`
    pub confidence: f64,

    /// How the output is computed
    pub implementation: Implementation,

    /// Documentation string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Name of a declared inverse, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_of: Option<FunctionName>,
}

impl FunctionDefinition {
    /// Create a function definition with default cost and confidence.
    ///
    /// The ordinal `id` is assigned when the catalog is built.
    pub fn new(
        name: FunctionName,
        domain: Vec<TypeName>,
        codomain: TypeName,
        implementation: Implementation,
    ) -> Self {
        Self {
            id: 0,
            name,
            domain,
            codomain,
            cost: 1.0,
            confidence: 1.0,
            implementation,
            doc: None,
            inverse_of: None,
        }
    }

    /// Set the cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Whether this function takes a single input.
    pub fn is_unary(&self) -> bool {
        self.domain.len() == 1
    }

    /// Render the signature as `A, B -> C`.
    pub fn signature(&self) -> String {
        let domain = self
            .domain
            .iter()
            .map(TypeName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} -> {}", domain, self.codomain)
    }
}

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;
