//! The execution engine: walks a solution plan in topological order and
//! dispatches on implementation kind.

use crate::builtins;
use crate::context::ExecutionContext;
use crate::error::{ExecError, ExecResult};
use crate::provenance::{ProvenanceGraph, ProvenanceRecorder};
use crate::resolver::{RemoteResolver, REMOTE_MOCK_VALUE};
use crate::template::{self, TemplateError};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tf_core::schedule::node_key;
use tf_core::{
    FunctionDefinition, Implementation, PlanSchedule, SolutionDag, SolutionNode, Value,
};
use tf_expr::{evaluate, strip_assignment_prefix, EvalError, Scope};

/// Evaluates solution plans against execution contexts.
///
/// Holds the optional external resolver for remote implementations and
/// the optional provenance recorder.
#[derive(Default)]
pub struct Executor {
    resolver: Option<Box<dyn RemoteResolver>>,
    provenance: Option<ProvenanceRecorder>,
}

impl Executor {
    /// An executor with no resolver and no provenance recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external resolver for `sparql`/`rest` implementations.
    pub fn with_resolver(mut self, resolver: Box<dyn RemoteResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Enable provenance recording.
    pub fn with_provenance(mut self) -> Self {
        self.provenance = Some(ProvenanceRecorder::new());
        self
    }

    /// Drain the recorded provenance graph, if recording was enabled.
    pub fn take_provenance(&mut self) -> Option<ProvenanceGraph> {
        self.provenance.take().map(ProvenanceRecorder::into_graph)
    }

    /// Evaluate a plan. Children evaluate before parents; shared nodes
    /// evaluate exactly once (memoized by node identity).
    pub fn execute(
        &mut self,
        root: &Arc<SolutionNode>,
        ctx: &ExecutionContext,
    ) -> ExecResult<Value> {
        let schedule = PlanSchedule::build(root)?;
        debug!("executing plan with {} node(s)", schedule.len());

        let mut values: HashMap<usize, Value> = HashMap::new();
        for node in schedule.evaluation_order() {
            let value = self.eval_node(node, ctx, &values)?;
            values.insert(node_key(node), value);
        }
        Ok(values
            .remove(&node_key(root))
            .expect("schedule contains the root"))
    }

    /// Evaluate a DAG-shaped plan; leaves resolve by source id.
    pub fn execute_dag(&mut self, dag: &SolutionDag, ctx: &ExecutionContext) -> ExecResult<Value> {
        self.execute(&dag.root, ctx)
    }

    fn eval_node(
        &mut self,
        node: &Arc<SolutionNode>,
        ctx: &ExecutionContext,
        values: &HashMap<usize, Value>,
    ) -> ExecResult<Value> {
        let Some(func) = &node.func else {
            let name = match &node.source {
                Some(source) => source.as_str(),
                None => node.produced.as_str(),
            };
            return ctx
                .get(name)
                .cloned()
                .ok_or_else(|| ExecError::MissingSourceBinding {
                    name: name.to_string(),
                });
        };
        let func = Arc::clone(func);

        let inputs: Vec<Value> = node
            .children
            .iter()
            .map(|child| {
                values
                    .get(&node_key(child))
                    .cloned()
                    .expect("children evaluate before their parent")
            })
            .collect();

        let activity = self
            .provenance
            .as_mut()
            .map(|recorder| recorder.begin_activity(&func));
        let mut used_entities = Vec::new();
        if let (Some(recorder), Some(activity)) = (self.provenance.as_mut(), &activity) {
            for (i, child) in node.children.iter().enumerate() {
                let entity = recorder.entity_for_node(
                    node_key(child),
                    child.produced.as_str(),
                    &inputs[i],
                );
                recorder.record_used(activity, &entity, format!("arg{i}"));
                used_entities.push(entity);
            }
        }

        let output = self.apply_function(&func, &inputs, ctx)?;

        if let (Some(recorder), Some(activity)) = (self.provenance.as_mut(), &activity) {
            let generated =
                recorder.entity_for_node(node_key(node), node.produced.as_str(), &output);
            recorder.record_generated(&generated, activity);
            for used in &used_entities {
                recorder.record_derived(&generated, used, activity);
            }
            recorder.end_activity(activity);
        }

        Ok(output)
    }

    fn apply_function(
        &self,
        func: &FunctionDefinition,
        inputs: &[Value],
        ctx: &ExecutionContext,
    ) -> ExecResult<Value> {
        let label = || format!("{}#{}", func.name, func.id);
        match &func.implementation {
            Implementation::Formula(expr) => {
                let scope = Scope::for_inputs(inputs);
                let stripped = strip_assignment_prefix(expr);
                evaluate(stripped, &scope).map_err(|source| ExecError::Expression {
                    function: label(),
                    source,
                })
            }
            Implementation::Json(schema) => {
                let scope = Scope::for_inputs(inputs);
                let json = eval_json_schema(schema, &scope).map_err(|source| {
                    ExecError::Expression {
                        function: label(),
                        source,
                    }
                })?;
                Value::from_json(&json).map_err(|e| ExecError::BadResult {
                    function: label(),
                    message: e.to_string(),
                })
            }
            Implementation::Template { pattern, bindings } => {
                let scope = Scope::for_inputs(inputs);
                template::render(pattern, bindings, &scope).map_err(|e| match e {
                    TemplateError::Eval(source) => ExecError::Expression {
                        function: label(),
                        source,
                    },
                    TemplateError::Render(message) => ExecError::Template {
                        function: label(),
                        message,
                    },
                })
            }
            Implementation::Sparql(query) | Implementation::Rest(query) => {
                if let Some(bound) = ctx.get(func.name.as_str()) {
                    return Ok(bound.clone());
                }
                match &self.resolver {
                    Some(resolver) => resolver.resolve(func, query, inputs).map_err(|message| {
                        ExecError::Resolver {
                            function: label(),
                            message,
                        }
                    }),
                    None => Ok(Value::Number(REMOTE_MOCK_VALUE)),
                }
            }
            Implementation::Builtin(kind) => {
                builtins::apply(*kind, inputs).map_err(|message| ExecError::Builtin {
                    function: label(),
                    message,
                })
            }
        }
    }
}

/// Evaluate a `json(...)` schema: string leaves are expressions, all other
/// leaves are preserved verbatim, containers are rebuilt from evaluated
/// children.
fn eval_json_schema(
    schema: &serde_json::Value,
    scope: &Scope,
) -> Result<serde_json::Value, EvalError> {
    match schema {
        serde_json::Value::String(expr) => {
            let value = evaluate(expr, scope)?;
            value.to_json().map_err(|e| EvalError {
                expression: expr.clone(),
                scope_keys: scope.keys(),
                cause: tf_expr::EvalCause::Type(e.to_string()),
            })
        }
        serde_json::Value::Array(items) => Ok(serde_json::Value::Array(
            items
                .iter()
                .map(|item| eval_json_schema(item, scope))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        serde_json::Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                out.insert(key.clone(), eval_json_schema(value, scope)?);
            }
            Ok(serde_json::Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

/// Evaluate a plan with a default executor (no resolver, no provenance).
pub fn execute(root: &Arc<SolutionNode>, ctx: &ExecutionContext) -> ExecResult<Value> {
    Executor::new().execute(root, ctx)
}

/// Evaluate a DAG-shaped plan with a default executor.
pub fn execute_dag(dag: &SolutionDag, ctx: &ExecutionContext) -> ExecResult<Value> {
    Executor::new().execute_dag(dag, ctx)
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
