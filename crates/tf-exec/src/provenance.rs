//! Provenance recording: entities, activities, and their relations, per
//! the W3C PROV data model.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use tf_core::{FunctionDefinition, Value};
use uuid::Uuid;

/// A produced value.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// Opaque id, unique within one graph
    pub id: String,
    /// Type name of the value
    pub type_name: String,
    /// JSON form of the value
    pub value: serde_json::Value,
}

/// One function invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    /// Opaque id, unique within one graph
    pub id: String,
    /// Function name
    pub function: String,
    /// Rendered signature, `A, B -> C`
    pub signature: String,
    /// ISO-8601 start timestamp
    pub started_at: String,
    /// ISO-8601 end timestamp, absent if the invocation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

/// `used(activity, entity, role)`
#[derive(Debug, Clone, Serialize)]
pub struct Usage {
    pub activity: String,
    pub entity: String,
    pub role: String,
}

/// `generated(entity, activity, role)`
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub entity: String,
    pub activity: String,
    pub role: String,
}

/// `derivedFrom(generated, used, activity)`
#[derive(Debug, Clone, Serialize)]
pub struct Derivation {
    pub generated: String,
    pub used: String,
    pub activity: String,
}

/// The accumulated provenance of one execution.
#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceGraph {
    /// URN namespace for this run's identifiers
    pub namespace: String,
    pub entities: Vec<Entity>,
    pub activities: Vec<Activity>,
    pub usages: Vec<Usage>,
    pub generations: Vec<Generation>,
    pub derivations: Vec<Derivation>,
}

impl ProvenanceGraph {
    /// JSON export.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("provenance graph serializes")
    }

    /// Turtle/RDF export using the `prov:` vocabulary.
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        out.push_str("@prefix prov: <http://www.w3.org/ns/prov#> .\n");
        out.push_str("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\n");

        let iri = |id: &str| format!("<{}#{}>", self.namespace, id);

        for entity in &self.entities {
            out.push_str(&format!("{} a prov:Entity .\n", iri(&entity.id)));
        }
        for activity in &self.activities {
            out.push_str(&format!("{} a prov:Activity ;\n", iri(&activity.id)));
            match &activity.ended_at {
                Some(ended_at) => {
                    out.push_str(&format!(
                        "    prov:startedAtTime \"{}\"^^xsd:dateTime ;\n",
                        activity.started_at
                    ));
                    out.push_str(&format!(
                        "    prov:endedAtTime \"{ended_at}\"^^xsd:dateTime .\n"
                    ));
                }
                None => {
                    out.push_str(&format!(
                        "    prov:startedAtTime \"{}\"^^xsd:dateTime .\n",
                        activity.started_at
                    ));
                }
            }
        }
        for usage in &self.usages {
            out.push_str(&format!(
                "{} prov:used {} .\n",
                iri(&usage.activity),
                iri(&usage.entity)
            ));
        }
        for generation in &self.generations {
            out.push_str(&format!(
                "{} prov:wasGeneratedBy {} .\n",
                iri(&generation.entity),
                iri(&generation.activity)
            ));
        }
        for derivation in &self.derivations {
            out.push_str(&format!(
                "{} prov:wasDerivedFrom {} .\n",
                iri(&derivation.generated),
                iri(&derivation.used)
            ));
        }
        out
    }

    /// JSON-LD export with the PROV-O context.
    pub fn to_jsonld(&self) -> serde_json::Value {
        let iri = |id: &str| format!("{}#{}", self.namespace, id);
        let mut graph = Vec::new();

        for entity in &self.entities {
            graph.push(serde_json::json!({
                "@id": iri(&entity.id),
                "@type": "prov:Entity",
            }));
        }
        for activity in &self.activities {
            let mut node = serde_json::json!({
                "@id": iri(&activity.id),
                "@type": "prov:Activity",
                "prov:startedAtTime": activity.started_at,
            });
            if let Some(ended_at) = &activity.ended_at {
                node["prov:endedAtTime"] = serde_json::json!(ended_at);
            }
            let used: Vec<_> = self
                .usages
                .iter()
                .filter(|u| u.activity == activity.id)
                .map(|u| serde_json::json!({"@id": iri(&u.entity)}))
                .collect();
            if !used.is_empty() {
                node["prov:used"] = serde_json::json!(used);
            }
            graph.push(node);
        }
        for generation in &self.generations {
            graph.push(serde_json::json!({
                "@id": iri(&generation.entity),
                "prov:wasGeneratedBy": {"@id": iri(&generation.activity)},
            }));
        }
        for derivation in &self.derivations {
            graph.push(serde_json::json!({
                "@id": iri(&derivation.generated),
                "prov:wasDerivedFrom": {"@id": iri(&derivation.used)},
            }));
        }

        serde_json::json!({
            "@context": {
                "prov": "http://www.w3.org/ns/prov#",
                "xsd": "http://www.w3.org/2001/XMLSchema#",
            },
            "@graph": graph,
        })
    }
}

/// Accumulates provenance while the executor runs.
#[derive(Debug)]
pub struct ProvenanceRecorder {
    graph: ProvenanceGraph,
    next_entity: usize,
    next_activity: usize,
    /// Solution-node identity to entity id, so shared nodes record once
    entity_by_node: HashMap<usize, String>,
}

impl ProvenanceRecorder {
    /// A fresh recorder with a unique run namespace.
    pub fn new() -> Self {
        Self {
            graph: ProvenanceGraph {
                namespace: format!("urn:typeflow:run:{}", Uuid::new_v4()),
                entities: Vec::new(),
                activities: Vec::new(),
                usages: Vec::new(),
                generations: Vec::new(),
                derivations: Vec::new(),
            },
            next_entity: 0,
            next_activity: 0,
            entity_by_node: HashMap::new(),
        }
    }

    /// Record the start of a function invocation.
    pub fn begin_activity(&mut self, function: &FunctionDefinition) -> String {
        let id = format!("act{}", self.next_activity);
        self.next_activity += 1;
        self.graph.activities.push(Activity {
            id: id.clone(),
            function: function.name.to_string(),
            signature: function.signature(),
            started_at: Utc::now().to_rfc3339(),
            ended_at: None,
        });
        id
    }

    /// Record the end of a function invocation.
    pub fn end_activity(&mut self, activity_id: &str) {
        if let Some(activity) = self
            .graph
            .activities
            .iter_mut()
            .find(|a| a.id == activity_id)
        {
            activity.ended_at = Some(Utc::now().to_rfc3339());
        }
    }

    /// Record an entity for a solution node's value, deduplicated by node
    /// identity.
    pub fn entity_for_node(&mut self, node_key: usize, type_name: &str, value: &Value) -> String {
        if let Some(id) = self.entity_by_node.get(&node_key) {
            return id.clone();
        }
        let id = format!("ent{}", self.next_entity);
        self.next_entity += 1;
        self.graph.entities.push(Entity {
            id: id.clone(),
            type_name: type_name.to_string(),
            value: value.to_json().unwrap_or(serde_json::Value::Null),
        });
        self.entity_by_node.insert(node_key, id.clone());
        id
    }

    /// Record `used(activity, entity, role)`.
    pub fn record_used(&mut self, activity: &str, entity: &str, role: String) {
        self.graph.usages.push(Usage {
            activity: activity.to_string(),
            entity: entity.to_string(),
            role,
        });
    }

    /// Record `generated(entity, activity, role="output")`.
    pub fn record_generated(&mut self, entity: &str, activity: &str) {
        self.graph.generations.push(Generation {
            entity: entity.to_string(),
            activity: activity.to_string(),
            role: "output".to_string(),
        });
    }

    /// Record `derivedFrom(generated, used, activity)`.
    pub fn record_derived(&mut self, generated: &str, used: &str, activity: &str) {
        self.graph.derivations.push(Derivation {
            generated: generated.to_string(),
            used: used.to_string(),
            activity: activity.to_string(),
        });
    }

    /// Finish recording and hand the graph to the caller.
    pub fn into_graph(self) -> ProvenanceGraph {
        self.graph
    }
}

impl Default for ProvenanceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "provenance_test.rs"]
mod tests;
