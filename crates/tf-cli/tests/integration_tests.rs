//! Integration tests for Typeflow
//!
//! Drives the library crates the way the CLI does: parse a catalog file,
//! search for a plan, and execute it against a context.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tf_catalog::{parse_catalog, to_canonical_text};
use tf_core::{SourceId, TypeName, Value};
use tf_exec::{execute, execute_dag, ExecutionContext, Executor};
use tf_solver::{solve, solve_dag, DEFAULT_MAX_DEPTH};

fn fixture(name: &str) -> String {
    fs::read_to_string(Path::new("tests/fixtures").join(name)).unwrap()
}

fn carbon_catalog() -> tf_core::Catalog {
    parse_catalog(&fixture("carbon.catalog")).unwrap()
}

fn sources(names: &[&str]) -> BTreeSet<TypeName> {
    names.iter().map(|n| TypeName::new(*n)).collect()
}

fn context(json: serde_json::Value) -> ExecutionContext {
    ExecutionContext::from_json_object(&json).unwrap()
}

/// Test loading the sample catalog
#[test]
fn test_load_sample_catalog() {
    let catalog = carbon_catalog();

    assert_eq!(catalog.type_count(), 9);
    assert_eq!(catalog.functions().len(), 8);
    assert_eq!(
        catalog.get_type("Energy").unwrap().attribute("unit"),
        Some("kWh")
    );
}

/// Test the two-step unary pipeline end to end
#[test]
fn test_two_step_pipeline() {
    let catalog = carbon_catalog();
    let roots = solve(
        &catalog,
        &sources(&["Product"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    // The direct route ranks first; the two-step route follows.
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].cost, 1.0);
    assert!((roots[0].confidence - 0.8).abs() < 1e-12);
    assert_eq!(roots[1].cost, 2.0);
    assert!((roots[1].confidence - 0.855).abs() < 1e-12);

    let direct = execute(&roots[0], &context(serde_json::json!({"Product": 1000}))).unwrap();
    assert_eq!(direct, Value::Number(400.0));
    let two_step = execute(&roots[1], &context(serde_json::json!({"Product": 1000}))).unwrap();
    assert_eq!(two_step, Value::Number(500.0));
}

/// Test three-branch aggregation with record spreading
#[test]
fn test_facility_aggregation() {
    let catalog = carbon_catalog();
    let roots = solve(
        &catalog,
        &sources(&["Facility"]),
        &TypeName::new("Total"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children.len(), 3);

    let ctx_json: serde_json::Value = serde_yaml::from_str(&fixture("facility.yml")).unwrap();
    let result = execute(&roots[0], &context(ctx_json)).unwrap();
    assert_eq!(result, Value::Number(2620.0));
}

/// Test a two-goal pipeline through a json report
#[test]
fn test_report_pipeline() {
    let catalog = carbon_catalog();
    let roots = solve(
        &catalog,
        &sources(&["Facility", "Product"]),
        &TypeName::new("Report"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    assert!(!roots.is_empty());
    let result = execute(
        &roots[0],
        &context(serde_json::json!({
            "Facility": {"fuel": 400, "elec": 3000},
            "Product": 1000,
        })),
    )
    .unwrap();

    let json = result.to_json().unwrap();
    assert_eq!(json["total"], 2620);
    assert_eq!(json["product_share"], 400);
    assert_eq!(json["unit"], "kg");
}

/// Test DAG synthesis shares a single facility source
#[test]
fn test_dag_shares_facility_source() {
    let catalog = carbon_catalog();
    let bindings = vec![(SourceId::new("plant_a"), TypeName::new("Facility"))];
    let dag = solve_dag(
        &catalog,
        &bindings,
        &TypeName::new("Total"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap()
    .expect("plan exists");

    assert_eq!(dag.leaves.len(), 1);
    let result = execute_dag(
        &dag,
        &context(serde_json::json!({"plant_a": {"fuel": 400, "elec": 3000}})),
    )
    .unwrap();
    assert_eq!(result, Value::Number(2620.0));
}

/// Test canonical pretty-printing round-trips through the parser
#[test]
fn test_pretty_round_trip() {
    let catalog = carbon_catalog();
    let printed = to_canonical_text(&catalog);
    let reparsed = parse_catalog(&printed).unwrap();
    assert_eq!(printed, to_canonical_text(&reparsed));
}

/// Test solution JSON serialization shape
#[test]
fn test_solution_serialization() {
    let catalog = carbon_catalog();
    let roots = solve(
        &catalog,
        &sources(&["Product"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    let json = roots[1].to_json();
    assert_eq!(json["type"], "CO2");
    assert_eq!(json["func"]["name"], "energyToCO2");
    assert_eq!(json["func"]["impl_kind"], "formula");
    assert_eq!(json["children"][0]["type"], "Energy");
    assert_eq!(json["cost"], 2.0);
}

/// Test provenance recording and export across a full run
#[test]
fn test_provenance_of_aggregation_run() {
    let catalog = carbon_catalog();
    let roots = solve(
        &catalog,
        &sources(&["Facility"]),
        &TypeName::new("Total"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    let mut executor = Executor::new().with_provenance();
    executor
        .execute(
            &roots[0],
            &context(serde_json::json!({"Facility": {"fuel": 400, "elec": 3000}})),
        )
        .unwrap();
    let graph = executor.take_provenance().unwrap();

    // Four invocations (three scopes + aggregate); five values (shared
    // facility leaf, three intermediates, total).
    assert_eq!(graph.activities.len(), 4);
    assert_eq!(graph.entities.len(), 5);

    let turtle = graph.to_turtle();
    assert!(turtle.contains("prov:wasDerivedFrom"));
    let jsonld = graph.to_jsonld();
    assert!(jsonld["@graph"].as_array().unwrap().len() >= 9);
}

/// Test that a malicious formula cannot escape the evaluator
#[test]
fn test_sandboxed_evaluation() {
    let catalog = parse_catalog(
        "type A\ntype B\nfn evil {\n sig: A -> B\n impl: formula(\"system('rm -rf /')\")\n}\n",
    )
    .unwrap();
    let roots = solve(&catalog, &sources(&["A"]), &TypeName::new("B"), 5).unwrap();
    let err = execute(&roots[0], &context(serde_json::json!({"A": 1}))).unwrap_err();
    assert!(err.to_string().contains("unknown function 'system'"));
}
