use super::*;
use tf_catalog::parse_catalog;

const AGGREGATION: &str = r#"
type Facility
type S1
type S2
type S3
type Total

fn scope1Emissions {
    sig: Facility -> S1
    impl: formula("fuel * 2.5")
}

fn scope2Emissions {
    sig: Facility -> S2
    impl: formula("elec * 0.5")
}

fn scope3Emissions {
    sig: Facility -> S3
    impl: formula("elec * 0.04")
}

fn agg {
    sig: S1, S2, S3 -> Total
    impl: formula("arg0 + arg1 + arg2")
}
"#;

fn sources(pairs: &[(&str, &str)]) -> Vec<(SourceId, TypeName)> {
    pairs
        .iter()
        .map(|(id, ty)| (SourceId::new(*id), TypeName::new(*ty)))
        .collect()
}

#[test]
fn test_single_source_shared_across_all_leaves() {
    let catalog = parse_catalog(AGGREGATION).unwrap();
    let dag = solve_dag(
        &catalog,
        &sources(&[("plant", "Facility")]),
        &TypeName::new("Total"),
        5,
    )
    .unwrap()
    .expect("plan exists");

    assert_eq!(dag.leaves.len(), 1);
    let shared = dag.leaves.get("plant").unwrap();
    assert_eq!(shared.source.as_ref().unwrap(), "plant");

    // All three branches end in the identical leaf object.
    for child in &dag.root.children {
        assert!(Arc::ptr_eq(&child.children[0], shared));
    }
}

#[test]
fn test_distinct_types_bind_distinct_leaves() {
    let catalog = parse_catalog(
        "type A\ntype B\ntype C\nfn combine {\n sig: A, B -> C\n impl: formula(\"arg0 + arg1\")\n}\n",
    )
    .unwrap();
    let dag = solve_dag(
        &catalog,
        &sources(&[("left", "A"), ("right", "B")]),
        &TypeName::new("C"),
        5,
    )
    .unwrap()
    .expect("plan exists");

    assert_eq!(dag.leaves.len(), 2);
    assert_eq!(
        dag.root.children[0].source.as_ref().unwrap(),
        "left"
    );
    assert_eq!(
        dag.root.children[1].source.as_ref().unwrap(),
        "right"
    );
    assert!(!Arc::ptr_eq(&dag.root.children[0], &dag.root.children[1]));
}

#[test]
fn test_same_type_sources_consumed_in_declaration_order() {
    let catalog = parse_catalog(
        "type A\ntype C\nfn combine {\n sig: A, A -> C\n impl: formula(\"arg0 + arg1\")\n}\n",
    )
    .unwrap();
    let dag = solve_dag(
        &catalog,
        &sources(&[("first", "A"), ("second", "A")]),
        &TypeName::new("C"),
        5,
    )
    .unwrap()
    .expect("plan exists");

    assert_eq!(dag.leaves.len(), 2);
    assert_eq!(dag.root.children[0].source.as_ref().unwrap(), "first");
    assert_eq!(dag.root.children[1].source.as_ref().unwrap(), "second");
}

#[test]
fn test_surplus_demand_reuses_last_source() {
    let catalog = parse_catalog(
        "type A\ntype C\nfn three {\n sig: A, A, A -> C\n impl: formula(\"arg0 + arg1 + arg2\")\n}\n",
    )
    .unwrap();
    let dag = solve_dag(
        &catalog,
        &sources(&[("only", "A")]),
        &TypeName::new("C"),
        5,
    )
    .unwrap()
    .expect("plan exists");

    assert_eq!(dag.leaves.len(), 1);
    let shared = dag.leaves.get("only").unwrap();
    for child in &dag.root.children {
        assert!(Arc::ptr_eq(child, shared));
    }
    // Shared leaves contribute their zero cost once; the plan costs just
    // the function application.
    assert_eq!(dag.root.cost, 1.0);
}

#[test]
fn test_no_plan_returns_none() {
    let catalog = parse_catalog("type A\ntype B\n").unwrap();
    let result = solve_dag(&catalog, &sources(&[("a", "A")]), &TypeName::new("B"), 5).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_unknown_source_type_rejected() {
    let catalog = parse_catalog("type A\n").unwrap();
    let err = solve_dag(&catalog, &sources(&[("a", "Zed")]), &TypeName::new("A"), 5).unwrap_err();
    assert!(matches!(err, SolverError::UnknownSourceType { .. }));
}
