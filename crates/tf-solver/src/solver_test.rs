use super::*;
use tf_catalog::parse_catalog;

const TWO_STEP: &str = r#"
type Product
type Energy
type CO2

fn usesEnergy {
    sig: Product -> Energy
    impl: formula("value * 1.0")
    cost: 1
    confidence: 0.9
}

fn energyToCO2 {
    sig: Energy -> CO2
    impl: formula("value * 0.5")
    cost: 1
    confidence: 0.95
}
"#;

const DIRECT_ROUTE: &str = r#"
fn usesElectricity {
    sig: Product -> CO2
    impl: formula("value * 0.4")
    cost: 1
    confidence: 0.8
}
"#;

fn source_set(names: &[&str]) -> BTreeSet<TypeName> {
    names.iter().map(|n| TypeName::new(*n)).collect()
}

#[test]
fn test_two_step_pipeline() {
    let catalog = parse_catalog(TWO_STEP).unwrap();
    let roots = solve(
        &catalog,
        &source_set(&["Product"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    assert_eq!(roots.len(), 1);
    let plan = &roots[0];
    assert_eq!(plan.cost, 2.0);
    assert!((plan.confidence - 0.855).abs() < 1e-12);
    assert_eq!(plan.produced, "CO2");
    assert_eq!(plan.func.as_ref().unwrap().name, "energyToCO2");
    assert_eq!(plan.children[0].func.as_ref().unwrap().name, "usesEnergy");
    assert!(plan.children[0].children[0].is_leaf());
}

#[test]
fn test_branching_prefers_cheaper_route() {
    let text = format!("{TWO_STEP}\n{DIRECT_ROUTE}");
    let catalog = parse_catalog(&text).unwrap();
    let roots = solve(
        &catalog,
        &source_set(&["Product"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].cost, 1.0);
    assert!((roots[0].confidence - 0.8).abs() < 1e-12);
    assert_eq!(roots[0].func.as_ref().unwrap().name, "usesElectricity");
    assert_eq!(roots[1].cost, 2.0);
    assert!((roots[1].confidence - 0.855).abs() < 1e-12);
}

#[test]
fn test_goal_in_sources_yields_leaf_candidate() {
    let catalog = parse_catalog(TWO_STEP).unwrap();
    let roots = solve(
        &catalog,
        &source_set(&["CO2"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    assert_eq!(roots.len(), 1);
    assert!(roots[0].is_leaf());
    assert_eq!(roots[0].cost, 0.0);
    assert_eq!(roots[0].confidence, 1.0);
}

#[test]
fn test_cost_and_confidence_invariants() {
    let text = format!("{TWO_STEP}\n{DIRECT_ROUTE}");
    let catalog = parse_catalog(&text).unwrap();
    let roots = solve(
        &catalog,
        &source_set(&["Product"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    for root in &roots {
        let func = root.func.as_ref().unwrap();
        let child_cost: f64 = root.children.iter().map(|c| c.cost).sum();
        let child_conf: f64 = root.children.iter().map(|c| c.confidence).product();
        assert_eq!(root.cost, child_cost + func.cost);
        assert!((root.confidence - child_conf * func.confidence).abs() < 1e-12);
        for (child, expected) in root.children.iter().zip(&func.domain) {
            assert_eq!(&child.produced, expected);
        }
    }
}

#[test]
fn test_output_sorted_by_rank() {
    let text = format!("{TWO_STEP}\n{DIRECT_ROUTE}");
    let catalog = parse_catalog(&text).unwrap();
    let roots = solve(
        &catalog,
        &source_set(&["Product"]),
        &TypeName::new("CO2"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    for pair in roots.windows(2) {
        assert_ne!(
            crate::rank::compare(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater
        );
    }
}

#[test]
fn test_ternary_aggregation() {
    let catalog = parse_catalog(
        r#"
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
    cost: 1
    confidence: 1.0
}
"#,
    )
    .unwrap();

    let roots = solve(
        &catalog,
        &source_set(&["Facility"]),
        &TypeName::new("Total"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();

    assert_eq!(roots.len(), 1);
    let root = &roots[0];
    assert_eq!(root.children.len(), 3);
    for child in &root.children {
        assert_eq!(child.children[0].produced, "Facility");
    }
}

#[test]
fn test_product_goal_needs_explicit_constructor() {
    let without = parse_catalog("type A\ntype B\ntype All = A x B\n").unwrap();
    let roots = solve(
        &without,
        &source_set(&["A", "B"]),
        &TypeName::new("All"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();
    assert!(roots.is_empty());

    let with = parse_catalog(
        "type A\ntype B\ntype All = A x B\nfn mkAll {\n sig: A, B -> All\n impl: json({\"a\": \"arg0\", \"b\": \"arg1\"})\n}\n",
    )
    .unwrap();
    let roots = solve(
        &with,
        &source_set(&["A", "B"]),
        &TypeName::new("All"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();
    assert_eq!(roots.len(), 1);
}

#[test]
fn test_max_depth_zero() {
    let catalog = parse_catalog(TWO_STEP).unwrap();
    let roots = solve(&catalog, &source_set(&["Product"]), &TypeName::new("CO2"), 0).unwrap();
    assert!(roots.is_empty());

    // The base case survives at depth zero.
    let roots = solve(&catalog, &source_set(&["CO2"]), &TypeName::new("CO2"), 0).unwrap();
    assert_eq!(roots.len(), 1);
}

#[test]
fn test_depth_bound_cuts_long_chains() {
    let catalog = parse_catalog(TWO_STEP).unwrap();
    let roots = solve(&catalog, &source_set(&["Product"]), &TypeName::new("CO2"), 1).unwrap();
    assert!(roots.is_empty());

    let roots = solve(&catalog, &source_set(&["Product"]), &TypeName::new("CO2"), 2).unwrap();
    assert_eq!(roots.len(), 1);
}

#[test]
fn test_missing_producer_contributes_no_candidate() {
    // agg needs S2, which nothing produces and no source supplies.
    let catalog = parse_catalog(
        "type Facility\ntype S1\ntype S2\ntype Total\nfn s1 {\n sig: Facility -> S1\n impl: formula(\"1\")\n}\nfn agg {\n sig: S1, S2 -> Total\n impl: formula(\"arg0 + arg1\")\n}\n",
    )
    .unwrap();
    let roots = solve(
        &catalog,
        &source_set(&["Facility"]),
        &TypeName::new("Total"),
        DEFAULT_MAX_DEPTH,
    )
    .unwrap();
    assert!(roots.is_empty());
}

#[test]
fn test_catalog_with_zero_functions() {
    let catalog = parse_catalog("type A\ntype B\n").unwrap();
    let as_source = solve(&catalog, &source_set(&["A"]), &TypeName::new("A"), 5).unwrap();
    assert_eq!(as_source.len(), 1);
    assert!(as_source[0].is_leaf());

    let unreachable = solve(&catalog, &source_set(&["A"]), &TypeName::new("B"), 5).unwrap();
    assert!(unreachable.is_empty());
}

#[test]
fn test_self_referential_function_terminates() {
    let catalog = parse_catalog(
        "type A\nfn grow {\n sig: A -> A\n impl: formula(\"value + 1\")\n}\n",
    )
    .unwrap();
    let roots = solve(&catalog, &source_set(&["A"]), &TypeName::new("A"), 3).unwrap();

    // The leaf ranks first (cost 0); deeper self-applications follow.
    assert!(!roots.is_empty());
    assert!(roots[0].is_leaf());
    for root in &roots {
        assert!(root.depth() <= 3);
    }
}

#[test]
fn test_unknown_goal_and_source_types() {
    let catalog = parse_catalog(TWO_STEP).unwrap();
    let err = solve(
        &catalog,
        &source_set(&["Product"]),
        &TypeName::new("Nope"),
        5,
    )
    .unwrap_err();
    assert!(matches!(err, SolverError::UnknownGoalType { .. }));

    let err = solve(&catalog, &source_set(&["Nope"]), &TypeName::new("CO2"), 5).unwrap_err();
    assert!(matches!(err, SolverError::UnknownSourceType { .. }));
}

#[test]
fn test_overloads_all_contribute() {
    let catalog = parse_catalog(
        "type A\ntype B\nfn conv {\n sig: A -> B\n impl: formula(\"value * 2\")\n cost: 1\n}\nfn conv {\n sig: A -> B\n impl: formula(\"value * 3\")\n cost: 2\n}\n",
    )
    .unwrap();
    let roots = solve(&catalog, &source_set(&["A"]), &TypeName::new("B"), 5).unwrap();
    assert_eq!(roots.len(), 2);
    assert!(roots[0].cost < roots[1].cost);
}
