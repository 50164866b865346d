use super::*;
use crate::function::Implementation;
use crate::function_name::FunctionName;
use crate::type_name::TypeName;

fn func(name: &str, domain: &[&str], codomain: &str) -> Arc<crate::function::FunctionDefinition> {
    Arc::new(crate::function::FunctionDefinition::new(
        FunctionName::new(name),
        domain.iter().map(|d| TypeName::new(*d)).collect(),
        TypeName::new(codomain),
        Implementation::Formula("value".to_string()),
    ))
}

#[test]
fn test_children_scheduled_before_parent() {
    let leaf = SolutionNode::leaf(TypeName::new("A"));
    let mid = SolutionNode::apply(func("f", &["A"], "B"), vec![leaf]);
    let root = SolutionNode::apply(func("g", &["B"], "C"), vec![mid]);

    let schedule = PlanSchedule::build(&root).unwrap();
    let order = schedule.evaluation_order();

    assert_eq!(order.len(), 3);
    let pos = |name: &str| {
        order
            .iter()
            .position(|n| n.produced.as_str() == name)
            .unwrap()
    };
    assert!(pos("A") < pos("B"));
    assert!(pos("B") < pos("C"));
}

#[test]
fn test_shared_leaf_scheduled_once() {
    let shared = SolutionNode::leaf(TypeName::new("A"));
    let left = SolutionNode::apply(func("f", &["A"], "B"), vec![Arc::clone(&shared)]);
    let right = SolutionNode::apply(func("g", &["A"], "C"), vec![Arc::clone(&shared)]);
    let root = SolutionNode::apply(func("h", &["B", "C"], "D"), vec![left, right]);

    let schedule = PlanSchedule::build(&root).unwrap();

    // Five distinct nodes even though the leaf is referenced twice.
    assert_eq!(schedule.len(), 5);
    let leaf_count = schedule
        .evaluation_order()
        .iter()
        .filter(|n| n.is_leaf())
        .count();
    assert_eq!(leaf_count, 1);
}

#[test]
fn test_structurally_equal_leaves_not_merged() {
    let left_leaf = SolutionNode::leaf(TypeName::new("A"));
    let right_leaf = SolutionNode::leaf(TypeName::new("A"));
    let left = SolutionNode::apply(func("f", &["A"], "B"), vec![left_leaf]);
    let right = SolutionNode::apply(func("g", &["A"], "C"), vec![right_leaf]);
    let root = SolutionNode::apply(func("h", &["B", "C"], "D"), vec![left, right]);

    let schedule = PlanSchedule::build(&root).unwrap();
    assert_eq!(schedule.len(), 6);
}
