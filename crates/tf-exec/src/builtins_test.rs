use super::*;

fn seq(items: &[f64]) -> Value {
    Value::Tuple(items.iter().map(|n| Value::Number(*n)).collect())
}

#[test]
fn test_identity() {
    let input = Value::Str("unchanged".to_string());
    assert_eq!(
        apply(BuiltinKind::Identity, &[input.clone()]).unwrap(),
        input
    );
}

#[test]
fn test_identity_requires_sole_input() {
    let err = apply(BuiltinKind::Identity, &[]).unwrap_err();
    assert!(err.contains("exactly one input"));
}

#[test]
fn test_sequence_aggregates() {
    let input = seq(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(
        apply(BuiltinKind::Sum, &[input.clone()]).unwrap(),
        Value::Number(10.0)
    );
    assert_eq!(
        apply(BuiltinKind::Product, &[input.clone()]).unwrap(),
        Value::Number(24.0)
    );
    assert_eq!(
        apply(BuiltinKind::Average, &[input.clone()]).unwrap(),
        Value::Number(2.5)
    );
    assert_eq!(
        apply(BuiltinKind::First, &[input.clone()]).unwrap(),
        Value::Number(1.0)
    );
    assert_eq!(
        apply(BuiltinKind::Last, &[input.clone()]).unwrap(),
        Value::Number(4.0)
    );
    assert_eq!(
        apply(BuiltinKind::Count, &[input]).unwrap(),
        Value::Number(4.0)
    );
}

#[test]
fn test_empty_sequence_edges() {
    let empty = seq(&[]);
    assert_eq!(
        apply(BuiltinKind::Sum, &[empty.clone()]).unwrap(),
        Value::Number(0.0)
    );
    assert_eq!(
        apply(BuiltinKind::Count, &[empty.clone()]).unwrap(),
        Value::Number(0.0)
    );
    assert!(apply(BuiltinKind::Average, &[empty.clone()]).is_err());
    assert!(apply(BuiltinKind::First, &[empty.clone()]).is_err());
    assert!(apply(BuiltinKind::Last, &[empty]).is_err());
}

#[test]
fn test_numeric_builtins() {
    assert_eq!(
        apply(BuiltinKind::Abs, &[Value::Number(-3.5)]).unwrap(),
        Value::Number(3.5)
    );
    assert_eq!(
        apply(BuiltinKind::Round, &[Value::Number(2.6)]).unwrap(),
        Value::Number(3.0)
    );
}

#[test]
fn test_kind_mismatches() {
    let err = apply(BuiltinKind::Sum, &[Value::Number(1.0)]).unwrap_err();
    assert!(err.contains("sequence"));

    let err = apply(BuiltinKind::Abs, &[Value::Str("x".to_string())]).unwrap_err();
    assert!(err.contains("numeric"));

    let err = apply(BuiltinKind::Sum, &[seq(&[1.0]), seq(&[2.0])]).unwrap_err();
    assert!(err.contains("exactly one input"));
}
