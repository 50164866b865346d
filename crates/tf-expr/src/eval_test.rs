use super::*;
use std::collections::BTreeMap;

fn scope_with(pairs: &[(&str, Value)]) -> Scope {
    let mut scope = Scope::new();
    for (name, value) in pairs {
        scope.bind(*name, value.clone());
    }
    scope
}

fn eval(expr: &str) -> Value {
    evaluate(expr, &Scope::new()).unwrap()
}

fn record(pairs: &[(&str, Value)]) -> Value {
    Value::Record(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
    assert_eq!(eval("2 ** 3 ** 2"), Value::Number(512.0));
    assert_eq!(eval("-2 ** 2"), Value::Number(-4.0));
    assert_eq!(eval("7 % 4"), Value::Number(3.0));
    assert_eq!(eval("9 / 2"), Value::Number(4.5));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(eval("'a' + 'b'"), Value::Str("ab".to_string()));
}

#[test]
fn test_comparisons_and_logic() {
    assert_eq!(eval("1 < 2"), Value::Bool(true));
    assert_eq!(eval("'a' < 'b'"), Value::Bool(true));
    assert_eq!(eval("1 == 1 && 2 != 3"), Value::Bool(true));
    assert_eq!(eval("false || 5"), Value::Bool(true));
    assert_eq!(eval("!0"), Value::Bool(true));
}

#[test]
fn test_short_circuit_avoids_rhs_error() {
    // The right side divides by zero; && must not evaluate it.
    assert_eq!(eval("false && 1 / 0"), Value::Bool(false));
    assert_eq!(eval("true || 1 / 0"), Value::Bool(true));
}

#[test]
fn test_ternary() {
    assert_eq!(eval("1 < 2 ? 'yes' : 'no'"), Value::Str("yes".to_string()));
    assert_eq!(eval("0 ? 'yes' : 'no'"), Value::Str("no".to_string()));
}

#[test]
fn test_identifier_lookup() {
    let scope = scope_with(&[("value", Value::Number(1000.0))]);
    assert_eq!(
        evaluate("value * 0.5", &scope).unwrap(),
        Value::Number(500.0)
    );
}

#[test]
fn test_unknown_identifier() {
    let err = evaluate("missing + 1", &Scope::new()).unwrap_err();
    assert_eq!(err.cause, EvalCause::UnknownIdentifier("missing".to_string()));
    assert_eq!(err.expression, "missing + 1");
}

#[test]
fn test_member_and_index_access() {
    let rec = record(&[("fuel", Value::Number(400.0)), ("elec", Value::Number(3000.0))]);
    let scope = scope_with(&[("value", rec)]);

    assert_eq!(
        evaluate("value.fuel + value['elec']", &scope).unwrap(),
        Value::Number(3400.0)
    );
}

#[test]
fn test_missing_key() {
    let scope = scope_with(&[("value", record(&[]))]);
    let err = evaluate("value.nope", &scope).unwrap_err();
    assert_eq!(err.cause, EvalCause::MissingKey("nope".to_string()));
}

#[test]
fn test_sequence_indexing() {
    let seq = Value::Tuple(vec![
        Value::Number(10.0),
        Value::Number(20.0),
        Value::Number(30.0),
    ]);
    let scope = scope_with(&[("seq", seq)]);

    assert_eq!(evaluate("seq[0]", &scope).unwrap(), Value::Number(10.0));
    assert_eq!(evaluate("seq[-1]", &scope).unwrap(), Value::Number(30.0));
    let err = evaluate("seq[3]", &scope).unwrap_err();
    assert_eq!(err.cause, EvalCause::IndexOutOfBounds { index: 3, len: 3 });
}

#[test]
fn test_division_by_zero() {
    let err = evaluate("1 / 0", &Scope::new()).unwrap_err();
    assert_eq!(err.cause, EvalCause::DivisionByZero);
}

#[test]
fn test_whitelisted_functions() {
    assert_eq!(eval("abs(-3)"), Value::Number(3.0));
    assert_eq!(eval("round(2.6)"), Value::Number(3.0));
    assert_eq!(eval("min(3, 1, 2)"), Value::Number(1.0));
    assert_eq!(eval("max(3, 1, 2)"), Value::Number(3.0));
    assert_eq!(eval("sqrt(9)"), Value::Number(3.0));
    assert_eq!(eval("len('abc')"), Value::Number(3.0));
    assert_eq!(eval("str(42)"), Value::Str("42".to_string()));
    assert_eq!(eval("int('7')"), Value::Number(7.0));
    assert_eq!(eval("int(2.9)"), Value::Number(2.0));
    assert_eq!(eval("float('2.5')"), Value::Number(2.5));
}

#[test]
fn test_sum_and_len_over_sequences() {
    let seq = Value::Tuple(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);
    let scope = scope_with(&[("seq", seq)]);
    assert_eq!(evaluate("sum(seq)", &scope).unwrap(), Value::Number(6.0));
    assert_eq!(evaluate("len(seq)", &scope).unwrap(), Value::Number(3.0));
    assert_eq!(evaluate("min(seq)", &scope).unwrap(), Value::Number(1.0));
}

#[test]
fn test_isinstance() {
    assert_eq!(eval("isinstance(1, 'number')"), Value::Bool(true));
    assert_eq!(eval("isinstance('a', 'str')"), Value::Bool(true));
    assert_eq!(eval("isinstance(1, 'str')"), Value::Bool(false));
    let scope = scope_with(&[("r", record(&[]))]);
    assert_eq!(
        evaluate("isinstance(r, 'dict')", &scope).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_dir_and_dict() {
    let rec = record(&[("a", Value::Number(1.0)), ("b", Value::Number(2.0))]);
    let scope = scope_with(&[("r", rec)]);
    assert_eq!(
        evaluate("dir(r)", &scope).unwrap(),
        Value::Tuple(vec![Value::Str("a".to_string()), Value::Str("b".to_string())])
    );
    assert_eq!(evaluate("len(dict(r))", &scope).unwrap(), Value::Number(2.0));
}

#[test]
fn test_unknown_function_is_rejected() {
    let err = evaluate("system('rm -rf /')", &Scope::new()).unwrap_err();
    assert_eq!(err.cause, EvalCause::UnknownFunction("system".to_string()));
    assert!(err.to_string().contains("unknown function 'system'"));
}

#[test]
fn test_eval_and_exec_like_names_rejected() {
    for expr in ["eval('1')", "exec('1')", "open('/etc/passwd')", "__import__('os')"] {
        let err = evaluate(expr, &Scope::new()).unwrap_err();
        assert!(
            matches!(err.cause, EvalCause::UnknownFunction(_) | EvalCause::Syntax(_)),
            "{expr} must not evaluate"
        );
    }
}

#[test]
fn test_math_domain_errors() {
    assert!(evaluate("sqrt(-1)", &Scope::new()).is_err());
    assert!(evaluate("log(0)", &Scope::new()).is_err());
}

#[test]
fn test_type_errors_carry_kind_names() {
    let err = evaluate("'a' * 2", &Scope::new()).unwrap_err();
    match err.cause {
        EvalCause::Type(message) => {
            assert!(message.contains("string"));
            assert!(message.contains("number"));
        }
        other => panic!("expected type error, got {other:?}"),
    }
}

#[test]
fn test_error_reports_scope_keys() {
    let scope = scope_with(&[("arg0", Value::Number(1.0)), ("arg1", Value::Number(2.0))]);
    let err = evaluate("arg2", &scope).unwrap_err();
    assert_eq!(err.scope_keys, vec!["arg0".to_string(), "arg1".to_string()]);
}

#[test]
fn test_determinism() {
    let scope = scope_with(&[("value", Value::Number(7.0))]);
    let a = evaluate("value * 3 + 1", &scope).unwrap();
    let b = evaluate("value * 3 + 1", &scope).unwrap();
    assert_eq!(a, b);
}
