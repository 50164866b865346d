//! The closed set of builtin aggregate implementations.

use tf_core::{BuiltinKind, Value};

/// Apply a builtin to the evaluated inputs.
pub fn apply(kind: BuiltinKind, inputs: &[Value]) -> Result<Value, String> {
    match kind {
        BuiltinKind::Identity => Ok(sole(kind, inputs)?.clone()),
        BuiltinKind::Sum => {
            let items = sequence(kind, inputs)?;
            let mut total = 0.0;
            for item in items {
                total += number_item(kind, item)?;
            }
            Ok(Value::Number(total))
        }
        BuiltinKind::Product => {
            let items = sequence(kind, inputs)?;
            let mut total = 1.0;
            for item in items {
                total *= number_item(kind, item)?;
            }
            Ok(Value::Number(total))
        }
        BuiltinKind::Average => {
            let items = sequence(kind, inputs)?;
            if items.is_empty() {
                return Err("average of an empty sequence".to_string());
            }
            let mut total = 0.0;
            for item in items {
                total += number_item(kind, item)?;
            }
            Ok(Value::Number(total / items.len() as f64))
        }
        BuiltinKind::First => sequence(kind, inputs)?
            .first()
            .cloned()
            .ok_or_else(|| "first of an empty sequence".to_string()),
        BuiltinKind::Last => sequence(kind, inputs)?
            .last()
            .cloned()
            .ok_or_else(|| "last of an empty sequence".to_string()),
        BuiltinKind::Count => Ok(Value::Number(sequence(kind, inputs)?.len() as f64)),
        BuiltinKind::Abs => Ok(Value::Number(number(kind, sole(kind, inputs)?)?.abs())),
        BuiltinKind::Round => Ok(Value::Number(number(kind, sole(kind, inputs)?)?.round())),
    }
}

fn sole(kind: BuiltinKind, inputs: &[Value]) -> Result<&Value, String> {
    match inputs {
        [input] => Ok(input),
        _ => Err(format!(
            "builtin {kind} expects exactly one input, got {}",
            inputs.len()
        )),
    }
}

fn sequence(kind: BuiltinKind, inputs: &[Value]) -> Result<&[Value], String> {
    let input = sole(kind, inputs)?;
    input.as_sequence().ok_or_else(|| {
        format!(
            "builtin {kind} expects a sequence input, got {}",
            input.kind_name()
        )
    })
}

fn number(kind: BuiltinKind, value: &Value) -> Result<f64, String> {
    value.as_number().ok_or_else(|| {
        format!(
            "builtin {kind} expects a numeric input, got {}",
            value.kind_name()
        )
    })
}

fn number_item(kind: BuiltinKind, value: &Value) -> Result<f64, String> {
    value.as_number().ok_or_else(|| {
        format!(
            "builtin {kind} expects a sequence of numbers, found {}",
            value.kind_name()
        )
    })
}

#[cfg(test)]
#[path = "builtins_test.rs"]
mod tests;
