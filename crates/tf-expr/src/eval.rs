//! Interpreter for the expression sub-language.
//!
//! Pure and deterministic: identifiers resolve only against the provided
//! scope, and only the closed whitelist of functions can be called. There
//! is no dynamic string-to-code conversion anywhere.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{CauseResult, EvalCause, EvalError, EvalResult};
use crate::parser::parse;
use crate::scope::Scope;
use std::collections::BTreeMap;
use tf_core::Value;

/// The closed set of callable functions.
pub const WHITELIST: [&str; 20] = [
    "abs",
    "round",
    "min",
    "max",
    "sum",
    "len",
    "sqrt",
    "log",
    "exp",
    "sin",
    "cos",
    "tan",
    "isinstance",
    "dict",
    "list",
    "tuple",
    "str",
    "int",
    "float",
    "dir",
];

/// Parse and evaluate an expression against a scope.
pub fn evaluate(expression: &str, scope: &Scope) -> EvalResult<Value> {
    parse(expression)
        .and_then(|ast| eval_expr(&ast, scope))
        .map_err(|cause| EvalError {
            expression: expression.to_string(),
            scope_keys: scope.keys(),
            cause,
        })
}

/// Truthiness: `false`, zero, and empty strings, tuples, and records are
/// falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Tuple(items) => !items.is_empty(),
        Value::Record(fields) => !fields.is_empty(),
    }
}

fn eval_expr(expr: &Expr, scope: &Scope) -> CauseResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Ident(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| EvalCause::UnknownIdentifier(name.clone())),
        Expr::Unary(op, operand) => {
            let operand = eval_expr(operand, scope)?;
            match op {
                UnaryOp::Plus => Ok(Value::Number(expect_number(&operand, "unary '+'")?)),
                UnaryOp::Neg => Ok(Value::Number(-expect_number(&operand, "unary '-'")?)),
                UnaryOp::Not => Ok(Value::Bool(!truthy(&operand))),
            }
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            if !truthy(&eval_expr(lhs, scope)?) {
                Ok(Value::Bool(false))
            } else {
                Ok(Value::Bool(truthy(&eval_expr(rhs, scope)?)))
            }
        }
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            if truthy(&eval_expr(lhs, scope)?) {
                Ok(Value::Bool(true))
            } else {
                Ok(Value::Bool(truthy(&eval_expr(rhs, scope)?)))
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval_expr(lhs, scope)?;
            let rhs = eval_expr(rhs, scope)?;
            eval_binary(*op, lhs, rhs)
        }
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            if truthy(&eval_expr(cond, scope)?) {
                eval_expr(then, scope)
            } else {
                eval_expr(otherwise, scope)
            }
        }
        Expr::Member { target, key } => {
            let target = eval_expr(target, scope)?;
            member(&target, key)
        }
        Expr::Index { target, index } => {
            let target = eval_expr(target, scope)?;
            let index = eval_expr(index, scope)?;
            match (&target, &index) {
                (Value::Record(_), Value::Str(key)) => member(&target, key),
                (Value::Tuple(items), Value::Number(n)) => {
                    if n.fract() != 0.0 {
                        return Err(EvalCause::Type(format!(
                            "sequence index must be an integer, got {n}"
                        )));
                    }
                    let raw = *n as i64;
                    let len = items.len();
                    let resolved = if raw < 0 { raw + len as i64 } else { raw };
                    if resolved < 0 || resolved as usize >= len {
                        return Err(EvalCause::IndexOutOfBounds { index: raw, len });
                    }
                    Ok(items[resolved as usize].clone())
                }
                _ => Err(EvalCause::Type(format!(
                    "cannot index {} with {}",
                    target.kind_name(),
                    index.kind_name()
                ))),
            }
        }
        Expr::Call { callee, args } => {
            let args = args
                .iter()
                .map(|arg| eval_expr(arg, scope))
                .collect::<CauseResult<Vec<_>>>()?;
            call_function(callee, args)
        }
    }
}

fn member(target: &Value, key: &str) -> CauseResult<Value> {
    match target {
        Value::Record(fields) => fields
            .get(key)
            .cloned()
            .ok_or_else(|| EvalCause::MissingKey(key.to_string())),
        other => Err(EvalCause::Type(format!(
            "cannot access member '{key}' of {}",
            other.kind_name()
        ))),
    }
}

fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> CauseResult<Value> {
    match op {
        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => finite(a + b),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            _ => Err(binary_type_error("+", &lhs, &rhs)),
        },
        BinaryOp::Sub => numeric(op, &lhs, &rhs, |a, b| Ok(a - b)),
        BinaryOp::Mul => numeric(op, &lhs, &rhs, |a, b| Ok(a * b)),
        BinaryOp::Div => numeric(op, &lhs, &rhs, |a, b| {
            if b == 0.0 {
                Err(EvalCause::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }),
        BinaryOp::Rem => numeric(op, &lhs, &rhs, |a, b| {
            if b == 0.0 {
                Err(EvalCause::DivisionByZero)
            } else {
                Ok(a % b)
            }
        }),
        BinaryOp::Pow => numeric(op, &lhs, &rhs, |a, b| Ok(a.powf(b))),
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::Ne => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (&lhs, &rhs) {
                (Value::Number(a), Value::Number(b)) => {
                    a.partial_cmp(b).ok_or_else(|| EvalCause::Type(
                        "cannot order NaN".to_string(),
                    ))?
                }
                (Value::Str(a), Value::Str(b)) => a.cmp(b),
                _ => return Err(binary_type_error(symbol(op), &lhs, &rhs)),
            };
            let holds = match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                BinaryOp::Ge => ordering.is_ge(),
                _ => unreachable!(),
            };
            Ok(Value::Bool(holds))
        }
        BinaryOp::And | BinaryOp::Or => unreachable!("short-circuited by the caller"),
    }
}

fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::Pow => "**",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

fn binary_type_error(op: &str, lhs: &Value, rhs: &Value) -> EvalCause {
    EvalCause::Type(format!(
        "cannot apply '{op}' to {} and {}",
        lhs.kind_name(),
        rhs.kind_name()
    ))
}

fn numeric(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    f: impl Fn(f64, f64) -> CauseResult<f64>,
) -> CauseResult<Value> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => finite(f(*a, *b)?),
        _ => Err(binary_type_error(symbol(op), lhs, rhs)),
    }
}

fn finite(n: f64) -> CauseResult<Value> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(EvalCause::Type("numeric result is not finite".to_string()))
    }
}

fn expect_number(value: &Value, context: &str) -> CauseResult<f64> {
    value.as_number().ok_or_else(|| {
        EvalCause::Type(format!("{context} expects a number, got {}", value.kind_name()))
    })
}

fn one_arg<'a>(name: &'static str, args: &'a [Value]) -> CauseResult<&'a Value> {
    match args {
        [arg] => Ok(arg),
        _ => Err(EvalCause::Arity {
            name,
            expected: "1",
            got: args.len(),
        }),
    }
}

fn one_number(name: &'static str, args: &[Value]) -> CauseResult<f64> {
    expect_number(one_arg(name, args)?, name)
}

/// Numbers to fold for `min`/`max`: a single sequence argument, or the
/// arguments themselves.
fn fold_operands(name: &'static str, args: &[Value]) -> CauseResult<Vec<f64>> {
    let items: &[Value] = match args {
        [] => {
            return Err(EvalCause::Arity {
                name,
                expected: "1 or more",
                got: 0,
            });
        }
        [Value::Tuple(items)] => items,
        _ => args,
    };
    if items.is_empty() {
        return Err(EvalCause::Type(format!("{name} of an empty sequence")));
    }
    items.iter().map(|item| expect_number(item, name)).collect()
}

fn call_function(name: &str, args: Vec<Value>) -> CauseResult<Value> {
    match name {
        "abs" => finite(one_number("abs", &args)?.abs()),
        "round" => finite(one_number("round", &args)?.round()),
        "sqrt" => math(one_number("sqrt", &args)?.sqrt()),
        "log" => math(one_number("log", &args)?.ln()),
        "exp" => math(one_number("exp", &args)?.exp()),
        "sin" => math(one_number("sin", &args)?.sin()),
        "cos" => math(one_number("cos", &args)?.cos()),
        "tan" => math(one_number("tan", &args)?.tan()),
        "min" => {
            let operands = fold_operands("min", &args)?;
            finite(operands.into_iter().fold(f64::INFINITY, f64::min))
        }
        "max" => {
            let operands = fold_operands("max", &args)?;
            finite(operands.into_iter().fold(f64::NEG_INFINITY, f64::max))
        }
        "sum" => {
            let arg = one_arg("sum", &args)?;
            let items = arg.as_sequence().ok_or_else(|| {
                EvalCause::Type(format!("sum expects a sequence, got {}", arg.kind_name()))
            })?;
            let mut total = 0.0;
            for item in items {
                total += expect_number(item, "sum")?;
            }
            finite(total)
        }
        "len" => {
            let len = match one_arg("len", &args)? {
                Value::Str(s) => s.chars().count(),
                Value::Tuple(items) => items.len(),
                Value::Record(fields) => fields.len(),
                other => {
                    return Err(EvalCause::Type(format!(
                        "len expects a string, tuple, or record, got {}",
                        other.kind_name()
                    )));
                }
            };
            Ok(Value::Number(len as f64))
        }
        "isinstance" => {
            let (value, kind) = match args.as_slice() {
                [value, Value::Str(kind)] => (value, kind.as_str()),
                [_, other] => {
                    return Err(EvalCause::Type(format!(
                        "isinstance expects a type-name string, got {}",
                        other.kind_name()
                    )));
                }
                _ => {
                    return Err(EvalCause::Arity {
                        name: "isinstance",
                        expected: "2",
                        got: args.len(),
                    });
                }
            };
            let matches = match kind {
                "number" | "int" | "float" => matches!(value, Value::Number(_)),
                "str" | "string" => matches!(value, Value::Str(_)),
                "bool" => matches!(value, Value::Bool(_)),
                "list" | "tuple" => matches!(value, Value::Tuple(_)),
                "dict" | "record" => matches!(value, Value::Record(_)),
                other => {
                    return Err(EvalCause::Type(format!("unknown type name '{other}'")));
                }
            };
            Ok(Value::Bool(matches))
        }
        "dict" => match args.as_slice() {
            [] => Ok(Value::Record(BTreeMap::new())),
            [Value::Record(fields)] => Ok(Value::Record(fields.clone())),
            [other] => Err(EvalCause::Type(format!(
                "dict expects a record, got {}",
                other.kind_name()
            ))),
            _ => Err(EvalCause::Arity {
                name: "dict",
                expected: "0 or 1",
                got: args.len(),
            }),
        },
        "list" | "tuple" => {
            let items = match one_arg("tuple", &args)? {
                Value::Tuple(items) => items.clone(),
                Value::Record(fields) => {
                    fields.keys().map(|k| Value::Str(k.clone())).collect()
                }
                Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
                other => {
                    return Err(EvalCause::Type(format!(
                        "cannot convert {} to a sequence",
                        other.kind_name()
                    )));
                }
            };
            Ok(Value::Tuple(items))
        }
        "str" => Ok(Value::Str(one_arg("str", &args)?.to_string())),
        "int" => {
            let n = match one_arg("int", &args)? {
                Value::Number(n) => *n,
                Value::Bool(b) => {
                    if *b {
                        1.0
                    } else {
                        0.0
                    }
                }
                Value::Str(s) => s.trim().parse::<f64>().map_err(|_| {
                    EvalCause::Type(format!("cannot convert '{s}' to a number"))
                })?,
                other => {
                    return Err(EvalCause::Type(format!(
                        "cannot convert {} to a number",
                        other.kind_name()
                    )));
                }
            };
            finite(n.trunc())
        }
        "float" => {
            let n = match one_arg("float", &args)? {
                Value::Number(n) => *n,
                Value::Bool(b) => {
                    if *b {
                        1.0
                    } else {
                        0.0
                    }
                }
                Value::Str(s) => s.trim().parse::<f64>().map_err(|_| {
                    EvalCause::Type(format!("cannot convert '{s}' to a number"))
                })?,
                other => {
                    return Err(EvalCause::Type(format!(
                        "cannot convert {} to a number",
                        other.kind_name()
                    )));
                }
            };
            finite(n)
        }
        "dir" => {
            let keys = match one_arg("dir", &args)? {
                Value::Record(fields) => fields.keys().map(|k| Value::Str(k.clone())).collect(),
                _ => Vec::new(),
            };
            Ok(Value::Tuple(keys))
        }
        other => Err(EvalCause::UnknownFunction(other.to_string())),
    }
}

/// Math results must stay in the finite domain; `sqrt(-1)` and friends are
/// reported, not propagated as NaN.
fn math(n: f64) -> CauseResult<Value> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(EvalCause::Type("math domain error".to_string()))
    }
}

#[cfg(test)]
#[path = "eval_test.rs"]
mod tests;
