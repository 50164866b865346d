//! Declaration parser for the catalog language.
//!
//! Two declaration shapes exist: `type` lines (atomic with optional
//! attributes, or products of declared components) and `fn name { ... }`
//! blocks. Type references are validated after the whole buffer is
//! parsed, so declaration order is immaterial.

use crate::error::{ParseError, ParseResult};
use crate::scanner::{scan, Line};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use tf_core::{
    BuiltinKind, Catalog, FunctionDefinition, FunctionName, Implementation, TypeDefinition,
    TypeName,
};

/// A fully parsed `fn` block, before reference validation.
struct FnDecl {
    name: FunctionName,
    domain: Vec<TypeName>,
    codomain: TypeName,
    implementation: Implementation,
    cost: f64,
    confidence: f64,
    doc: Option<String>,
    inverse_of: Option<(String, usize)>,
    sig_line: usize,
}

/// Parse a catalog buffer into an immutable [`Catalog`].
pub fn parse_catalog(input: &str) -> ParseResult<Catalog> {
    let lines = scan(input);
    let mut types: Vec<(TypeDefinition, usize)> = Vec::new();
    let mut functions: Vec<FnDecl> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        if let Some(rest) = line.text.strip_prefix("type ") {
            types.push((parse_type_decl(rest.trim(), line.number)?, line.number));
            i += 1;
        } else if let Some(rest) = line.text.strip_prefix("fn ") {
            let (decl, next) = parse_fn_block(rest.trim(), &lines, i)?;
            functions.push(decl);
            i = next;
        } else if let Some(rest) = line.text.strip_prefix("attr ") {
            apply_legacy_attr(rest.trim(), line.number, &mut types)?;
            i += 1;
        } else {
            return Err(ParseError::UnexpectedLine {
                line: line.number,
                content: line.text.clone(),
            });
        }
    }

    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for (ty, line) in &types {
        if first_seen.contains_key(ty.name.as_str()) {
            return Err(ParseError::DuplicateTypeName {
                name: ty.name.to_string(),
                line: *line,
            });
        }
        first_seen.insert(ty.name.to_string(), *line);
    }

    let declared: HashSet<&str> = types.iter().map(|(ty, _)| ty.name.as_str()).collect();
    for (ty, line) in &types {
        if let Some(components) = &ty.components {
            for component in components {
                if !declared.contains(component.as_str()) {
                    return Err(ParseError::UndeclaredTypeReference {
                        name: component.to_string(),
                        referrer: format!("type {}", ty.name),
                        line: *line,
                    });
                }
            }
        }
    }
    for decl in &functions {
        for ty in decl.domain.iter().chain(std::iter::once(&decl.codomain)) {
            if !declared.contains(ty.as_str()) {
                return Err(ParseError::UndeclaredTypeReference {
                    name: ty.to_string(),
                    referrer: format!("fn {}", decl.name),
                    line: decl.sig_line,
                });
            }
        }
    }

    let known_functions: HashSet<String> =
        functions.iter().map(|d| d.name.to_string()).collect();
    let defs: Vec<FunctionDefinition> = functions
        .into_iter()
        .map(|decl| {
            let inverse_of = decl.inverse_of.and_then(|(target, line)| {
                match FunctionName::try_new(target.as_str()) {
                    Some(name) if known_functions.contains(target.as_str()) => Some(name),
                    _ => {
                        warn!("line {line}: ignoring inverse_of '{target}': no such function");
                        None
                    }
                }
            });
            let mut def = FunctionDefinition::new(
                decl.name,
                decl.domain,
                decl.codomain,
                decl.implementation,
            )
            .with_cost(decl.cost)
            .with_confidence(decl.confidence);
            def.doc = decl.doc;
            def.inverse_of = inverse_of;
            def
        })
        .collect();

    debug!("parsed {} types, {} functions", types.len(), defs.len());
    let types = types.into_iter().map(|(ty, _)| ty).collect();
    Ok(Catalog::build(types, defs)?)
}

fn parse_type_name(text: &str, line: usize) -> ParseResult<TypeName> {
    TypeName::try_new(text).ok_or_else(|| ParseError::InvalidName {
        name: text.to_string(),
        line,
    })
}

/// Parse the remainder of a `type` line.
///
/// A declaration is a product iff a bare `=` appears before any `[`; this
/// keeps attribute values containing `=` from being mistaken for products.
fn parse_type_decl(rest: &str, line: usize) -> ParseResult<TypeDefinition> {
    let eq = rest.find('=');
    let bracket = rest.find('[');
    let is_product = match (eq, bracket) {
        (Some(e), Some(b)) => e < b,
        (Some(_), None) => true,
        _ => false,
    };

    if is_product {
        let (name_part, component_part) = rest.split_once('=').expect("checked above");
        let name = parse_type_name(name_part.trim(), line)?;
        let tokens: Vec<&str> = component_part.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ParseError::MalformedType {
                line,
                message: "missing product components".to_string(),
            });
        }
        if tokens.len() % 2 == 0 {
            return Err(ParseError::MalformedType {
                line,
                message: "trailing product separator".to_string(),
            });
        }
        let mut components = Vec::new();
        for (idx, token) in tokens.iter().enumerate() {
            if idx % 2 == 0 {
                components.push(parse_type_name(token, line)?);
            } else if *token != "x" && *token != "×" {
                return Err(ParseError::MalformedType {
                    line,
                    message: format!("expected product separator, found '{token}'"),
                });
            }
        }
        return Ok(TypeDefinition::product(name, components));
    }

    match bracket {
        None => Ok(TypeDefinition::atomic(parse_type_name(rest, line)?)),
        Some(pos) => {
            let name = parse_type_name(rest[..pos].trim(), line)?;
            let attr_part = rest[pos..].trim();
            let inner = attr_part
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| ParseError::MalformedType {
                    line,
                    message: "unterminated attribute block".to_string(),
                })?;
            Ok(TypeDefinition::atomic_with_attributes(
                name,
                parse_attributes(inner, line)?,
            ))
        }
    }
}

fn parse_attributes(inner: &str, line: usize) -> ParseResult<BTreeMap<String, String>> {
    let mut attributes = BTreeMap::new();
    if inner.trim().is_empty() {
        return Ok(attributes);
    }
    for pair in inner.split(',') {
        let (key, value) = pair.split_once('=').ok_or_else(|| ParseError::MalformedType {
            line,
            message: format!("expected key=value attribute, found '{}'", pair.trim()),
        })?;
        attributes.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(attributes)
}

/// Apply a legacy `attr key:value` line to the preceding atomic type.
fn apply_legacy_attr(
    rest: &str,
    line: usize,
    types: &mut [(TypeDefinition, usize)],
) -> ParseResult<()> {
    let Some((ty, _)) = types.last_mut() else {
        return Err(ParseError::MalformedType {
            line,
            message: "attr outside a type declaration".to_string(),
        });
    };
    if ty.is_product() {
        return Err(ParseError::MalformedType {
            line,
            message: format!("attr on product type {}", ty.name),
        });
    }
    let (key, value) = rest.split_once(':').ok_or_else(|| ParseError::MalformedType {
        line,
        message: "expected 'attr key:value'".to_string(),
    })?;
    ty.attributes
        .insert(key.trim().to_string(), value.trim().to_string());
    Ok(())
}

/// Parse a `fn name { ... }` block. Returns the declaration and the index
/// of the first line after the closing brace.
fn parse_fn_block(rest: &str, lines: &[Line], start: usize) -> ParseResult<(FnDecl, usize)> {
    let open_line = lines[start].number;
    let name_part = rest.strip_suffix('{').ok_or_else(|| ParseError::MalformedFunction {
        line: open_line,
        message: "expected '{' to open function block".to_string(),
    })?;
    let name = FunctionName::try_new(name_part.trim()).ok_or_else(|| ParseError::InvalidName {
        name: name_part.trim().to_string(),
        line: open_line,
    })?;

    let mut sig: Option<(Vec<TypeName>, TypeName, usize)> = None;
    let mut implementation: Option<Implementation> = None;
    let mut cost = 1.0;
    let mut confidence = 1.0;
    let mut doc: Option<String> = None;
    let mut inverse_of: Option<(String, usize)> = None;

    let mut j = start + 1;
    loop {
        if j >= lines.len() {
            return Err(ParseError::UnterminatedFunctionBlock {
                name: name.to_string(),
                line: open_line,
            });
        }
        let line = &lines[j];
        if line.text == "}" {
            j += 1;
            break;
        }
        let field_line = line.number;
        let Some((field, value)) = line.text.split_once(':') else {
            return Err(ParseError::UnexpectedLine {
                line: field_line,
                content: line.text.clone(),
            });
        };
        let field = field.trim();
        let mut value = value.trim().to_string();
        match field {
            "sig" => {
                let (domain, codomain) = parse_signature(&value, field_line)?;
                sig = Some((domain, codomain, field_line));
            }
            "impl" => {
                // The argument of json(...) and template(...) may span
                // lines; consume until parentheses balance.
                while paren_balance(&value) > 0 {
                    j += 1;
                    if j >= lines.len() || lines[j].text == "}" {
                        return Err(ParseError::MalformedImpl {
                            line: field_line,
                            message: "unterminated impl argument".to_string(),
                        });
                    }
                    value.push(' ');
                    value.push_str(&lines[j].text);
                }
                implementation = Some(parse_impl(&value, field_line)?);
            }
            "cost" => {
                let parsed = value.parse::<f64>().map_err(|_| ParseError::MalformedFunction {
                    line: field_line,
                    message: format!("invalid cost '{value}'"),
                })?;
                if !(parsed.is_finite() && parsed >= 0.0) {
                    return Err(ParseError::MalformedFunction {
                        line: field_line,
                        message: format!("cost must be a finite non-negative number, got {value}"),
                    });
                }
                cost = parsed;
            }
            "confidence" => {
                let parsed = value.parse::<f64>().map_err(|_| ParseError::MalformedFunction {
                    line: field_line,
                    message: format!("invalid confidence '{value}'"),
                })?;
                if !(parsed.is_finite() && (0.0..=1.0).contains(&parsed)) {
                    return Err(ParseError::MalformedFunction {
                        line: field_line,
                        message: format!("confidence must lie in [0, 1], got {value}"),
                    });
                }
                confidence = parsed;
            }
            "doc" => {
                doc = Some(parse_string_literal(&value).unwrap_or(value));
            }
            "inverse_of" => {
                inverse_of = Some((value, field_line));
            }
            other => {
                // Unknown fields are ignored for forward compatibility.
                debug!("line {field_line}: ignoring unknown function field '{other}'");
            }
        }
        j += 1;
    }

    let (domain, codomain, sig_line) = sig.ok_or_else(|| ParseError::MalformedSignature {
        line: open_line,
        message: format!("fn {name} has no sig field"),
    })?;
    let implementation = implementation.ok_or_else(|| ParseError::MalformedImpl {
        line: open_line,
        message: format!("fn {name} has no impl field"),
    })?;

    Ok((
        FnDecl {
            name,
            domain,
            codomain,
            implementation,
            cost,
            confidence,
            doc,
            inverse_of,
            sig_line,
        },
        j,
    ))
}

/// Parse `DOMAIN -> CODOMAIN`. The domain is a single name, a
/// parenthesized comma list, or a bare comma list.
fn parse_signature(value: &str, line: usize) -> ParseResult<(Vec<TypeName>, TypeName)> {
    let (domain_part, codomain_part) =
        value.split_once("->").ok_or_else(|| ParseError::MalformedSignature {
            line,
            message: "missing '->'".to_string(),
        })?;
    let codomain_part = codomain_part.trim();
    let codomain =
        TypeName::try_new(codomain_part).ok_or_else(|| ParseError::MalformedSignature {
            line,
            message: format!("invalid codomain '{codomain_part}'"),
        })?;

    let mut domain_part = domain_part.trim();
    if let Some(stripped) = domain_part
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        domain_part = stripped.trim();
    }
    if domain_part.is_empty() {
        return Err(ParseError::MalformedSignature {
            line,
            message: "empty domain".to_string(),
        });
    }
    let domain = domain_part
        .split(',')
        .map(|token| {
            let token = token.trim();
            TypeName::try_new(token).ok_or_else(|| ParseError::MalformedSignature {
                line,
                message: format!("invalid domain type '{token}'"),
            })
        })
        .collect::<ParseResult<Vec<_>>>()?;
    Ok((domain, codomain))
}

/// Parse `KIND(ARG)` into an [`Implementation`].
fn parse_impl(text: &str, line: usize) -> ParseResult<Implementation> {
    let text = text.trim();
    let open = text.find('(').ok_or_else(|| ParseError::MalformedImpl {
        line,
        message: "expected KIND(ARG)".to_string(),
    })?;
    let arg = text[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| ParseError::MalformedImpl {
            line,
            message: "expected closing ')'".to_string(),
        })?
        .trim();
    let kind = text[..open].trim();

    let quoted = |what: &str| {
        parse_string_literal(arg).ok_or_else(|| ParseError::MalformedImpl {
            line,
            message: format!("{what} argument must be a quoted string"),
        })
    };

    match kind {
        "formula" => Ok(Implementation::Formula(quoted("formula")?)),
        "sparql" => Ok(Implementation::Sparql(quoted("sparql")?)),
        "rest" => Ok(Implementation::Rest(quoted("rest")?)),
        "builtin" => {
            let name = parse_string_literal(arg).unwrap_or_else(|| arg.to_string());
            let builtin = name
                .parse::<BuiltinKind>()
                .map_err(|message| ParseError::MalformedImpl { line, message })?;
            Ok(Implementation::Builtin(builtin))
        }
        "json" => {
            let schema = serde_json::from_str(arg).map_err(|e| ParseError::MalformedImpl {
                line,
                message: format!("invalid JSON schema: {e}"),
            })?;
            Ok(Implementation::Json(schema))
        }
        "template" => {
            let wrapped = format!("[{arg}]");
            let (pattern, bindings): (String, BTreeMap<String, String>) =
                serde_json::from_str(&wrapped).map_err(|e| ParseError::MalformedImpl {
                    line,
                    message: format!("template argument must be (\"pattern\", {{bindings}}): {e}"),
                })?;
            Ok(Implementation::Template { pattern, bindings })
        }
        other => Err(ParseError::MalformedImpl {
            line,
            message: format!("unknown implementation kind '{other}'"),
        }),
    }
}

/// A double-quoted JSON string literal, if `text` is exactly one.
fn parse_string_literal(text: &str) -> Option<String> {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        serde_json::from_str::<String>(text).ok()
    } else {
        None
    }
}

/// Parenthesis balance of `text`, ignoring parens inside double-quoted
/// strings.
fn paren_balance(text: &str) -> i32 {
    let mut balance = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => balance += 1,
            ')' => balance -= 1,
            _ => {}
        }
    }
    balance
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
