//! The recursive matcher.
//!
//! Dispatch is an exhaustive match on the descriptor variant. The two
//! failure channels stay disjoint throughout: `Err` is a malformed schema
//! (programmer fault), `Ok(Some(_))` is a value mismatch (data). The first
//! mismatch found at any level wins; matching never continues past it.

use indexmap::IndexMap;

use crate::classify::{classify, is_native_member, Tag};
use crate::descriptor::{AtomicExpr, Descriptor};
use crate::error::{PathSegment, SchemaError, ValidationError};
use crate::registry::{Registry, TypeDef};
use crate::value::Value;

/// Bound on consecutive custom-type expansions between two descents into
/// value structure. Descending into an object field or array element resets
/// the count, so arbitrarily deep values stay scannable; only a definition
/// that expands without consuming the value — a cycle — can reach the bound.
const MAX_EXPANSIONS: usize = 128;

pub(crate) fn scan(
    registry: &Registry,
    value: &Value,
    descriptor: &Descriptor,
) -> Result<Option<ValidationError>, SchemaError> {
    scan_at(registry, value, descriptor, 0)
}

fn scan_at(
    registry: &Registry,
    value: &Value,
    descriptor: &Descriptor,
    expansions: usize,
) -> Result<Option<ValidationError>, SchemaError> {
    if expansions > MAX_EXPANSIONS {
        return Err(SchemaError::RecursionLimit);
    }
    match descriptor {
        Descriptor::Atomic(expr) => scan_atomic(registry, value, descriptor, expr, expansions),
        Descriptor::Object(fields) => scan_object(registry, value, descriptor, fields),
        Descriptor::Array(items) => scan_array(registry, value, descriptor, items),
    }
}

fn scan_atomic(
    registry: &Registry,
    value: &Value,
    descriptor: &Descriptor,
    expr: &str,
    expansions: usize,
) -> Result<Option<ValidationError>, SchemaError> {
    let parsed = AtomicExpr::parse(expr);

    // The expression must be well-formed before any value judgement; the
    // two modifiers never combine.
    if parsed.double_modifier {
        return Err(SchemaError::InvalidType);
    }
    for member in &parsed.members {
        if !is_native_member(member) && !registry.knows(member) {
            return Err(SchemaError::InvalidType);
        }
    }

    // Custom members first, in expression order: a matching custom type
    // short-circuits both the null handling and the native tag test below.
    for member in &parsed.members {
        if let Some(def) = registry.lookup(member) {
            let matches = match def {
                TypeDef::Predicate(predicate) => predicate(registry, value),
                TypeDef::Schema(nested) => {
                    // Expanding a definition consumes no value structure,
                    // so this is the one recursion the bound meters.
                    scan_at(registry, value, nested, expansions + 1)?.is_none()
                }
            };
            if matches {
                if parsed.exclusive {
                    let mut error = ValidationError::new(
                        format!("The type \"{}\" is not allowed.", member),
                        descriptor,
                        value,
                    );
                    error.matched = Some((*member).to_string());
                    return Ok(Some(error));
                }
                return Ok(None);
            }
        }
    }

    let tag = classify(value);
    if matches!(tag, Tag::Null | Tag::Undefined) {
        // Both modifiers tolerate absence.
        if parsed.optional || parsed.exclusive {
            return Ok(None);
        }
        return Ok(Some(ValidationError::new(
            format!("The type \"{}\" is not allowed.", tag),
            descriptor,
            value,
        )));
    }

    let has_star = parsed.members.iter().any(|m| *m == "*");
    let has_type_of = parsed.members.iter().any(|m| *m == tag.as_str());
    match (parsed.exclusive, has_star || has_type_of) {
        (true, true) => {
            let matched = if has_type_of { tag.as_str() } else { "*" };
            let mut error = ValidationError::new(
                format!("The type \"{}\" is not allowed.", matched),
                descriptor,
                value,
            );
            error.matched = Some(matched.to_string());
            Ok(Some(error))
        }
        (false, false) => Ok(Some(ValidationError::new(
            format!("The type \"{}\" is not allowed.", tag),
            descriptor,
            value,
        ))),
        (true, false) | (false, true) => Ok(None),
    }
}

fn scan_object(
    registry: &Registry,
    value: &Value,
    descriptor: &Descriptor,
    fields: &IndexMap<String, Descriptor>,
) -> Result<Option<ValidationError>, SchemaError> {
    let entries = match value {
        Value::Obj(entries) => entries,
        _ => {
            return Ok(Some(ValidationError::new(
                "An object is expected.",
                descriptor,
                value,
            )))
        }
    };

    // Declared keys first; a missing key scans as `undefined`, so only an
    // optional or exclusive field descriptor tolerates it.
    for (key, field) in fields {
        let child = entries.get(key).unwrap_or(&Value::Undefined);
        if let Some(sub) = scan_at(registry, child, field, 0)? {
            return Ok(Some(ValidationError::nested(
                "A sub-object does not match the required type.",
                descriptor,
                value,
                PathSegment::Key(key.clone()),
                sub,
            )));
        }
    }

    // Object shapes are closed: every present key must be declared.
    for key in entries.keys() {
        if !fields.contains_key(key) {
            return Ok(Some(ValidationError::new(
                format!("The key \"{}\" is not expected.", key),
                descriptor,
                value,
            )));
        }
    }

    Ok(None)
}

fn scan_array(
    registry: &Registry,
    value: &Value,
    descriptor: &Descriptor,
    items: &[Descriptor],
) -> Result<Option<ValidationError>, SchemaError> {
    let element = match items {
        [element] => element,
        _ => return Err(SchemaError::ArrayArity(items.len())),
    };

    let values = match value {
        Value::Arr(values) => values,
        _ => {
            return Ok(Some(ValidationError::new(
                "An array is expected.",
                descriptor,
                value,
            )))
        }
    };

    for (index, item) in values.iter().enumerate() {
        if let Some(sub) = scan_at(registry, item, element, 0)? {
            return Ok(Some(ValidationError::nested(
                format!(
                    "The {}-th element of the array does not match the required type.",
                    index
                ),
                descriptor,
                value,
                PathSegment::Index(index),
                sub,
            )));
        }
    }

    Ok(None)
}
