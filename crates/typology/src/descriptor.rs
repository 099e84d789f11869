//! Type descriptors — the data-driven schema language.

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::SchemaError;
use crate::value::Value;

/// A type descriptor: the shape a value is checked against.
///
/// The `Array` variant deliberately holds a `Vec` rather than a single
/// boxed element: an array schema is only well-formed when it contains
/// exactly one element type, and `Registry::is_valid` rejects any other
/// arity instead of the type system silently ruling it out.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// An atomic-union expression, e.g. `"?number|string"`.
    Atomic(String),
    /// A closed object shape: the value may contain only the declared keys.
    Object(IndexMap<String, Descriptor>),
    /// A homogeneous array: every element matches the single element type.
    Array(Vec<Descriptor>),
}

impl Descriptor {
    /// Builds a descriptor from a dynamic value: strings become atomic
    /// expressions, objects and arrays recurse. Any other kind of value is
    /// not a descriptor.
    pub fn from_value(value: &Value) -> Result<Descriptor, SchemaError> {
        match value {
            Value::Str(s) => Ok(Descriptor::Atomic(s.clone())),
            Value::Obj(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), Descriptor::from_value(v)?)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Descriptor::Object),
            Value::Arr(items) => items
                .iter()
                .map(Descriptor::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Descriptor::Array),
            _ => Err(SchemaError::InvalidType),
        }
    }

    /// Builds a descriptor from JSON, for schemas written with `json!`.
    pub fn from_json(json: &Json) -> Result<Descriptor, SchemaError> {
        Descriptor::from_value(&Value::from(json))
    }
}

impl From<&str> for Descriptor {
    fn from(expr: &str) -> Self {
        Descriptor::Atomic(expr.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(expr: String) -> Self {
        Descriptor::Atomic(expr)
    }
}

/// A parsed atomic-union expression: at most one leading modifier, then
/// pipe-separated member names.
///
/// Parsing never fails; whether each member names a native tag or a
/// registered custom type is the registry's concern. A string carrying both
/// modifiers (`"?!string"`, `"!?string"`) is flagged as `double_modifier`
/// and rejected wherever validity is checked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AtomicExpr<'a> {
    pub optional: bool,
    pub exclusive: bool,
    /// A second leading modifier remained after stripping the first.
    pub double_modifier: bool,
    pub members: Vec<&'a str>,
}

impl<'a> AtomicExpr<'a> {
    pub fn parse(expr: &'a str) -> AtomicExpr<'a> {
        let (optional, exclusive, rest) = match expr.as_bytes().first() {
            Some(b'?') => (true, false, &expr[1..]),
            Some(b'!') => (false, true, &expr[1..]),
            _ => (false, false, expr),
        };
        let double_modifier =
            (optional || exclusive) && matches!(rest.as_bytes().first(), Some(b'?' | b'!'));
        AtomicExpr {
            optional,
            exclusive,
            double_modifier,
            members: rest.split('|').collect(),
        }
    }
}
