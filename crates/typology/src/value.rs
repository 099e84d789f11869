//! Dynamic runtime values — everything a descriptor can be checked against.
//!
//! Upstream typology runs against host-language runtime values. This module
//! models that value universe explicitly: the JSON kinds plus the non-JSON
//! kinds the classifier must tell apart (`undefined`, dates, regular
//! expressions, functions and arguments objects).

use indexmap::IndexMap;
use serde_json::Value as Json;

/// A dynamic runtime value.
///
/// Object entries keep their insertion order, so validation reports the
/// first failing key deterministically for a given input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence-of-a-value sentinel, distinct from `Null`.
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Arr(Vec<Value>),
    Obj(IndexMap<String, Value>),
    /// A date, as milliseconds since the Unix epoch.
    Date(i64),
    /// A regular expression, by pattern source.
    Regexp(String),
    /// An opaque function value.
    Func,
    /// An arguments object: positional values that are not a real array.
    Args(Vec<Value>),
}

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Num(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::Arr(items.iter().map(Value::from).collect()),
            Json::Object(map) => Value::Obj(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Value::from(&json)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
