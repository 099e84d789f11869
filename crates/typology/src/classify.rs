//! Value classification — the canonical type tag of any runtime value.

use std::fmt;

use crate::value::Value;

/// Canonical type tag of a runtime value.
///
/// A closed set: the two absence sentinels, the nine recognized native
/// kinds, and `Object` as the fallback for every other reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Undefined,
    Null,
    Arguments,
    Boolean,
    Number,
    String,
    Function,
    Array,
    Date,
    Regexp,
    Object,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Arguments => "arguments",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Function => "function",
            Self::Array => "array",
            Self::Date => "date",
            Self::Regexp => "regexp",
            Self::Object => "object",
        }
    }

    /// Resolves a native member name as used inside atomic-union
    /// expressions. `null` and `undefined` are classification results, not
    /// addressable members, and the `*` wildcard is handled separately.
    pub fn from_name(name: &str) -> Option<Tag> {
        match name {
            "arguments" => Some(Self::Arguments),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "function" => Some(Self::Function),
            "array" => Some(Self::Array),
            "date" => Some(Self::Date),
            "regexp" => Some(Self::Regexp),
            "object" => Some(Self::Object),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for names admissible in atomic-union expressions without a registry
/// lookup. These names are also reserved: no custom type may shadow them.
pub(crate) fn is_native_member(name: &str) -> bool {
    name == "*" || Tag::from_name(name).is_some()
}

/// Returns the canonical tag of a value.
///
/// Classification is intrinsic: it is driven by the value's own kind alone,
/// never by its structure or contents, and is independent of any registry.
pub fn classify(value: &Value) -> Tag {
    match value {
        Value::Undefined => Tag::Undefined,
        Value::Null => Tag::Null,
        Value::Bool(_) => Tag::Boolean,
        Value::Num(_) => Tag::Number,
        Value::Str(_) => Tag::String,
        Value::Arr(_) => Tag::Array,
        Value::Obj(_) => Tag::Object,
        Value::Date(_) => Tag::Date,
        Value::Regexp(_) => Tag::Regexp,
        Value::Func => Tag::Function,
        Value::Args(_) => Tag::Arguments,
    }
}
