//! The two failure channels.
//!
//! A [`SchemaError`] is a programmer fault: a malformed descriptor or a
//! misused registry. It is surfaced immediately as `Err` and never
//! swallowed. A [`ValidationError`] is data, not a fault: the expected
//! outcome when a value fails to match a well-formed descriptor, carried in
//! the `Ok` channel so callers branch without exception handling.

use std::fmt;

use thiserror::Error;

use crate::descriptor::Descriptor;
use crate::value::Value;

/// A malformed schema or a violated registry precondition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The descriptor is structurally invalid: an unknown atomic member,
    /// both modifiers present, or a value of a non-descriptor kind.
    #[error("Invalid type.")]
    InvalidType,

    /// An array schema must hold exactly one element type.
    #[error("An array type must hold exactly one element type, got {0}.")]
    ArrayArity(usize),

    /// A custom type requires a non-empty string id.
    #[error("A type requires a string id.")]
    EmptyId,

    /// The id contains a character belonging to the expression syntax.
    #[error("The id \"{0}\" may not contain \"?\", \"!\" or \"|\".")]
    InvalidId(String),

    /// The id already holds a real definition.
    #[error("The type \"{0}\" already exists.")]
    TypeExists(String),

    /// The id collides with a native member name.
    #[error("\"{0}\" is a reserved type name.")]
    ReservedName(String),

    /// The definition is neither a predicate nor a valid descriptor.
    #[error("The type \"{0}\" requires a valid definition: a preexisting type or a predicate.")]
    InvalidDefinition(String),

    /// Descriptor evaluation exceeded the nesting bound; the registered
    /// type definitions cycle.
    #[error("Recursion limit reached, the type definitions cycle.")]
    RecursionLimit,
}

/// One step of the path into a failing substructure.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A mismatch between a value and a well-formed descriptor.
///
/// Errors chain through `sub_error`, mirroring the descent into the failing
/// substructure; [`ValidationError::path`] walks the chain back out.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    /// The descriptor the value was checked against at this level.
    pub descriptor: Descriptor,
    /// The value under test at this level.
    pub value: Value,
    /// The member that triggered an exclusivity violation, if any.
    pub matched: Option<String>,
    /// The child key or index at which a nested mismatch occurred.
    pub key: Option<PathSegment>,
    /// The nested failure, when `key` is set.
    #[source]
    pub sub_error: Option<Box<ValidationError>>,
}

impl ValidationError {
    pub(crate) fn new(
        message: impl Into<String>,
        descriptor: &Descriptor,
        value: &Value,
    ) -> ValidationError {
        ValidationError {
            message: message.into(),
            descriptor: descriptor.clone(),
            value: value.clone(),
            matched: None,
            key: None,
            sub_error: None,
        }
    }

    pub(crate) fn nested(
        message: impl Into<String>,
        descriptor: &Descriptor,
        value: &Value,
        key: PathSegment,
        sub: ValidationError,
    ) -> ValidationError {
        ValidationError {
            key: Some(key),
            sub_error: Some(Box::new(sub)),
            ..ValidationError::new(message, descriptor, value)
        }
    }

    /// The sequence of keys and indices from the root value down to the
    /// failing substructure.
    pub fn path(&self) -> Vec<&PathSegment> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            if let Some(segment) = &current.key {
                path.push(segment);
            }
            match &current.sub_error {
                Some(sub) => current = sub,
                None => break,
            }
        }
        path
    }

    /// The innermost error of the chain.
    pub fn leaf(&self) -> &ValidationError {
        let mut current = self;
        while let Some(sub) = &current.sub_error {
            current = sub;
        }
        current
    }
}
