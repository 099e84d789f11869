//! `typology` — data-driven validation of dynamic runtime values.
//!
//! Upstream reference: `typology` v0.2.1 (jacomyal/typology).
//!
//! A value is checked against a *type descriptor*: an atomic-union
//! expression (`"?number|string"`), a closed object shape, or a homogeneous
//! array. Named custom types — descriptor-backed or predicate-backed, with
//! one-shot prototype composition — extend the vocabulary through a
//! per-instance registry.
//!
//! ```
//! use typology::{Descriptor, Typology, Value};
//! use serde_json::json;
//!
//! let types = Typology::new();
//! let value = Value::from(json!({"hello": "world"}));
//! let shape = Descriptor::from_json(&json!({"hello": "string"})).unwrap();
//! let number = Descriptor::from("number");
//!
//! assert!(types.check(&value, &shape).unwrap());
//! assert!(!types.check(&value, &number).unwrap());
//! ```

pub mod classify;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod typology;
pub mod value;

mod scan;

// Re-export the core public API
pub use classify::{classify, Tag};
pub use descriptor::Descriptor;
pub use error::{PathSegment, SchemaError, ValidationError};
pub use registry::{Predicate, Registry, TypeDef, TypeDefinition};
pub use typology::Typology;
pub use value::Value;
