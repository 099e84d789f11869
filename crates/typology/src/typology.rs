//! The `Typology` facade: one owned registry plus the matcher surface.

use crate::classify::{classify, Tag};
use crate::descriptor::Descriptor;
use crate::error::{SchemaError, ValidationError};
use crate::registry::{Registry, TypeDef, TypeDefinition};
use crate::scan::scan;
use crate::value::Value;

/// A type validator: a registry of named custom types and the recursive
/// matcher evaluating descriptors against values.
///
/// Mutation takes `&mut self` and reads take `&self`, so the borrow checker
/// enforces the registry's no-concurrent-mutation discipline. Instances are
/// confined to the thread that owns them.
#[derive(Debug)]
pub struct Typology {
    registry: Registry,
}

impl Typology {
    /// A validator with only the built-in `type` and `primitive` custom
    /// types installed.
    pub fn new() -> Typology {
        Typology {
            registry: Registry::new(),
        }
    }

    /// A validator bulk-registered with the given named definitions, in
    /// iteration order, after the built-ins.
    pub fn with_types<I>(defs: I) -> Result<Typology, SchemaError>
    where
        I: IntoIterator<Item = (String, TypeDef)>,
    {
        let mut typology = Typology::new();
        for (id, def) in defs {
            typology.register(id, def)?;
        }
        Ok(typology)
    }

    /// The canonical tag of a value. Forwarded from [`classify`] for
    /// callers holding an instance.
    pub fn get(&self, value: &Value) -> Tag {
        classify(value)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// True iff `id` names a registered custom type.
    pub fn has(&self, id: &str) -> bool {
        self.registry.has(id)
    }

    /// Registers a named custom type. Returns `self` for chaining.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        def: TypeDef,
    ) -> Result<&mut Typology, SchemaError> {
        self.registry.register(id, def)?;
        Ok(self)
    }

    /// Registers a custom type from a full definition, prototypes included.
    /// Returns `self` for chaining.
    pub fn register_def(
        &mut self,
        definition: TypeDefinition,
    ) -> Result<&mut Typology, SchemaError> {
        self.registry.register_def(definition)?;
        Ok(self)
    }

    /// Structural well-formedness of a descriptor.
    pub fn is_valid(&self, descriptor: &Descriptor) -> bool {
        self.registry.is_valid(descriptor)
    }

    /// Validates a value against a descriptor, reporting the first mismatch
    /// as a structured, possibly nested error. `Ok(None)` means matched.
    pub fn scan(
        &self,
        value: &Value,
        descriptor: &Descriptor,
    ) -> Result<Option<ValidationError>, SchemaError> {
        scan(&self.registry, value, descriptor)
    }

    /// The boolean form of [`Typology::scan`].
    pub fn check(&self, value: &Value, descriptor: &Descriptor) -> Result<bool, SchemaError> {
        Ok(self.scan(value, descriptor)?.is_none())
    }
}

impl Default for Typology {
    fn default() -> Typology {
        Typology::new()
    }
}
