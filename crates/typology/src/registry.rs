//! Named custom types — registration, prototype composition and descriptor
//! validity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::classify::{classify, is_native_member, Tag};
use crate::descriptor::{AtomicExpr, Descriptor};
use crate::error::SchemaError;
use crate::value::Value;

/// A predicate-backed custom type. The registry handle is passed
/// explicitly, so a predicate can resolve other types or re-check
/// descriptor validity without ambient context.
pub type Predicate = Arc<dyn Fn(&Registry, &Value) -> bool>;

/// The capability backing a custom type: a nested descriptor, or a
/// predicate over values.
#[derive(Clone)]
pub enum TypeDef {
    Schema(Descriptor),
    Predicate(Predicate),
}

impl TypeDef {
    pub fn schema(descriptor: impl Into<Descriptor>) -> TypeDef {
        TypeDef::Schema(descriptor.into())
    }

    pub fn predicate(f: impl Fn(&Registry, &Value) -> bool + 'static) -> TypeDef {
        TypeDef::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(d) => f.debug_tuple("Schema").field(d).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A full registration request: the id, its backing definition, and the
/// prototype ids folded in at registration time.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub id: String,
    pub def: TypeDef,
    pub proto: Vec<String>,
}

impl TypeDefinition {
    pub fn new(id: impl Into<String>, def: TypeDef) -> TypeDefinition {
        TypeDefinition {
            id: id.into(),
            def,
            proto: Vec::new(),
        }
    }

    /// Adds a prototype id to fold in.
    pub fn proto(mut self, id: impl Into<String>) -> TypeDefinition {
        self.proto.push(id.into());
        self
    }
}

/// A registry slot: either a transient placeholder standing in for a
/// prototype id mid-registration, or a real definition.
enum Entry {
    Proto,
    Def(TypeDef),
}

/// The store of named custom types, owned by one `Typology` instance.
///
/// Two built-ins are installed at construction, ahead of any
/// caller-supplied definition:
/// - `type` — matches values that are themselves valid descriptors;
/// - `primitive` — matches non-object primitives, null and undefined
///   included.
pub struct Registry {
    types: HashMap<String, Entry>,
}

impl Registry {
    pub(crate) fn new() -> Registry {
        let mut types = HashMap::new();
        types.insert(
            "type".to_string(),
            Entry::Def(TypeDef::predicate(|registry, value| {
                Descriptor::from_value(value).is_ok_and(|d| registry.is_valid(&d))
            })),
        );
        types.insert(
            "primitive".to_string(),
            Entry::Def(TypeDef::predicate(|_, value| {
                matches!(
                    classify(value),
                    Tag::Undefined | Tag::Null | Tag::Boolean | Tag::Number | Tag::String
                )
            })),
        );
        Registry { types }
    }

    /// True iff `id` holds a real definition, not a transient placeholder.
    pub fn has(&self, id: &str) -> bool {
        matches!(self.types.get(id), Some(Entry::Def(_)))
    }

    /// True iff `id` is known at all, placeholders included. This is the
    /// membership test descriptor validity uses, so a definition being
    /// registered may reference its own id and its prototype ids.
    pub(crate) fn knows(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub(crate) fn lookup(&self, id: &str) -> Option<&TypeDef> {
        match self.types.get(id) {
            Some(Entry::Def(def)) => Some(def),
            _ => None,
        }
    }

    /// Structural well-formedness of a descriptor. This checks the
    /// descriptor itself, never a value against it.
    pub fn is_valid(&self, descriptor: &Descriptor) -> bool {
        match descriptor {
            Descriptor::Atomic(expr) => {
                let parsed = AtomicExpr::parse(expr);
                !parsed.double_modifier
                    && parsed
                        .members
                        .iter()
                        .all(|member| is_native_member(member) || self.knows(member))
            }
            Descriptor::Object(fields) => fields.values().all(|d| self.is_valid(d)),
            Descriptor::Array(items) => items.len() == 1 && self.is_valid(&items[0]),
        }
    }

    /// Registers a named type without prototypes.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        def: TypeDef,
    ) -> Result<&mut Registry, SchemaError> {
        self.register_def(TypeDefinition::new(id, def))
    }

    /// Registers a type from a full definition, folding prototypes in.
    ///
    /// Prototype ids are transient: ids unknown so far are created as
    /// placeholders so the new definition may reference them, and every
    /// prototype is deleted from the registry once folded — except a
    /// prototype naming the definition itself, which is how
    /// self-referential types are registered. A failed registration leaves
    /// the registry as it was found.
    pub fn register_def(&mut self, definition: TypeDefinition) -> Result<&mut Registry, SchemaError> {
        let TypeDefinition { id, def, proto } = definition;
        if id.is_empty() {
            return Err(SchemaError::EmptyId);
        }
        // Ids carrying expression syntax would make modifier-mangled
        // strings like "?!x" resolvable, so they are unrepresentable.
        if id.contains(reserved_expr_char) {
            return Err(SchemaError::InvalidId(id));
        }
        for proto_id in &proto {
            if proto_id.contains(reserved_expr_char) {
                return Err(SchemaError::InvalidId(proto_id.clone()));
            }
        }
        if self.has(&id) {
            return Err(SchemaError::TypeExists(id));
        }
        if is_native_member(&id) {
            return Err(SchemaError::ReservedName(id));
        }

        let mut transient: Vec<String> = Vec::new();
        if !self.types.contains_key(&id) {
            self.types.insert(id.clone(), Entry::Proto);
            transient.push(id.clone());
        }
        let mut consumed: Vec<String> = Vec::new();
        for proto_id in &proto {
            if *proto_id == id {
                continue;
            }
            if !self.types.contains_key(proto_id) {
                self.types.insert(proto_id.clone(), Entry::Proto);
                transient.push(proto_id.clone());
            }
            consumed.push(proto_id.clone());
        }

        let well_formed = match &def {
            TypeDef::Predicate(_) => true,
            TypeDef::Schema(descriptor) => self.is_valid(descriptor),
        };
        if !well_formed {
            for t in &transient {
                self.types.remove(t);
            }
            return Err(SchemaError::InvalidDefinition(id));
        }

        let def = self.fold_protos(def, &consumed);
        self.types.insert(id, Entry::Def(def));
        for proto_id in &consumed {
            self.types.remove(proto_id);
        }
        Ok(self)
    }

    /// Shallow one-shot composition: when both the prototype and the new
    /// definition are object schemas, the prototype's fields are merged
    /// beneath the new definition's own fields (the new definition wins).
    fn fold_protos(&self, def: TypeDef, consumed: &[String]) -> TypeDef {
        let mut def = def;
        if let TypeDef::Schema(Descriptor::Object(fields)) = &mut def {
            let own = std::mem::take(fields);
            let mut merged: IndexMap<String, Descriptor> = IndexMap::new();
            for proto_id in consumed {
                if let Some(TypeDef::Schema(Descriptor::Object(base))) = self.lookup(proto_id) {
                    for (key, descriptor) in base {
                        merged.insert(key.clone(), descriptor.clone());
                    }
                }
            }
            merged.extend(own);
            *fields = merged;
        }
        def
    }
}

/// Characters belonging to the atomic-union expression syntax; a custom id
/// containing one could never be referenced unambiguously.
fn reserved_expr_char(c: char) -> bool {
    matches!(c, '?' | '!' | '|')
}

impl Default for Registry {
    fn default() -> Registry {
        Registry::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.types.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("Registry").field("types", &ids).finish()
    }
}
