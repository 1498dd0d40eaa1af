//! Class definitions and their storage.
//!
//! A `DefId` names one declared class: its kind, its declared parameter
//! list, its immediate bases (as type expressions, exactly as written) and,
//! for records, its fields.
//!
//! ## Kinds
//!
//! | Kind | Declared params | Bases | Example |
//! |------|-----------------|-------|---------|
//! | Class | any | any | `class Pair(Generic[A, B])` |
//! | Record | any | any | `class Point(Generic[T]) { x: T, y: T }` |
//! | GenericMarker | none | none | `Generic` |
//! | Builtin | none (erased) | none | `List`, `Dict` |
//! | RuntimeBuiltin | none | none | `list`, `dict` |

use crate::builtins::BuiltinGeneric;
use crate::types::{TypeId, TypeParamInfo};
use dashmap::DashMap;
use reveal_common::interner::Atom;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Identifier of a declared class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

/// Kind of class definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// Ordinary class, generic or not.
    Class,

    /// Structured record type whose fields are introspectable.
    Record,

    /// The pure parameter-declaration root. Carries no bindings of its own.
    GenericMarker,

    /// Canonical generic form of a built-in container or protocol. Its
    /// declared parameter list is not retained, so instantiations bind by
    /// position.
    Builtin(BuiltinGeneric),

    /// Runtime implementation type of a built-in container.
    RuntimeBuiltin(BuiltinGeneric),
}

/// One declared field of a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: Atom,
    pub type_id: TypeId,
}

/// Complete information about a class definition.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,

    /// Name of the definition (for diagnostics)
    pub name: Atom,

    /// Declared parameter list, in positional order
    pub type_params: Arc<[TypeParamInfo]>,

    /// Immediate bases as written, e.g. `[Base[T], Generic[T, U]]`
    pub bases: Arc<[TypeId]>,

    /// Record fields in declaration order; empty for every other kind
    pub fields: Arc<[FieldInfo]>,
}

impl DefinitionInfo {
    pub fn class(name: Atom, type_params: Vec<TypeParamInfo>, bases: Vec<TypeId>) -> Self {
        Self {
            kind: DefKind::Class,
            name,
            type_params: type_params.into(),
            bases: bases.into(),
            fields: Arc::from(Vec::new()),
        }
    }

    pub fn record(
        name: Atom,
        type_params: Vec<TypeParamInfo>,
        bases: Vec<TypeId>,
        fields: Vec<FieldInfo>,
    ) -> Self {
        Self {
            kind: DefKind::Record,
            fields: fields.into(),
            ..Self::class(name, type_params, bases)
        }
    }

    pub fn generic_marker(name: Atom) -> Self {
        Self {
            kind: DefKind::GenericMarker,
            ..Self::class(name, Vec::new(), Vec::new())
        }
    }

    pub fn builtin(kind: BuiltinGeneric, name: Atom) -> Self {
        Self {
            kind: DefKind::Builtin(kind),
            ..Self::class(name, Vec::new(), Vec::new())
        }
    }

    pub fn runtime_builtin(kind: BuiltinGeneric, name: Atom) -> Self {
        Self {
            kind: DefKind::RuntimeBuiltin(kind),
            ..Self::class(name, Vec::new(), Vec::new())
        }
    }
}

/// Thread-safe storage for class definitions.
///
/// Definitions are append-only: kind, parameters and bases are fixed at
/// registration. Only record fields can be attached later, which is what
/// allows a record to mention itself.
pub struct DefinitionStore {
    definitions: DashMap<DefId, DefinitionInfo>,
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        // Ids start at 1.
        Self {
            definitions: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Register a new definition and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = DefId(self.next_id.fetch_add(1, Ordering::SeqCst));
        trace!(
            def_id = id.0,
            kind = ?info.kind,
            params = info.type_params.len(),
            bases = info.bases.len(),
            "DefinitionStore::register"
        );
        self.definitions.insert(id, info);
        id
    }

    /// Get definition info by `DefId`.
    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    pub fn get_kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    pub fn get_fields(&self, id: DefId) -> Option<Arc<[FieldInfo]>> {
        self.definitions.get(&id).map(|r| r.fields.clone())
    }

    /// Attach fields to a record. Returns `false` (and changes nothing) when
    /// `id` is unknown or is not a record.
    pub fn set_fields(&self, id: DefId, fields: Vec<FieldInfo>) -> bool {
        match self.definitions.get_mut(&id) {
            Some(mut entry) if entry.kind == DefKind::Record => {
                entry.fields = fields.into();
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
