//! Query surface the resolver runs against, and the environment that
//! implements it.
//!
//! The engine never touches the interner or the definition store directly.
//! It asks a `TypeDatabase` for type structure and class declarations, and a
//! `FieldIntrospector` for record fields. `TypeEnvironment` is the standard
//! implementation of both; tests and embedders can supply their own.

use crate::builtins::BuiltinGeneric;
use crate::class_hierarchy::ClassBuilder;
use crate::def::{DefId, DefKind, DefinitionInfo, DefinitionStore, FieldInfo};
use crate::format::TypeFormatter;
use crate::gather::TypeGatherer;
use crate::hierarchy::HierarchyWalker;
use crate::intern::TypeInterner;
use crate::options::ResolverOptions;
use crate::types::{
    TypeApplication, TypeApplicationId, TypeData, TypeId, TypeListId, TypeParamInfo,
};
use reveal_common::interner::Atom;
use std::sync::Arc;
use tracing::debug;

/// Read-only access to type structure and class declarations.
pub trait TypeDatabase: Sync {
    fn lookup(&self, id: TypeId) -> Option<TypeData>;

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]>;

    fn type_application(&self, id: TypeApplicationId) -> Option<Arc<TypeApplication>>;

    fn definition(&self, id: DefId) -> Option<DefinitionInfo>;

    fn def_kind(&self, id: DefId) -> Option<DefKind>;

    /// Canonical generic form registered for a built-in shape.
    fn builtin_def(&self, kind: BuiltinGeneric) -> Option<DefId>;

    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str>;
}

/// Source of declared field types for structured record types.
pub trait FieldIntrospector {
    /// Fields of `ty` when it is a record (or a parameterization of one).
    /// `None` for every other type.
    fn record_fields(&self, ty: TypeId) -> Option<Arc<[FieldInfo]>>;
}

#[derive(Copy, Clone, Debug)]
struct BuiltinDefs {
    canonical: DefId,
    runtime: DefId,
}

/// An interner and a definition store, pre-populated with the generic
/// marker root and every built-in form.
pub struct TypeEnvironment {
    interner: TypeInterner,
    definitions: DefinitionStore,
    generic_marker: DefId,
    builtins: [BuiltinDefs; 12],
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnvironment {
    pub fn new() -> Self {
        let interner = TypeInterner::new();
        let definitions = DefinitionStore::new();

        let generic_marker = definitions.register(DefinitionInfo::generic_marker(
            interner.intern_string("Generic"),
        ));
        let builtins = BuiltinGeneric::ALL.map(|kind| BuiltinDefs {
            canonical: definitions.register(DefinitionInfo::builtin(
                kind,
                interner.intern_string(kind.canonical_name()),
            )),
            runtime: definitions.register(DefinitionInfo::runtime_builtin(
                kind,
                interner.intern_string(kind.runtime_name()),
            )),
        });
        debug!(
            definitions = definitions.len(),
            "TypeEnvironment::new - registered marker and built-in forms"
        );

        Self {
            interner,
            definitions,
            generic_marker,
            builtins,
        }
    }

    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    pub fn definitions(&self) -> &DefinitionStore {
        &self.definitions
    }

    pub fn formatter(&self) -> TypeFormatter<'_> {
        TypeFormatter::new(self)
    }

    pub fn walker(&self) -> HierarchyWalker<'_> {
        HierarchyWalker::new(self)
    }

    pub fn gatherer(&self) -> TypeGatherer<'_> {
        TypeGatherer::new(self, self)
    }

    pub fn gatherer_with(&self, options: &ResolverOptions) -> TypeGatherer<'_> {
        TypeGatherer::with_options(self, self, options)
    }

    /// The pure parameter-declaration root.
    pub fn generic_marker(&self) -> DefId {
        self.generic_marker
    }

    /// Canonical generic form of a built-in shape, e.g. `Dict`.
    pub fn builtin(&self, kind: BuiltinGeneric) -> DefId {
        self.builtins[kind as usize].canonical
    }

    /// Runtime implementation type of a built-in shape, e.g. `dict`.
    pub fn runtime_builtin(&self, kind: BuiltinGeneric) -> DefId {
        self.builtins[kind as usize].runtime
    }

    // =========================================================================
    // Type construction shortcuts
    // =========================================================================

    pub fn class_type(&self, def_id: DefId) -> TypeId {
        self.interner.class_type(def_id)
    }

    pub fn fresh_type_param(&self, name: &str) -> TypeParamInfo {
        self.interner.fresh_type_param(name)
    }

    pub fn type_param(&self, param: &TypeParamInfo) -> TypeId {
        self.interner.type_param(param)
    }

    pub fn application(&self, base: DefId, args: Vec<TypeId>) -> TypeId {
        self.interner.application(base, args)
    }

    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        self.interner.union(members)
    }

    /// `Generic[params...]`, for use as a base.
    pub fn generic(&self, params: &[TypeParamInfo]) -> TypeId {
        let args = params.iter().map(|p| self.interner.type_param(p)).collect();
        self.interner.application(self.generic_marker, args)
    }

    /// `List[args...]`, `Dict[args...]`, ... over the canonical form.
    pub fn builtin_type(&self, kind: BuiltinGeneric, args: Vec<TypeId>) -> TypeId {
        self.interner.application(self.builtin(kind), args)
    }

    /// Start declaring a class.
    pub fn class_builder(&self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name)
    }

    /// Declare a plain class with no bases and return its type.
    pub fn concrete(&self, name: &str) -> TypeId {
        let def_id = self.definitions.register(DefinitionInfo::class(
            self.interner.intern_string(name),
            Vec::new(),
            Vec::new(),
        ));
        self.interner.class_type(def_id)
    }

    /// Attach fields to a previously declared record. This is how a record
    /// that mentions itself is completed.
    pub fn set_fields(&self, record: DefId, fields: &[(&str, TypeId)]) -> bool {
        let fields = fields
            .iter()
            .map(|&(name, type_id)| FieldInfo {
                name: self.interner.intern_string(name),
                type_id,
            })
            .collect();
        self.definitions.set_fields(record, fields)
    }

    /// Definition a type refers to: the class itself, or the base of a
    /// parameterization.
    pub fn def_of(&self, ty: TypeId) -> Option<DefId> {
        match self.interner.lookup(ty)? {
            TypeData::Class(def_id) => Some(def_id),
            TypeData::Application(app_id) => Some(self.interner.type_application(app_id)?.base),
            TypeData::TypeParameter(_) | TypeData::Union(_) => None,
        }
    }
}

impl TypeDatabase for TypeEnvironment {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.interner.lookup(id)
    }

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        self.interner.type_list(id)
    }

    fn type_application(&self, id: TypeApplicationId) -> Option<Arc<TypeApplication>> {
        self.interner.type_application(id)
    }

    fn definition(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(id)
    }

    fn def_kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get_kind(id)
    }

    fn builtin_def(&self, kind: BuiltinGeneric) -> Option<DefId> {
        Some(self.builtin(kind))
    }

    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.interner.resolve_atom_ref(atom)
    }
}

impl FieldIntrospector for TypeEnvironment {
    fn record_fields(&self, ty: TypeId) -> Option<Arc<[FieldInfo]>> {
        let def_id = self.def_of(ty)?;
        if self.definitions.get_kind(def_id)? != DefKind::Record {
            return None;
        }
        self.definitions.get_fields(def_id)
    }
}

#[cfg(test)]
#[path = "../tests/db_tests.rs"]
mod tests;
