//! Type interning for structural deduplication.
//!
//! Converts `TypeData` structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) type equality (just compare `TypeId` values)
//! - Each unique structure stored once
//! - Handles are `Copy`, so binding maps and gathered sets stay small

use crate::def::DefId;
use crate::types::{
    TypeApplication, TypeApplicationId, TypeData, TypeId, TypeListId, TypeParamId, TypeParamInfo,
    Variance,
};
use reveal_common::interner::{Atom, ShardedInterner};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }

        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }

        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

#[derive(Default)]
struct TypeTable {
    key_to_id: FxHashMap<TypeData, TypeId>,
    id_to_key: Vec<TypeData>,
}

/// Type interning table.
/// Thread-safe via `RwLock` for concurrent access.
pub struct TypeInterner {
    types: RwLock<TypeTable>,
    /// String interner for parameter, class and field names
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    applications: RwLock<ValueInterner<TypeApplication>>,
    next_param_id: AtomicU32,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        TypeInterner {
            types: RwLock::new(TypeTable::default()),
            string_interner: ShardedInterner::new(),
            type_lists: RwLock::new(SliceInterner::new()),
            applications: RwLock::new(ValueInterner::new()),
            next_param_id: AtomicU32::new(1),
        }
    }

    /// Intern a string into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    /// Resolve an Atom without allocating a new String.
    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    /// Intern a type and return its `TypeId`.
    /// If the structure already exists, returns the existing `TypeId`.
    pub fn intern(&self, key: TypeData) -> TypeId {
        {
            let table = self.types.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(&id) = table.key_to_id.get(&key) {
                return id;
            }
        }

        let mut table = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(&id) = table.key_to_id.get(&key) {
            return id;
        }

        let id = TypeId(table.id_to_key.len() as u32);
        table.id_to_key.push(key.clone());
        table.key_to_id.insert(key, id);
        id
    }

    /// Look up the structure behind a `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .id_to_key
            .get(id.0 as usize)
            .cloned()
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = self.type_lists.read().unwrap_or_else(PoisonError::into_inner);
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        let mut lists = self.type_lists.write().unwrap_or_else(PoisonError::into_inner);
        TypeListId(lists.intern(members))
    }

    pub fn type_application(&self, id: TypeApplicationId) -> Option<Arc<TypeApplication>> {
        self.applications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0)
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Reference to a declared class, without arguments.
    pub fn class_type(&self, def_id: DefId) -> TypeId {
        self.intern(TypeData::Class(def_id))
    }

    /// Declare a fresh type parameter with a new identity.
    pub fn fresh_type_param(&self, name: &str) -> TypeParamInfo {
        self.fresh_type_param_with(name, None, Variance::Invariant)
    }

    /// Declare a fresh type parameter with a bound and variance.
    pub fn fresh_type_param_with(
        &self,
        name: &str,
        constraint: Option<TypeId>,
        variance: Variance,
    ) -> TypeParamInfo {
        let id = TypeParamId(self.next_param_id.fetch_add(1, Ordering::SeqCst));
        trace!(param_id = id.0, name, "TypeInterner::fresh_type_param");
        TypeParamInfo {
            id,
            link_root: id,
            name: self.intern_string(name),
            constraint,
            variance,
        }
    }

    /// Create a linked alias of `other`.
    ///
    /// The result has its own identity and may carry its own bound, but
    /// joins `other`'s link group and shares its display name. Binding
    /// either one binds the logical parameter: an ancestor that still asks
    /// for `other` finds the binding made through the alias, and binding
    /// the two to different types is a conflict.
    pub fn linked_type_param(
        &self,
        other: &TypeParamInfo,
        constraint: Option<TypeId>,
        variance: Variance,
    ) -> TypeParamInfo {
        let id = TypeParamId(self.next_param_id.fetch_add(1, Ordering::SeqCst));
        TypeParamInfo {
            id,
            link_root: other.link_root,
            name: other.name,
            constraint,
            variance,
        }
    }

    /// The type expression standing for `param`.
    pub fn type_param(&self, param: &TypeParamInfo) -> TypeId {
        self.intern(TypeData::TypeParameter(param.clone()))
    }

    /// `base[args...]`.
    pub fn application(&self, base: DefId, args: Vec<TypeId>) -> TypeId {
        let app_id = {
            let mut apps = self.applications.write().unwrap_or_else(PoisonError::into_inner);
            TypeApplicationId(apps.intern(TypeApplication { base, args }))
        };
        self.intern(TypeData::Application(app_id))
    }

    /// `members[0] | members[1] | ...`.
    ///
    /// Nested unions are flattened and repeated members dropped, keeping
    /// first-occurrence order. A single surviving member is returned as is.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                Some(TypeData::Union(list_id)) => {
                    for &inner in self.type_list(list_id).iter() {
                        if !flat.contains(&inner) {
                            flat.push(inner);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }

        if let [single] = flat.as_slice() {
            return *single;
        }
        let list_id = self.intern_type_list(flat);
        self.intern(TypeData::Union(list_id))
    }

    /// Number of distinct interned types.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .id_to_key
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
