//! Parameter binding maps and the binder that fills them.

use crate::db::TypeDatabase;
use crate::diagnostics::{ResolveError, ResolveResult};
use crate::format::TypeFormatter;
use crate::types::{TypeData, TypeId, TypeParamInfo};
use indexmap::IndexMap;
use reveal_common::interner::Atom;
use reveal_common::limits::BINDINGS_INITIAL_CAPACITY;
use rustc_hash::FxBuildHasher;
use tracing::trace;

/// Key of one binding.
///
/// Declared parameters bind by identity. Built-in forms do not retain their
/// parameter list, so their arguments bind by position instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKey {
    Param(TypeParamInfo),
    Index(u32),
}

impl BindingKey {
    pub fn as_param(&self) -> Option<&TypeParamInfo> {
        match self {
            Self::Param(param) => Some(param),
            Self::Index(_) => None,
        }
    }
}

impl From<TypeParamInfo> for BindingKey {
    fn from(param: TypeParamInfo) -> Self {
        Self::Param(param)
    }
}

impl From<u32> for BindingKey {
    fn from(index: u32) -> Self {
        Self::Index(index)
    }
}

/// Parameter binding map for one subject.
///
/// Iterates in binding order. Equality is by content and ignores order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeBindings {
    map: IndexMap<BindingKey, TypeId, FxBuildHasher>,
}

impl Default for TypeBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeBindings {
    pub fn new() -> Self {
        Self {
            map: IndexMap::with_capacity_and_hasher(BINDINGS_INITIAL_CAPACITY, FxBuildHasher),
        }
    }

    pub fn get(&self, key: &BindingKey) -> Option<TypeId> {
        self.map.get(key).copied()
    }

    pub fn get_param(&self, param: &TypeParamInfo) -> Option<TypeId> {
        self.get(&BindingKey::Param(param.clone()))
    }

    pub fn get_index(&self, index: u32) -> Option<TypeId> {
        self.get(&BindingKey::Index(index))
    }

    pub fn contains_key(&self, key: &BindingKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BindingKey, &TypeId)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// A binding of any parameter in `param`'s link group.
    pub fn get_linked(&self, param: &TypeParamInfo) -> Option<(&TypeParamInfo, TypeId)> {
        self.map.iter().find_map(|(key, &ty)| match key {
            BindingKey::Param(bound) if bound.is_linked_to(param) => Some((bound, ty)),
            _ => None,
        })
    }

    /// Bindings whose parameter has the display name `name`.
    pub fn find_by_name(&self, name: Atom) -> Vec<(&TypeParamInfo, TypeId)> {
        self.map
            .iter()
            .filter_map(|(key, &ty)| match key {
                BindingKey::Param(param) if param.name == name => Some((param, ty)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn insert(&mut self, key: BindingKey, ty: TypeId) {
        self.map.insert(key, ty);
    }
}

/// Bind `keys[i]` to `args[i]` pairwise, merging into `into`.
///
/// Arguments that are still type parameters are skipped: only concrete
/// instantiations are recorded. Re-binding a key to the same type is a
/// no-op, to a different type a `BindingConflict`. Linked aliases are one
/// logical parameter, so binding an alias to a type other than the one
/// its group already holds is a conflict too. `site` is the
/// parameterization being bound, for diagnostics.
pub fn bind_type_params(
    db: &dyn TypeDatabase,
    site: TypeId,
    keys: &[BindingKey],
    args: &[TypeId],
    into: &mut TypeBindings,
) -> ResolveResult<()> {
    if keys.len() != args.len() {
        return Err(ResolveError::ArityMismatch {
            site: TypeFormatter::new(db).format(site),
            expected: keys.len(),
            found: args.len(),
        });
    }

    for (key, &arg) in keys.iter().zip(args) {
        if matches!(db.lookup(arg), Some(TypeData::TypeParameter(_))) {
            continue;
        }
        // A linked alias of `key` counts as `key` itself.
        let existing = into.get(key).or_else(|| {
            key.as_param()
                .and_then(|param| into.get_linked(param))
                .map(|(_, ty)| ty)
        });
        match existing {
            Some(existing) if existing != arg => {
                let fmt = TypeFormatter::new(db);
                return Err(ResolveError::BindingConflict {
                    parameter: fmt.format_key(key),
                    existing: fmt.format(existing),
                    conflicting: fmt.format(arg),
                });
            }
            _ if into.contains_key(key) => {}
            _ => {
                trace!(key = ?key, ty = arg.0, "bind_type_params: bound");
                into.insert(key.clone(), arg);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/binding_tests.rs"]
mod tests;
