//! Type representation.
//!
//! Type expressions are interned: a `TypeId` is a handle to a `TypeData`
//! stored in the `TypeInterner`. Two structurally identical expressions
//! always intern to the same `TypeId`, so comparing instantiations during
//! binding is an integer comparison.

use crate::def::DefId;
use reveal_common::interner::Atom;
use std::hash::{Hash, Hasher};

/// Interned handle to a type expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Interned handle to an ordered list of types (union members).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

/// Interned handle to a parameterization (`Base[Args...]`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplicationId(pub u32);

/// Identity token of a type parameter.
///
/// Allocated fresh for every declared parameter. Two parameters with
/// different tokens are distinct parameters unless one was created as a
/// linked alias of the other (`TypeInterner::linked_type_param`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// Declared variance of a type parameter. Carried, never enforced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

/// A declared type parameter.
///
/// Equality and hashing use the identity token only. `link_root` groups a
/// parameter with its linked aliases: every member of a group stands for
/// one logical parameter. The name, bound and variance ride along for
/// diagnostics and for the name fallback.
#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    pub id: TypeParamId,
    /// Identity of the parameter this one was linked from. Its own `id`
    /// when it is not an alias.
    pub link_root: TypeParamId,
    pub name: Atom,
    pub constraint: Option<TypeId>,
    pub variance: Variance,
}

impl PartialEq for TypeParamInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeParamInfo {}

impl Hash for TypeParamInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl TypeParamInfo {
    /// Whether `self` and `other` stand for the same logical parameter.
    pub fn is_linked_to(&self, other: &TypeParamInfo) -> bool {
        self.link_root == other.link_root
    }
}

/// A parameterization: an unparameterized base applied to arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication {
    pub base: DefId,
    pub args: Vec<TypeId>,
}

/// The structure behind a `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A declared class referenced without arguments. Covers plain classes,
    /// records, unparameterized generics, built-in forms and the marker root.
    Class(DefId),

    /// A type parameter placeholder.
    TypeParameter(TypeParamInfo),

    /// `Base[A1, ..., An]`.
    Application(TypeApplicationId),

    /// `A | B | ...`, flattened and de-duplicated.
    Union(TypeListId),
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
