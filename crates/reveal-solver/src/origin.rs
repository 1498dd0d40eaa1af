//! Origin and argument extraction.
//!
//! `get_origin` answers "what is this a parameterization of?", and
//! `get_args` answers "with which arguments?". Neither looks past the
//! outermost layer of the expression.

use crate::db::TypeDatabase;
use crate::def::{DefId, DefKind};
use crate::types::{TypeData, TypeId};
use reveal_common::limits::TYPE_ARGS_INLINE;
use smallvec::SmallVec;

/// Argument list of a single parameterization.
pub type TypeArgs = SmallVec<[TypeId; TYPE_ARGS_INLINE]>;

/// Unparameterized base of `ty`.
///
/// - `Base[Args...]` over a user class or the generic marker: `Base`.
/// - `list[int]` over a runtime implementation type: the canonical built-in
///   form (`List`), never the runtime type.
/// - An unparameterized class, a type parameter or a union: `None`. A
///   declared generic is not an instantiated one.
pub fn get_origin(db: &dyn TypeDatabase, ty: TypeId) -> Option<DefId> {
    let TypeData::Application(app_id) = db.lookup(ty)? else {
        return None;
    };
    let base = db.type_application(app_id)?.base;
    match db.def_kind(base)? {
        DefKind::RuntimeBuiltin(kind) => db.builtin_def(kind),
        _ => Some(base),
    }
}

/// Ordered arguments of `ty`.
///
/// Applications yield their arguments, unions their members. Anything else
/// yields an empty list.
pub fn get_args(db: &dyn TypeDatabase, ty: TypeId) -> TypeArgs {
    match db.lookup(ty) {
        Some(TypeData::Application(app_id)) => db
            .type_application(app_id)
            .map(|app| app.args.iter().copied().collect())
            .unwrap_or_default(),
        Some(TypeData::Union(list_id)) => db.type_list(list_id).iter().copied().collect(),
        _ => TypeArgs::new(),
    }
}

#[cfg(test)]
#[path = "../tests/origin_tests.rs"]
mod tests;
