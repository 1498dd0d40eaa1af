//! Type classification for composite traversal.
//!
//! Gathering needs one answer per type expression: descend into it (and
//! how), resolve it, or keep it as a leaf. `classify_type` looks the type
//! up once and returns that answer.
//!
//! ```rust,ignore
//! match classify_type(db, ty) {
//!     TypeClassification::Container { args, .. } => { /* gather args */ }
//!     TypeClassification::Union(list) => { /* gather members */ }
//!     TypeClassification::Record(_) | TypeClassification::RecordApplication(..) => {
//!         /* gather fields with `ty` as context */
//!     }
//!     TypeClassification::TypeParameter(param) => { /* resolve */ }
//!     _ => { /* leaf */ }
//! }
//! ```

use crate::builtins::BuiltinGeneric;
use crate::db::TypeDatabase;
use crate::def::{DefId, DefKind};
use crate::origin::TypeArgs;
use crate::types::{TypeApplicationId, TypeData, TypeId, TypeListId, TypeParamInfo};

#[derive(Debug, Clone)]
pub enum TypeClassification {
    /// A class with nothing to descend into: plain classes, unparameterized
    /// user generics, runtime implementation types, protocol forms and the
    /// marker root.
    Concrete(DefId),

    /// A built-in collection form (or a class deriving from one), possibly
    /// applied. An unparameterized form has no arguments.
    Container { def: DefId, args: TypeArgs },

    /// `A | B | ...`
    Union(TypeListId),

    /// An unparameterized structured record.
    Record(DefId),

    /// A parameterization of a structured record.
    RecordApplication(DefId, TypeApplicationId),

    /// A parameterization that is neither a record nor a collection, such
    /// as `Pair[Int, Str]` or `Iterator[Int]`. Kept as a leaf.
    Application(DefId, TypeApplicationId),

    /// A type parameter placeholder.
    TypeParameter(TypeParamInfo),

    /// A dangling id.
    Unknown,
}

/// Classify `ty` for traversal.
pub fn classify_type(db: &dyn TypeDatabase, ty: TypeId) -> TypeClassification {
    let Some(data) = db.lookup(ty) else {
        return TypeClassification::Unknown;
    };

    match data {
        TypeData::Class(def) => match db.def_kind(def) {
            Some(DefKind::Builtin(kind)) if kind.is_collection() => TypeClassification::Container {
                def,
                args: TypeArgs::new(),
            },
            Some(DefKind::Record) => TypeClassification::Record(def),
            Some(_) => TypeClassification::Concrete(def),
            None => TypeClassification::Unknown,
        },
        TypeData::TypeParameter(param) => TypeClassification::TypeParameter(param),
        TypeData::Union(list_id) => TypeClassification::Union(list_id),
        TypeData::Application(app_id) => {
            let Some(app) = db.type_application(app_id) else {
                return TypeClassification::Unknown;
            };
            let container = || TypeClassification::Container {
                def: app.base,
                args: app.args.iter().copied().collect(),
            };
            match db.def_kind(app.base) {
                Some(DefKind::Builtin(kind) | DefKind::RuntimeBuiltin(kind))
                    if kind.is_collection() =>
                {
                    container()
                }
                Some(DefKind::Record) => TypeClassification::RecordApplication(app.base, app_id),
                Some(DefKind::Class) if derived_collection(db, app.base).is_some() => container(),
                Some(
                    DefKind::Class
                    | DefKind::GenericMarker
                    | DefKind::Builtin(_)
                    | DefKind::RuntimeBuiltin(_),
                ) => TypeClassification::Application(app.base, app_id),
                None => TypeClassification::Unknown,
            }
        }
    }
}

/// The first built-in collection form `def` is or derives from, searching
/// bases depth-first. Protocol forms along the way are passed over.
pub fn derived_collection(db: &dyn TypeDatabase, def: DefId) -> Option<BuiltinGeneric> {
    let info = db.definition(def)?;
    if let DefKind::Builtin(kind) | DefKind::RuntimeBuiltin(kind) = info.kind {
        return kind.is_collection().then_some(kind);
    }
    info.bases.iter().find_map(|&base| {
        let parent = match db.lookup(base)? {
            TypeData::Class(parent) => parent,
            TypeData::Application(app_id) => db.type_application(app_id)?.base,
            TypeData::TypeParameter(_) | TypeData::Union(_) => return None,
        };
        derived_collection(db, parent)
    })
}

#[cfg(test)]
#[path = "../tests/type_classifier_tests.rs"]
mod tests;
