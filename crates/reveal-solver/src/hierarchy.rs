//! Hierarchy walking: from a subject to its complete parameter bindings.
//!
//! `resolve_all` decides, in priority order:
//!
//! 1. The subject is a parameterization (`Pair[Int, Str]`). Its origin's
//!    declared parameters bind to its arguments, and nothing further is
//!    walked. Built-in forms bind by position.
//! 2. The subject is an instance carrying the record of its own
//!    instantiation. Its class's declared parameters bind to that record's
//!    arguments.
//! 3. The subject is a class, or an instance without an instantiation
//!    record. Every immediate base is bound as in case 1 and its origin is
//!    walked in turn, all into one accumulating map. `Generic[...]` bases
//!    are skipped.
//! 4. Anything else has no bindings.
//!
//! `resolve_one` then looks a parameter up by identity, then through its
//! link group (a subclass may re-declare an inherited parameter under a
//! fresh identity, see `TypeInterner::linked_type_param`), and finally by
//! display name. The name fallback is looser than the other two: unrelated
//! parameters that happen to share a name will match, which is why an
//! ambiguous name is reported instead of picking one.

use crate::binding::{BindingKey, TypeBindings, bind_type_params};
use crate::db::TypeDatabase;
use crate::def::{DefId, DefKind};
use crate::diagnostics::{LookupFailure, ResolveError, ResolveResult};
use crate::format::TypeFormatter;
use crate::options::ResolverOptions;
use crate::origin::{get_args, get_origin};
use crate::types::{TypeData, TypeId, TypeParamInfo};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// What a resolution query is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subject {
    /// A class or a parameterization of one.
    Type(TypeId),
    /// A value of some class.
    Instance(Instance),
}

impl From<TypeId> for Subject {
    fn from(ty: TypeId) -> Self {
        Self::Type(ty)
    }
}

impl From<Instance> for Subject {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

/// A value of a declared class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub class: DefId,
    /// The parameterization the value was created through, if any.
    pub orig_class: Option<TypeId>,
}

impl Instance {
    /// An instance created through the bare class.
    pub fn new(class: DefId) -> Self {
        Self {
            class,
            orig_class: None,
        }
    }

    /// An instance created through the parameterization `ty`, with its
    /// instantiation record present from the start. This lets a query made
    /// while the instance is still being initialised see its own bindings.
    ///
    /// Returns `None` when `ty` is not a parameterization.
    pub fn of(db: &dyn TypeDatabase, ty: TypeId) -> Option<Self> {
        let class = get_origin(db, ty)?;
        Some(Self {
            class,
            orig_class: Some(ty),
        })
    }
}

/// A parameter to look up: by declared identity, or by position for the
/// built-in forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamQuery {
    Param(TypeParamInfo),
    Index(u32),
}

impl From<TypeParamInfo> for ParamQuery {
    fn from(param: TypeParamInfo) -> Self {
        Self::Param(param)
    }
}

impl From<&TypeParamInfo> for ParamQuery {
    fn from(param: &TypeParamInfo) -> Self {
        Self::Param(param.clone())
    }
}

impl From<u32> for ParamQuery {
    fn from(index: u32) -> Self {
        Self::Index(index)
    }
}

impl ParamQuery {
    fn as_key(&self) -> BindingKey {
        match self {
            Self::Param(param) => BindingKey::Param(param.clone()),
            Self::Index(index) => BindingKey::Index(*index),
        }
    }
}

/// Walks generic ancestry to build parameter bindings.
pub struct HierarchyWalker<'a> {
    db: &'a dyn TypeDatabase,
    name_fallback: bool,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self {
            db,
            name_fallback: true,
        }
    }

    pub fn with_options(db: &'a dyn TypeDatabase, options: &ResolverOptions) -> Self {
        Self {
            db,
            name_fallback: options.name_fallback,
        }
    }

    /// Declared parameter list of `def`. Empty for unknown definitions and
    /// for the built-in forms, whose lists are not retained.
    pub fn declared_params(&self, def: DefId) -> Arc<[TypeParamInfo]> {
        self.db
            .definition(def)
            .map(|info| info.type_params)
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Complete bindings of `subject`. Empty when the subject takes part in
    /// no generic hierarchy.
    pub fn resolve_all(&self, subject: &Subject) -> ResolveResult<TypeBindings> {
        debug!(
            subject = %TypeFormatter::new(self.db).format_subject(subject),
            "resolve_all"
        );
        let mut bindings = TypeBindings::new();
        let mut visited = FxHashSet::default();

        match subject {
            Subject::Type(ty) => {
                if let Some(origin) = get_origin(self.db, *ty) {
                    self.bind_direct(*ty, origin, &mut bindings)?;
                } else if let Some(TypeData::Class(def)) = self.db.lookup(*ty) {
                    self.walk_bases(def, &mut bindings, &mut visited)?;
                }
            }
            Subject::Instance(instance) => match instance.orig_class {
                Some(orig_class) => self.bind_direct(orig_class, instance.class, &mut bindings)?,
                None => self.walk_bases(instance.class, &mut bindings, &mut visited)?,
            },
        }

        trace!(
            bindings = %TypeFormatter::new(self.db).format_bindings(&bindings),
            "resolve_all: done"
        );
        Ok(bindings)
    }

    /// Concrete type bound to `query` on `subject`.
    pub fn resolve_one(
        &self,
        subject: &Subject,
        query: impl Into<ParamQuery>,
    ) -> ResolveResult<TypeId> {
        let query = query.into();
        let bindings = self.resolve_all(subject)?;
        let fmt = TypeFormatter::new(self.db);
        if bindings.is_empty() {
            return Err(ResolveError::NotGeneric {
                subject: fmt.format_subject(subject),
            });
        }

        let unknown = |failure| ResolveError::UnknownParameter {
            parameter: fmt.format_key(&query.as_key()),
            subject: fmt.format_subject(subject),
            failure,
        };

        match &query {
            ParamQuery::Index(index) => bindings
                .get_index(*index)
                .ok_or_else(|| unknown(LookupFailure::Missing)),
            ParamQuery::Param(param) => {
                if let Some(ty) = bindings.get_param(param) {
                    return Ok(ty);
                }
                if let Some((alias, ty)) = bindings.get_linked(param) {
                    trace!(
                        param = param.id.0,
                        alias = alias.id.0,
                        "resolve_one: matched linked alias"
                    );
                    return Ok(ty);
                }
                if !self.name_fallback {
                    return Err(unknown(LookupFailure::Missing));
                }
                match bindings.find_by_name(param.name).as_slice() {
                    [(alias, ty)] => {
                        trace!(
                            param = param.id.0,
                            alias = alias.id.0,
                            "resolve_one: matched by name"
                        );
                        Ok(*ty)
                    }
                    [] => Err(unknown(LookupFailure::Missing)),
                    many => Err(unknown(LookupFailure::Ambiguous {
                        matches: many.len(),
                    })),
                }
            }
        }
    }

    /// Whether `query` is bound on `subject` by identity or position. The
    /// name fallback is not consulted.
    pub fn is_bound(&self, subject: &Subject, query: impl Into<ParamQuery>) -> ResolveResult<bool> {
        let bindings = self.resolve_all(subject)?;
        Ok(bindings.contains_key(&query.into().as_key()))
    }

    /// Bind `origin`'s declared parameters to the arguments of `site`.
    fn bind_direct(
        &self,
        site: TypeId,
        origin: DefId,
        into: &mut TypeBindings,
    ) -> ResolveResult<()> {
        let args = get_args(self.db, site);
        let keys: SmallVec<[BindingKey; 4]> = match self.db.def_kind(origin) {
            None | Some(DefKind::GenericMarker) => return Ok(()),
            Some(DefKind::Builtin(kind) | DefKind::RuntimeBuiltin(kind)) => {
                if args.len() != kind.arity() {
                    return Err(ResolveError::ArityMismatch {
                        site: TypeFormatter::new(self.db).format(site),
                        expected: kind.arity(),
                        found: args.len(),
                    });
                }
                // Positions continue after whatever is already bound.
                let start = into.len() as u32;
                (start..start + args.len() as u32)
                    .map(BindingKey::Index)
                    .collect()
            }
            Some(DefKind::Class | DefKind::Record) => self
                .declared_params(origin)
                .iter()
                .cloned()
                .map(BindingKey::Param)
                .collect(),
        };
        bind_type_params(self.db, site, &keys, &args, into)
    }

    /// Bind and walk every immediate base of `def`.
    fn walk_bases(
        &self,
        def: DefId,
        into: &mut TypeBindings,
        visited: &mut FxHashSet<TypeId>,
    ) -> ResolveResult<()> {
        let Some(info) = self.db.definition(def) else {
            return Ok(());
        };

        for &base in info.bases.iter() {
            // A base reached along a second path binds identically.
            if !visited.insert(base) {
                continue;
            }
            match get_origin(self.db, base) {
                Some(origin) => {
                    if self.db.def_kind(origin) == Some(DefKind::GenericMarker) {
                        continue;
                    }
                    trace!(def = def.0, base = base.0, origin = origin.0, "walk_bases");
                    self.bind_direct(base, origin, into)?;
                    self.walk_bases(origin, into, visited)?;
                }
                None => {
                    if let Some(TypeData::Class(parent)) = self.db.lookup(base) {
                        self.walk_bases(parent, into, visited)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// `HierarchyWalker::resolve_all` with default options.
pub fn resolve_all(db: &dyn TypeDatabase, subject: &Subject) -> ResolveResult<TypeBindings> {
    HierarchyWalker::new(db).resolve_all(subject)
}

/// `HierarchyWalker::resolve_one` with default options.
pub fn resolve_one(
    db: &dyn TypeDatabase,
    subject: &Subject,
    query: impl Into<ParamQuery>,
) -> ResolveResult<TypeId> {
    HierarchyWalker::new(db).resolve_one(subject, query)
}

/// `HierarchyWalker::is_bound` with default options.
pub fn is_bound(
    db: &dyn TypeDatabase,
    subject: &Subject,
    query: impl Into<ParamQuery>,
) -> ResolveResult<bool> {
    HierarchyWalker::new(db).is_bound(subject, query)
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
