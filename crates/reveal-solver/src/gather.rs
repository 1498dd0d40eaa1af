//! Composite type gathering.
//!
//! Flattens type expressions into the set of leaf types they mention:
//!
//! - containers and unions: their arguments, same context
//! - records (bare or parameterized): their field types, with the record
//!   itself as the new context
//! - type parameters: resolved against the current context
//! - anything else: kept as is
//!
//! Only lexically nested expressions are walked. The bases of a leaf class
//! are not.

use crate::db::{FieldIntrospector, TypeDatabase};
use crate::diagnostics::{ResolveError, ResolveResult};
use crate::format::TypeFormatter;
use crate::hierarchy::{HierarchyWalker, Subject};
use crate::options::{RecordCyclePolicy, ResolverOptions};
use crate::recursion::{DepthCounter, RecursionGuard, RecursionResult};
use crate::type_classifier::{TypeClassification, classify_type};
use crate::types::TypeId;
use reveal_common::limits;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

/// Cycle state of one gather call.
enum GatherState {
    Skip(RecursionGuard<TypeId>),
    Follow(DepthCounter),
}

impl GatherState {
    fn new(policy: RecordCyclePolicy, max_depth: u32, max_iterations: u32) -> Self {
        match policy {
            RecordCyclePolicy::Skip => Self::Skip(RecursionGuard::new(max_depth, max_iterations)),
            RecordCyclePolicy::Follow => Self::Follow(DepthCounter::new(max_depth)),
        }
    }

    fn enter(&mut self, record: TypeId) -> RecursionResult {
        match self {
            Self::Skip(guard) => guard.enter(record),
            Self::Follow(counter) => {
                if counter.enter() {
                    RecursionResult::Entered
                } else {
                    RecursionResult::DepthExceeded
                }
            }
        }
    }

    fn leave(&mut self, record: TypeId) {
        match self {
            Self::Skip(guard) => guard.leave(record),
            Self::Follow(counter) => counter.leave(),
        }
    }

    fn max_depth(&self) -> u32 {
        match self {
            Self::Skip(guard) => guard.max_depth(),
            Self::Follow(counter) => counter.max_depth(),
        }
    }
}

/// Collects leaf types of composite type expressions.
pub struct TypeGatherer<'a> {
    db: &'a dyn TypeDatabase,
    fields: &'a dyn FieldIntrospector,
    walker: HierarchyWalker<'a>,
    record_cycles: RecordCyclePolicy,
    max_depth: u32,
    max_iterations: u32,
}

impl<'a> TypeGatherer<'a> {
    pub fn new(db: &'a dyn TypeDatabase, fields: &'a dyn FieldIntrospector) -> Self {
        Self::with_options(db, fields, &ResolverOptions::default())
    }

    pub fn with_options(
        db: &'a dyn TypeDatabase,
        fields: &'a dyn FieldIntrospector,
        options: &ResolverOptions,
    ) -> Self {
        Self {
            db,
            fields,
            walker: HierarchyWalker::with_options(db, options),
            record_cycles: options.record_cycles,
            max_depth: options.max_gather_depth,
            max_iterations: options.max_gather_iterations,
        }
    }

    /// Leaf types of `ty`. Type parameters are resolved against `context`.
    pub fn gather(&self, ty: TypeId, context: Option<&Subject>) -> ResolveResult<FxHashSet<TypeId>> {
        self.gather_types(&[ty], context)
    }

    /// Leaf types of every expression in `types`, merged.
    pub fn gather_types(
        &self,
        types: &[TypeId],
        context: Option<&Subject>,
    ) -> ResolveResult<FxHashSet<TypeId>> {
        debug!(
            count = types.len(),
            policy = ?self.record_cycles,
            "gather_types"
        );
        let mut state = GatherState::new(self.record_cycles, self.max_depth, self.max_iterations);
        let mut out = FxHashSet::default();
        self.gather_into(types, context, &mut state, &mut out)?;
        Ok(out)
    }

    fn gather_into(
        &self,
        types: &[TypeId],
        context: Option<&Subject>,
        state: &mut GatherState,
        out: &mut FxHashSet<TypeId>,
    ) -> ResolveResult<()> {
        for &ty in types {
            match classify_type(self.db, ty) {
                TypeClassification::Container { args, .. } => {
                    self.gather_into(&args, context, state, out)?;
                }
                TypeClassification::Union(list_id) => {
                    let members = self.db.type_list(list_id);
                    self.gather_into(&members, context, state, out)?;
                }
                TypeClassification::Record(_) | TypeClassification::RecordApplication(..) => {
                    self.gather_record(ty, state, out)?;
                }
                TypeClassification::TypeParameter(param) => {
                    let Some(context) = context else {
                        return Err(ResolveError::NotGeneric {
                            subject: "<no context>".to_string(),
                        });
                    };
                    let resolved = self.walker.resolve_one(context, param)?;
                    trace!(param = ty.0, resolved = resolved.0, "gather: resolved parameter");
                    out.insert(resolved);
                }
                TypeClassification::Concrete(_)
                | TypeClassification::Application(..)
                | TypeClassification::Unknown => {
                    out.insert(ty);
                }
            }
        }
        Ok(())
    }

    /// Gather the field types of `record` with `record` as context.
    fn gather_record(
        &self,
        record: TypeId,
        state: &mut GatherState,
        out: &mut FxHashSet<TypeId>,
    ) -> ResolveResult<()> {
        let field_types: SmallVec<[TypeId; limits::TYPE_ARGS_INLINE]> = self
            .fields
            .record_fields(record)
            .map(|fields| fields.iter().map(|field| field.type_id).collect())
            .unwrap_or_default();
        let context = Subject::Type(record);

        match state.enter(record) {
            RecursionResult::Entered => {
                let result = self.gather_into(&field_types, Some(&context), state, out);
                state.leave(record);
                result
            }
            RecursionResult::Cycle => {
                warn!(
                    record = %TypeFormatter::new(self.db).format(record),
                    "gather: skipping self-referential record"
                );
                Ok(())
            }
            RecursionResult::DepthExceeded => Err(ResolveError::RecursionLimit {
                at: TypeFormatter::new(self.db).format(record),
                limit: state.max_depth(),
            }),
            RecursionResult::IterationExceeded => Err(ResolveError::ExpansionLimit {
                at: TypeFormatter::new(self.db).format(record),
                limit: self.max_iterations,
            }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/gather_tests.rs"]
mod tests;
