//! Type-Parameter Resolution Engine
//!
//! Determines which concrete types were substituted for the type parameters
//! of a generic class, across deep and multiply-inherited hierarchies, and
//! flattens composite type expressions into the leaf types they mention.
//!
//! - **Interned type model**: `TypeData` behind `TypeId` handles, so binding
//!   consistency checks are integer comparisons
//! - **Hierarchy walking**: `resolve_all` / `resolve_one` over declared bases,
//!   with positional binding for the erased built-in forms
//! - **Gathering**: recursive flattening of unions, containers and records
//!
//! Resolution is recomputed on every call; nothing is cached between calls.
mod binding;
pub mod builtins;
mod class_hierarchy;
mod db;
pub mod def;
mod diagnostics;
mod format;
mod gather;
mod hierarchy;
mod intern;
pub mod options;
mod origin;
pub mod recursion;
pub mod type_classifier;
pub mod types;

pub use binding::{BindingKey, TypeBindings, bind_type_params};
pub use builtins::BuiltinGeneric;
pub use class_hierarchy::ClassBuilder;
pub use db::{FieldIntrospector, TypeDatabase, TypeEnvironment};
pub use def::*;
pub use diagnostics::{DeclarationError, LookupFailure, ResolveError, ResolveResult};
pub use format::TypeFormatter;
pub use gather::TypeGatherer;
pub use hierarchy::{
    HierarchyWalker, Instance, ParamQuery, Subject, is_bound, resolve_all, resolve_one,
};
pub use intern::TypeInterner;
pub use options::{RecordCyclePolicy, ResolverOptions};
pub use origin::{TypeArgs, get_args, get_origin};
pub use type_classifier::{TypeClassification, classify_type};
pub use types::{
    TypeApplication, TypeApplicationId, TypeData, TypeId, TypeListId, TypeParamId, TypeParamInfo,
    Variance,
};

// Test modules are loaded by their source files via #[path = "../tests/..."]
// declarations. Cross-module scenarios live here.
#[cfg(test)]
#[path = "../tests/fixtures.rs"]
mod fixtures;

#[cfg(test)]
#[path = "../tests/concurrency_tests.rs"]
mod concurrency_tests;

#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
