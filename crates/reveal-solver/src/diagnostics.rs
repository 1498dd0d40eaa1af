//! Errors raised by resolution and by class declaration.
//!
//! Every resolution error is terminal for the query that raised it. There is
//! no partial result: a hierarchy that binds one parameter two ways, or a
//! query for a parameter that was never bound, aborts the call.
//!
//! Messages carry rendered type names (via `TypeFormatter`) rather than ids,
//! so an error can be reported without access to the environment.

use std::fmt;
use thiserror::Error;

/// Why a parameter lookup in `resolve_one` found nothing usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupFailure {
    /// Nothing bound matches the query.
    Missing,
    /// The identity did not match and several bindings share the name.
    Ambiguous { matches: usize },
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("no binding matches it"),
            Self::Ambiguous { matches } => {
                write!(f, "{matches} bindings share that name")
            }
        }
    }
}

/// Resolution failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Declared parameter count and argument count disagree at one site.
    #[error(
        "`{site}` supplies {found} type argument(s) but its origin declares {expected} parameter(s)"
    )]
    ArityMismatch {
        site: String,
        expected: usize,
        found: usize,
    },

    /// One parameter reached along two paths with different instantiations.
    #[error(
        "type parameter `{parameter}` is bound to both `{existing}` and `{conflicting}`; \
         is it always instantiated with the same type?"
    )]
    BindingConflict {
        parameter: String,
        existing: String,
        conflicting: String,
    },

    /// The subject takes part in no generic hierarchy.
    #[error("could not determine type parameters of `{subject}`: it is not a generic type or instance")]
    NotGeneric { subject: String },

    /// The queried parameter is not among the subject's bindings.
    #[error("could not find type parameter `{parameter}` for `{subject}`: {failure}")]
    UnknownParameter {
        parameter: String,
        subject: String,
        failure: LookupFailure,
    },

    /// Gathering nested deeper than the configured limit.
    #[error("gathering exceeded the nesting limit of {limit} at `{at}`")]
    RecursionLimit { at: String, limit: u32 },

    /// Gathering expanded more records in one call than its budget allows.
    #[error("gathering exceeded the budget of {limit} record expansions at `{at}`")]
    ExpansionLimit { at: String, limit: u32 },
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Rejected class declaration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("base `{base}` of `{class}` is not a class or a parameterization of one")]
    InvalidBase { class: String, base: String },

    #[error("base `{base}` of `{class}` refers to a class that has not been declared")]
    UnknownBase { class: String, base: String },

    #[error("`{class}` inherits from the generic marker more than once")]
    DuplicateMarker { class: String },

    #[error("arguments of the generic marker on `{class}` must all be type parameters, found `{argument}`")]
    NonParameterMarkerArgument { class: String, argument: String },

    #[error("type parameter `{parameter}` is declared more than once on `{class}`")]
    DuplicateParameter { class: String, parameter: String },

    #[error("type parameter `{parameter}` is used by a base of `{class}` but is not declared")]
    UndeclaredParameter { class: String, parameter: String },
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
