//! Well-known built-in generic containers and protocols.
//!
//! These forms do not retain a declared parameter list, so an instantiation
//! such as `Dict[K, V]` can only be bound by position. The table below is
//! the complete, fixed set of such forms together with their canonical
//! parameter count.
//!
//! Each form exists twice in a `TypeEnvironment`: the canonical generic
//! form (`Dict`) and the runtime implementation type (`dict`). The origin
//! of a parameterization over either one is always the canonical form.
//!
//! The collection forms (`Collection` and everything below it: `Sequence`,
//! `List`, `Deque`, `Set`, `FrozenSet`, `Mapping`, `Dict`) hold values of
//! their argument types. The remaining protocol forms do not.

/// A well-known built-in generic shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinGeneric {
    Iterable,
    Iterator,
    Container,
    Collection,
    Sequence,
    List,
    Deque,
    Set,
    FrozenSet,
    Mapping,
    Dict,
    Generator,
}

impl BuiltinGeneric {
    pub const ALL: [BuiltinGeneric; 12] = [
        Self::Iterable,
        Self::Iterator,
        Self::Container,
        Self::Collection,
        Self::Sequence,
        Self::List,
        Self::Deque,
        Self::Set,
        Self::FrozenSet,
        Self::Mapping,
        Self::Dict,
        Self::Generator,
    ];

    /// Number of parameters every instantiation must supply.
    pub const fn arity(self) -> usize {
        match self {
            Self::Mapping | Self::Dict => 2,
            Self::Generator => 3,
            _ => 1,
        }
    }

    /// Whether the form is a sized collection of its arguments. Only these
    /// are looked inside when gathering. Protocols such as `Iterator` or
    /// `Generator` describe behaviour, not contents, and stay leaves.
    pub const fn is_collection(self) -> bool {
        !matches!(
            self,
            Self::Iterable | Self::Iterator | Self::Container | Self::Generator
        )
    }

    /// Name of the canonical generic form, e.g. `Dict`.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Iterable => "Iterable",
            Self::Iterator => "Iterator",
            Self::Container => "Container",
            Self::Collection => "Collection",
            Self::Sequence => "Sequence",
            Self::List => "List",
            Self::Deque => "Deque",
            Self::Set => "Set",
            Self::FrozenSet => "FrozenSet",
            Self::Mapping => "Mapping",
            Self::Dict => "Dict",
            Self::Generator => "Generator",
        }
    }

    /// Name of the runtime implementation type, e.g. `dict`.
    pub const fn runtime_name(self) -> &'static str {
        match self {
            Self::Iterable => "collections.abc.Iterable",
            Self::Iterator => "collections.abc.Iterator",
            Self::Container => "collections.abc.Container",
            Self::Collection => "collections.abc.Collection",
            Self::Sequence => "collections.abc.Sequence",
            Self::List => "list",
            Self::Deque => "collections.deque",
            Self::Set => "set",
            Self::FrozenSet => "frozenset",
            Self::Mapping => "collections.abc.Mapping",
            Self::Dict => "dict",
            Self::Generator => "collections.abc.Generator",
        }
    }
}

#[cfg(test)]
#[path = "../tests/builtins_tests.rs"]
mod tests;
