//! String interner for display names.
//!
//! Parameter, class and field names are interned once and passed around as
//! `Atom` handles, so the linked-alias name lookup in the resolver compares
//! integers rather than strings.

use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

/// Handle to an interned string. Atom `0` is the empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

const SHARD_BITS: u32 = 4;
const SHARD_COUNT: usize = 1 << SHARD_BITS;

/// Names that appear in nearly every hierarchy: conventional parameter
/// names, the marker root and the built-in forms.
const PRELOADED: &[&str] = &[
    "T", "KT", "VT", "T_co", "T_contra", "V_co", "Generic", "Iterable", "Iterator", "Container",
    "Collection", "Sequence", "List", "Deque", "Set", "FrozenSet", "Mapping", "Dict", "Generator",
];

#[derive(Default)]
struct Shard {
    ids: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

/// Concurrent string interner.
///
/// Strings are spread over a fixed number of independently locked shards.
/// The low bits of an `Atom` select the shard and the high bits index into
/// it.
///
/// ```
/// use reveal_common::interner::ShardedInterner;
/// let names = ShardedInterner::new();
/// let t = names.intern("T");
/// assert_eq!(t, names.intern("T"));
/// assert_eq!(&*names.resolve(t), "T");
/// ```
pub struct ShardedInterner {
    shards: [RwLock<Shard>; SHARD_COUNT],
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardedInterner {
    pub fn new() -> Self {
        let interner = Self {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
        };
        // Reserve slot 0 of shard 0 for the empty string.
        {
            let mut first = interner.shards[0]
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let empty: Arc<str> = Arc::from("");
            first.strings.push(empty.clone());
            first.ids.insert(empty, Atom(0));
        }
        for name in PRELOADED {
            interner.intern(name);
        }
        interner
    }

    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom(0);
        }
        let shard_index = Self::shard_index(s);
        let mut shard = self.shards[shard_index]
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(&atom) = shard.ids.get(s) {
            return atom;
        }
        let atom = Atom(((shard.strings.len() as u32) << SHARD_BITS) | shard_index as u32);
        let owned: Arc<str> = Arc::from(s);
        shard.strings.push(owned.clone());
        shard.ids.insert(owned, atom);
        atom
    }

    /// The string behind `atom`. Unknown atoms resolve to the empty string.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        let shard_index = (atom.0 as usize) & (SHARD_COUNT - 1);
        let slot = (atom.0 >> SHARD_BITS) as usize;
        let shard = self.shards[shard_index]
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        shard
            .strings
            .get(slot)
            .cloned()
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().unwrap_or_else(PoisonError::into_inner).strings.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shard_index(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
