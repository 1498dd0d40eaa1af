//! Guards for record expansion during gathering.
//!
//! A record may mention itself, directly or through another record. Each
//! cycle policy gets its own guard:
//!
//! - [`RecursionGuard`] remembers which records are being expanded, so
//!   reaching one again is reported as a cycle. It also caps nesting depth
//!   and the total number of expansions in one call.
//! - [`DepthCounter`] only caps nesting depth. A record may be expanded
//!   again inside itself until the cap stops the walk.
//!
//! Dropping a guard that still has entries panics in debug builds: every
//! successful `enter` must be paired with a `leave`.

use reveal_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Outcome of asking a guard to expand one more record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already being expanded further up.
    Cycle,
    DepthExceeded,
    /// The call has used up its expansion budget.
    IterationExceeded,
}

/// Visiting-set guard with depth and expansion caps.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            iterations: 0,
            max_depth: max_depth.min(limits::MAX_GATHER_VISITING),
            max_iterations,
        }
    }

    /// On [`RecursionResult::Entered`] the caller must [`leave`](Self::leave)
    /// with the same key.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        // Every visiting key is one level of nesting.
        if self.visiting.len() as u32 >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        self.visiting.insert(key);
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(was_present, "RecursionGuard::leave() for a key that was not entered");
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} records still being expanded",
                self.visiting.len(),
            );
        }
    }
}

/// Depth-only guard.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self { depth: 0, max_depth }
    }

    /// On `false` the depth is unchanged and `leave()` must not be called.
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped at depth {}", self.depth);
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
