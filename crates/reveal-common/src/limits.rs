//! Centralized limits for the resolver.
//!
//! Resolution walks are bounded by the declared hierarchy, which is finite and
//! acyclic. The only walk that can grow without bound is gathering through a
//! self-referential record type, so most of the values here exist to turn a
//! would-be stack overflow into a reported error.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for composite type gathering.
///
/// Each record whose fields are expanded adds one level. Containers and
/// unions are finite expressions and do not count. The limit only matters
/// when record cycles are followed.
///
/// ```text
/// Tree { value: Int, children: List[Tree] }
/// //  gathering `Tree` with cycle following enabled expands
/// //  Tree again at every level until this limit
/// ```
pub const MAX_GATHER_DEPTH: u32 = 64;

/// Maximum number of record types tracked on one gathering path.
pub const MAX_GATHER_VISITING: u32 = 10_000;

/// Total number of record expansions a single gather call may perform.
pub const MAX_GATHER_ITERATIONS: u32 = 100_000;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Inline capacity for argument lists. Nearly every parameterization in
/// practice has at most four arguments (`Generator` has three).
pub const TYPE_ARGS_INLINE: usize = 4;

/// Initial capacity of a freshly built binding map.
pub const BINDINGS_INITIAL_CAPACITY: usize = 8;
