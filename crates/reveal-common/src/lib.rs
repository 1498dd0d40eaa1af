//! Common types and utilities for the reveal resolver.
//!
//! This crate provides foundational pieces used by the solver crate:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Resolver limits and capacity hints
//! - Tracing subscriber setup

// String interning for parameter, class and field names
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Subscriber initialisation, driven by REVEAL_LOG / REVEAL_LOG_FORMAT
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
