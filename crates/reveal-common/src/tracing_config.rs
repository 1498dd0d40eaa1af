//! Tracing configuration for debugging resolution results.
//!
//! Supports three output formats controlled by `REVEAL_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, handy for
//!   following a hierarchy walk base by base
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Human-readable tree of every visited base and binding
//! REVEAL_LOG=trace REVEAL_LOG_FORMAT=tree cargo test -p reveal-solver
//!
//! # Fine-grained filtering
//! REVEAL_LOG="reveal_solver::hierarchy=trace" cargo test
//! ```
//!
//! The subscriber is only initialised when `REVEAL_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead otherwise.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name. Unknown names fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read from the `REVEAL_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        Self::parse(&std::env::var("REVEAL_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `REVEAL_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("REVEAL_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `REVEAL_LOG` nor `RUST_LOG` is set. Safe to call
/// more than once (e.g. from several tests): later calls are ignored.
///
/// All output goes to stderr.
pub fn init_tracing() {
    let has_reveal_log = std::env::var("REVEAL_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_reveal_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    // `try_init` so repeated initialisation from tests is not fatal.
    let _ = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);

            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
