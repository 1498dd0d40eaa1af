//! Resolver options.
//!
//! Loaded from JSON and overridable from the environment:
//!
//! ```text
//! REVEAL_NAME_FALLBACK=false
//! REVEAL_RECORD_CYCLES=follow
//! REVEAL_MAX_GATHER_DEPTH=16
//! REVEAL_MAX_GATHER_ITERATIONS=4096
//! ```

use reveal_common::limits;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// What gathering does when a record is reached again inside its own
/// expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCyclePolicy {
    /// Do not expand the record a second time.
    #[default]
    Skip,
    /// Expand it again, until `max_gather_depth` stops the walk with
    /// `ResolveError::RecursionLimit`.
    Follow,
}

impl RecordCyclePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "follow" => Some(Self::Follow),
            _ => None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accepts `true` as well as `"true"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => parse_bool(&s).ok_or_else(|| {
            Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))
        }),
    }
}

/// Rejects `0`, which would stop every gather before its first record.
fn deserialize_positive_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match u32::deserialize(deserializer)? {
        0 => Err(Error::custom("expected a positive limit, found 0")),
        n => Ok(n),
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolverOptions {
    /// Let `resolve_one` match a parameter by display name when its
    /// identity is not bound.
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub name_fallback: bool,

    pub record_cycles: RecordCyclePolicy,

    /// Maximum record nesting while gathering.
    #[serde(deserialize_with = "deserialize_positive_u32")]
    pub max_gather_depth: u32,

    /// Maximum record expansions in one gather call.
    #[serde(deserialize_with = "deserialize_positive_u32")]
    pub max_gather_iterations: u32,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            name_fallback: true,
            record_cycles: RecordCyclePolicy::Skip,
            max_gather_depth: limits::MAX_GATHER_DEPTH,
            max_gather_iterations: limits::MAX_GATHER_ITERATIONS,
        }
    }
}

impl ResolverOptions {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Defaults with the `REVEAL_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparseable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup("REVEAL_NAME_FALLBACK") {
            match parse_bool(&value) {
                Some(enabled) => self.name_fallback = enabled,
                None => warn!(value = %value, "ignoring invalid REVEAL_NAME_FALLBACK"),
            }
        }
        if let Some(value) = lookup("REVEAL_RECORD_CYCLES") {
            match RecordCyclePolicy::parse(&value) {
                Some(policy) => self.record_cycles = policy,
                None => warn!(value = %value, "ignoring invalid REVEAL_RECORD_CYCLES"),
            }
        }
        if let Some(value) = lookup("REVEAL_MAX_GATHER_DEPTH") {
            match parse_positive(&value) {
                Some(depth) => self.max_gather_depth = depth,
                None => warn!(value = %value, "ignoring invalid REVEAL_MAX_GATHER_DEPTH"),
            }
        }
        if let Some(value) = lookup("REVEAL_MAX_GATHER_ITERATIONS") {
            match parse_positive(&value) {
                Some(budget) => self.max_gather_iterations = budget,
                None => warn!(value = %value, "ignoring invalid REVEAL_MAX_GATHER_ITERATIONS"),
            }
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
