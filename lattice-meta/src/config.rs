//! Per-class configuration.
//!
//! A root class uses `Config::default()` unless one is given; derived classes
//! inherit their parent's configuration.

use serde::{Deserialize, Serialize};

/// What to do when an inherited handler was declared against a signal whose
/// arity a subclass later changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArityPolicy {
    /// Log a warning and connect the handler anyway.
    #[default]
    Warn,
    /// Abort construction.
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub arity_mismatch: ArityPolicy,

    /// Upper bound on alias hops followed while resolving a canonical name.
    pub max_alias_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arity_mismatch: ArityPolicy::Warn,
            max_alias_depth: 32,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_arity_policy(mut self, policy: ArityPolicy) -> Self {
        self.arity_mismatch = policy;
        self
    }
}
