//! Shared domain types used across Tally crates.

use serde::{Deserialize, Serialize};

/// How a completed request clears the transient status turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// Remove only the status turn owned by the completed request.
    #[default]
    Correlated,
    /// Remove every status turn in the log, whichever request owns it.
    Legacy,
}

impl std::fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveMode::Correlated => write!(f, "correlated"),
            ResolveMode::Legacy => write!(f, "legacy"),
        }
    }
}
