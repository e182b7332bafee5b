use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PENDING: usize = 100;

/// What the sync driver does when a remote write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    Rollback,
    /// Keep the optimistic value and only report the error.
    KeepOptimistic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_pending: usize,
    pub on_failure: FailurePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pending: DEFAULT_MAX_PENDING,
            on_failure: FailurePolicy::default(),
        }
    }
}
