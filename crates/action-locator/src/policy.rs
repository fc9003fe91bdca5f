use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_STORE_PATH: &str = "config/element-locators.json";

/// Tunables for a self-healing resolver session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealPolicy {
    /// Location of the persisted locator store
    pub store_path: PathBuf,
    /// Upper bound for a single lookup (plus element action)
    pub attempt_timeout_ms: u64,
    /// Upper bound for one whole resolution, across all strategies
    pub resolve_deadline_ms: u64,
    /// Expand each candidate through the alternative generator
    pub expand_alternatives: bool,
    /// Screen generated expressions before sending them to the driver
    pub precheck_generated: bool,
}

impl HealPolicy {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn resolve_deadline(&self) -> Duration {
        Duration::from_millis(self.resolve_deadline_ms)
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_resolve_deadline(mut self, deadline: Duration) -> Self {
        self.resolve_deadline_ms = deadline.as_millis() as u64;
        self
    }

    pub fn with_alternatives(mut self, enabled: bool) -> Self {
        self.expand_alternatives = enabled;
        self
    }

    pub fn with_precheck(mut self, enabled: bool) -> Self {
        self.precheck_generated = enabled;
        self
    }
}

impl Default for HealPolicy {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            attempt_timeout_ms: 5_000,
            resolve_deadline_ms: 30_000,
            expand_alternatives: true,
            precheck_generated: true,
        }
    }
}
