//! Run loop settings from TOML (`[orchestrator]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Milliseconds between polls
    pub poll_interval_ms: u64,
    /// Seconds an assignment may stay Injecting/Active before it is failed
    pub max_active_secs: u64,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1500,
            max_active_secs: 600,
        }
    }
}

impl FileOrchestratorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_active_duration(&self) -> Duration {
        Duration::from_secs(self.max_active_secs)
    }
}
