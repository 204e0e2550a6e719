//! Ensemble defaults from TOML (`[ensemble]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEnsembleConfig {
    /// Preset used by `run`/`estimate` when neither a preset nor modes are given
    pub default_preset: Option<String>,
    /// Agent type written into default pane names
    pub agent_type: String,
    /// Let advanced-tier modes run without a per-command opt-in
    pub allow_advanced: bool,
}

impl Default for FileEnsembleConfig {
    fn default() -> Self {
        Self {
            default_preset: None,
            agent_type: "claude".to_string(),
            allow_advanced: false,
        }
    }
}
