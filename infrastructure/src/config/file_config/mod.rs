//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod budget;
mod ensemble;
mod import;
mod orchestrator;
mod output;
mod tmux;

pub use budget::FileBudgetConfig;
pub use ensemble::FileEnsembleConfig;
pub use import::FileImportConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::FileOutputConfig;
pub use tmux::FileTmuxConfig;

use ensemble_application::OrchestratorParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("budget.{0} cannot be 0")]
    ZeroBudget(&'static str),

    #[error("orchestrator.poll_interval_ms cannot be 0")]
    ZeroPollInterval,

    #[error("orchestrator.max_active_secs cannot be 0")]
    ZeroActiveTimeout,

    #[error("ensemble.agent_type cannot be empty")]
    EmptyAgentType,

    #[error("tmux.capture_lines cannot be 0")]
    ZeroCaptureLines,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Run defaults
    pub ensemble: FileEnsembleConfig,
    /// Default token budget
    pub budget: FileBudgetConfig,
    /// Poll loop settings
    pub orchestrator: FileOrchestratorConfig,
    /// Preset import policy
    pub import: FileImportConfig,
    /// tmux adapter settings
    pub tmux: FileTmuxConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.budget.max_tokens_per_mode == 0 {
            issues.push(ConfigValidationError::ZeroBudget("max_tokens_per_mode"));
        }
        if self.budget.max_total_tokens == 0 {
            issues.push(ConfigValidationError::ZeroBudget("max_total_tokens"));
        }
        if self.orchestrator.poll_interval_ms == 0 {
            issues.push(ConfigValidationError::ZeroPollInterval);
        }
        if self.orchestrator.max_active_secs == 0 {
            issues.push(ConfigValidationError::ZeroActiveTimeout);
        }
        if self.ensemble.agent_type.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyAgentType);
        }
        if self.tmux.capture_lines == 0 {
            issues.push(ConfigValidationError::ZeroCaptureLines);
        }

        issues
    }

    /// Application-level run parameters derived from this file
    pub fn to_orchestrator_params(&self) -> OrchestratorParams {
        OrchestratorParams::default()
            .with_poll_interval(self.orchestrator.poll_interval())
            .with_max_active_duration(self.orchestrator.max_active_duration())
            .with_default_agent_type(self.ensemble.agent_type.trim())
            .with_default_budget(self.budget.to_budget())
            .with_allow_advanced(self.ensemble.allow_advanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::OutputFormat;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[ensemble]
default_preset = "bug-hunt"
agent_type = "codex"
allow_advanced = true

[budget]
max_tokens_per_mode = 3000
max_total_tokens = 20000

[orchestrator]
poll_interval_ms = 500
max_active_secs = 120

[import]
allow_remote = true

[tmux]
session = "work"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ensemble.default_preset.as_deref(), Some("bug-hunt"));
        assert_eq!(config.ensemble.agent_type, "codex");
        assert!(config.import.allow_remote);
        assert_eq!(config.tmux.session.as_deref(), Some("work"));
        assert_eq!(config.tmux.capture_lines, 200);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.validate().is_empty());

        let params = config.to_orchestrator_params();
        assert_eq!(params.poll_interval, Duration::from_millis(500));
        assert_eq!(params.max_active_duration, Duration::from_secs(120));
        assert_eq!(params.default_agent_type, "codex");
        assert_eq!(params.default_budget.max_total_tokens, 20000);
        assert!(params.allow_advanced);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str(
            r#"
[orchestrator]
poll_interval_ms = 250
"#,
        )
        .unwrap();
        assert_eq!(config.orchestrator.poll_interval_ms, 250);
        assert_eq!(config.orchestrator.max_active_secs, 600);
        assert_eq!(config.ensemble.agent_type, "claude");
        assert!(!config.import.allow_remote);
        assert!(config.output.color);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let mut config = FileConfig::default();
        config.budget.max_total_tokens = 0;
        config.orchestrator.poll_interval_ms = 0;
        config.ensemble.agent_type = "  ".to_string();

        let issues = config.validate();
        assert_eq!(
            issues,
            vec![
                ConfigValidationError::ZeroBudget("max_total_tokens"),
                ConfigValidationError::ZeroPollInterval,
                ConfigValidationError::EmptyAgentType,
            ]
        );
        assert_eq!(issues[0].to_string(), "budget.max_total_tokens cannot be 0");
    }
}
