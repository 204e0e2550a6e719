//! Orchestrator parameters: run loop control.
//!
//! [`OrchestratorParams`] groups the static parameters that control the
//! polling loop in [`RunEnsembleUseCase`](crate::use_cases::run_ensemble::RunEnsembleUseCase)
//! together with the defaults applied when a run does not override them.

use ensemble_domain::BudgetConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Delay between two polls of the panes.
    pub poll_interval: Duration,
    /// How long an assignment may stay Injecting/Active, measured from the
    /// start of injection.
    pub max_active_duration: Duration,
    /// Agent type used when the caller does not bind panes explicitly.
    pub default_agent_type: String,
    /// Budget used when neither a preset nor the caller sets one.
    pub default_budget: BudgetConfig,
    /// Allow advanced modes without a per-run opt-in.
    pub allow_advanced: bool,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1_500),
            max_active_duration: Duration::from_secs(600),
            default_agent_type: "claude".to_string(),
            default_budget: BudgetConfig::default(),
            allow_advanced: false,
        }
    }
}

impl OrchestratorParams {
    // ==================== Builder Methods ====================

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_active_duration(mut self, duration: Duration) -> Self {
        self.max_active_duration = duration;
        self
    }

    pub fn with_default_agent_type(mut self, agent_type: impl Into<String>) -> Self {
        self.default_agent_type = agent_type.into();
        self
    }

    pub fn with_default_budget(mut self, budget: BudgetConfig) -> Self {
        self.default_budget = budget;
        self
    }

    pub fn with_allow_advanced(mut self, allow: bool) -> Self {
        self.allow_advanced = allow;
        self
    }
}
