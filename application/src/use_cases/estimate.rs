//! Estimate use case: resolve a selection and run the budget estimator.

use super::resolve_modes::{ModeSelection, ResolveModesUseCase, ResolvedSelection};
use crate::registry::SharedRegistry;
use ensemble_domain::{BudgetConfig, DomainError, EstimateInput, EstimateOutput, estimate};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct EstimateRequest {
    pub selection: ModeSelection,
    pub question: String,
    /// Non-zero fields override the preset/default budget
    pub budget_override: BudgetConfig,
    pub allow_advanced: bool,
}

impl EstimateRequest {
    pub fn new(selection: ModeSelection, question: impl Into<String>) -> Self {
        Self {
            selection,
            question: question.into(),
            budget_override: BudgetConfig::new(0, 0),
            allow_advanced: false,
        }
    }

    pub fn with_budget_override(mut self, budget: BudgetConfig) -> Self {
        self.budget_override = budget;
        self
    }

    pub fn with_allow_advanced(mut self, allow: bool) -> Self {
        self.allow_advanced = allow;
        self
    }
}

#[derive(Debug, Clone)]
pub struct EstimateResult {
    pub selection: ResolvedSelection,
    pub output: EstimateOutput,
}

pub struct EstimateUseCase {
    registry: Arc<SharedRegistry>,
    resolver: ResolveModesUseCase,
    default_budget: BudgetConfig,
    allow_advanced: bool,
}

impl EstimateUseCase {
    pub fn new(registry: Arc<SharedRegistry>) -> Self {
        Self {
            resolver: ResolveModesUseCase::new(Arc::clone(&registry)),
            registry,
            default_budget: BudgetConfig::default(),
            allow_advanced: false,
        }
    }

    /// Budget applied when neither the preset nor the request sets one
    pub fn with_default_budget(mut self, budget: BudgetConfig) -> Self {
        self.default_budget = budget;
        self
    }

    /// Allow advanced modes for every request
    pub fn with_allow_advanced(mut self, allow: bool) -> Self {
        self.allow_advanced = allow;
        self
    }

    /// Resolve `request.selection` and estimate it.
    ///
    /// Only resolution errors (unknown preset, dangling preset reference) are
    /// returned as `Err`; everything the estimator finds is a warning.
    pub fn execute(&self, request: &EstimateRequest) -> Result<EstimateResult, DomainError> {
        let selection = self.resolver.execute(&request.selection)?;
        let budget = selection
            .budget
            .unwrap_or(self.default_budget)
            .merged_with(request.budget_override);
        let allow_advanced =
            request.allow_advanced || selection.allow_advanced || self.allow_advanced;

        let input = EstimateInput::new(selection.mode_ids.clone(), request.question.clone(), budget)
            .with_allow_advanced(allow_advanced);
        let output = estimate(&self.registry.catalog(), &input);

        debug!(
            "Estimated {} modes at {} tokens",
            output.modes.len(),
            output.total_tokens
        );
        for warning in &output.warnings {
            warn!("{}", warning);
        }

        Ok(EstimateResult { selection, output })
    }
}
