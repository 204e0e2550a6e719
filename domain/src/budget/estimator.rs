//! Pre-flight token estimation for an ensemble.
//!
//! [`estimate`] is a pure function of the catalog and an [`EstimateInput`].
//! It never fails: problems (unknown modes, advanced modes without opt-in,
//! budget overruns) are reported as warnings next to the full per-mode
//! breakdown, and the caller decides whether to proceed.
//!
//! # Heuristic
//!
//! ```text
//! estimate = tier_floor + payload_chars / 4 + question_chars / 4 + PROMPT_OVERHEAD
//! ```
//!
//! The constants are tunable. What callers may rely on is the ordering:
//! estimates grow with the question, Core modes never fall below
//! [`CORE_TIER_FLOOR`], and identical inputs give identical outputs.

use super::config::BudgetConfig;
use crate::catalog::{ModeCatalog, ModeTier, ReasoningMode};
use serde::{Deserialize, Serialize};

/// Minimum estimate for a Core-tier mode.
pub const CORE_TIER_FLOOR: u64 = 3_000;

/// Minimum estimate for an Advanced-tier mode.
pub const ADVANCED_TIER_FLOOR: u64 = 4_500;

/// Fixed cost of the prompt scaffolding around mode and question text.
pub const PROMPT_OVERHEAD: u64 = 250;

const CHARS_PER_TOKEN: u64 = 4;

/// Substring present in every budget overrun warning.
pub const EXCEED_BUDGET: &str = "exceed budget";

/// Input to [`estimate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// Mode ids or codes, in requested order
    pub mode_ids: Vec<String>,
    pub question: String,
    pub budget: BudgetConfig,
    pub allow_advanced: bool,
}

impl EstimateInput {
    pub fn new(mode_ids: Vec<String>, question: impl Into<String>, budget: BudgetConfig) -> Self {
        Self {
            mode_ids,
            question: question.into(),
            budget,
            allow_advanced: false,
        }
    }

    pub fn with_allow_advanced(mut self, allow: bool) -> Self {
        self.allow_advanced = allow;
        self
    }
}

/// Estimate for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeEstimate {
    pub mode_id: String,
    pub code: String,
    pub name: String,
    pub tier: ModeTier,
    pub token_estimate: u64,
}

/// Output of [`estimate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateOutput {
    pub modes: Vec<ModeEstimate>,
    pub total_tokens: u64,
    pub budget: BudgetConfig,
    pub warnings: Vec<String>,
    /// Requested entries left out of the estimate (unknown or advanced)
    pub skipped: Vec<String>,
}

impl EstimateOutput {
    pub fn has_budget_warning(&self) -> bool {
        self.warnings.iter().any(|w| w.contains(EXCEED_BUDGET))
    }

    /// Canonical ids of the modes that made it into the estimate.
    pub fn mode_ids(&self) -> Vec<String> {
        self.modes.iter().map(|m| m.mode_id.clone()).collect()
    }
}

/// Token estimate for a single mode and question length (in chars).
pub fn estimate_mode_tokens(mode: &ReasoningMode, question_chars: usize) -> u64 {
    let floor = match mode.tier {
        ModeTier::Core => CORE_TIER_FLOOR,
        ModeTier::Advanced => ADVANCED_TIER_FLOOR,
    };
    floor
        + mode.payload_chars() as u64 / CHARS_PER_TOKEN
        + question_chars as u64 / CHARS_PER_TOKEN
        + PROMPT_OVERHEAD
}

/// Estimate token usage of running `input.mode_ids` against `input.question`.
pub fn estimate(catalog: &ModeCatalog, input: &EstimateInput) -> EstimateOutput {
    let question_chars = input.question.chars().count();
    let mut modes: Vec<ModeEstimate> = Vec::with_capacity(input.mode_ids.len());
    let mut warnings = Vec::new();
    let mut skipped = Vec::new();

    for reference in &input.mode_ids {
        let Some(mode) = catalog.resolve(reference) else {
            warnings.push(format!("mode {reference:?} not found in catalog; skipped"));
            skipped.push(reference.clone());
            continue;
        };
        if modes.iter().any(|m| m.mode_id == mode.id) {
            continue;
        }
        if mode.tier == ModeTier::Advanced && !input.allow_advanced {
            warnings.push(format!(
                "mode {} ({}) is advanced tier and was excluded; enable allow_advanced to include it",
                mode.id, mode.code
            ));
            skipped.push(mode.id.clone());
            continue;
        }
        modes.push(ModeEstimate {
            mode_id: mode.id.clone(),
            code: mode.code.clone(),
            name: mode.name.clone(),
            tier: mode.tier,
            token_estimate: estimate_mode_tokens(mode, question_chars),
        });
    }

    if modes.is_empty() {
        warnings.push("no runnable modes selected".to_string());
    }

    for m in &modes {
        if m.token_estimate > input.budget.max_tokens_per_mode {
            warnings.push(format!(
                "mode {} estimate of {} tokens would {EXCEED_BUDGET} of {} tokens per mode",
                m.mode_id, m.token_estimate, input.budget.max_tokens_per_mode
            ));
        }
    }

    let total_tokens: u64 = modes.iter().map(|m| m.token_estimate).sum();
    if total_tokens > input.budget.max_total_tokens {
        warnings.push(format!(
            "estimated total of {} tokens would {EXCEED_BUDGET} of {} tokens",
            total_tokens, input.budget.max_total_tokens
        ));
    }

    EstimateOutput {
        modes,
        total_tokens,
        budget: input.budget,
        warnings,
        skipped,
    }
}
