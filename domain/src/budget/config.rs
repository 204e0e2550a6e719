//! Token budget for one ensemble run.

use serde::{Deserialize, Serialize};

/// Token ceilings applied to an ensemble run.
///
/// Two knobs:
/// - `max_tokens_per_mode`: ceiling for any single mode's estimate
/// - `max_total_tokens`: ceiling for the summed estimate of all modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub max_tokens_per_mode: u64,
    pub max_total_tokens: u64,
}

impl BudgetConfig {
    pub fn new(max_tokens_per_mode: u64, max_total_tokens: u64) -> Self {
        Self {
            max_tokens_per_mode,
            max_total_tokens,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_tokens_per_mode(mut self, tokens: u64) -> Self {
        self.max_tokens_per_mode = tokens;
        self
    }

    pub fn with_max_total_tokens(mut self, tokens: u64) -> Self {
        self.max_total_tokens = tokens;
        self
    }

    /// Overlay non-zero fields of `overrides` onto this budget.
    pub fn merged_with(self, overrides: BudgetConfig) -> Self {
        Self {
            max_tokens_per_mode: if overrides.max_tokens_per_mode > 0 {
                overrides.max_tokens_per_mode
            } else {
                self.max_tokens_per_mode
            },
            max_total_tokens: if overrides.max_total_tokens > 0 {
                overrides.max_total_tokens
            } else {
                self.max_total_tokens
            },
        }
    }

    // ==================== Validation ====================

    /// Validate this budget, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_tokens_per_mode == 0 {
            issues.push("budget: max_tokens_per_mode must be > 0".to_string());
        }
        if self.max_total_tokens == 0 {
            issues.push("budget: max_total_tokens must be > 0".to_string());
        }
        if self.max_total_tokens < self.max_tokens_per_mode {
            issues.push(format!(
                "budget: max_total_tokens ({}) must be >= max_tokens_per_mode ({})",
                self.max_total_tokens, self.max_tokens_per_mode
            ));
        }
        issues
    }
}

impl Default for BudgetConfig {
    /// Default: 4000 tokens per mode, 50000 in total.
    fn default() -> Self {
        Self {
            max_tokens_per_mode: 4_000,
            max_total_tokens: 50_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let budget = BudgetConfig::default();
        assert_eq!(budget.max_tokens_per_mode, 4_000);
        assert_eq!(budget.max_total_tokens, 50_000);
        assert!(budget.validate().is_empty());
    }

    #[test]
    fn test_merged_with_keeps_zero_fields() {
        let merged = BudgetConfig::default().merged_with(BudgetConfig::new(0, 9_000));
        assert_eq!(merged.max_tokens_per_mode, 4_000);
        assert_eq!(merged.max_total_tokens, 9_000);
    }

    #[test]
    fn test_validate_total_less_than_per_mode() {
        let issues = BudgetConfig::new(8_000, 4_000).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("max_total_tokens"));
    }

    #[test]
    fn test_partial_toml_like_input_uses_defaults() {
        let budget: BudgetConfig = serde_json::from_str(r#"{"max_total_tokens": 12000}"#).unwrap();
        assert_eq!(budget.max_tokens_per_mode, 4_000);
        assert_eq!(budget.max_total_tokens, 12_000);
    }
}
