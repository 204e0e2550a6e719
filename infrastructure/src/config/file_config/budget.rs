//! Token budget from TOML (`[budget]` section)

use ensemble_domain::BudgetConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBudgetConfig {
    pub max_tokens_per_mode: u64,
    pub max_total_tokens: u64,
}

impl Default for FileBudgetConfig {
    fn default() -> Self {
        let budget = BudgetConfig::default();
        Self {
            max_tokens_per_mode: budget.max_tokens_per_mode,
            max_total_tokens: budget.max_total_tokens,
        }
    }
}

impl FileBudgetConfig {
    pub fn to_budget(&self) -> BudgetConfig {
        BudgetConfig::new(self.max_tokens_per_mode, self.max_total_tokens)
    }
}
