//! Token budgets and the pre-flight estimator.

pub mod config;
pub mod estimator;

pub use config::BudgetConfig;
pub use estimator::{EXCEED_BUDGET, EstimateInput, EstimateOutput, ModeEstimate, estimate};
