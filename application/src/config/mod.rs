//! Application-level configuration.
//!
//! - [`OrchestratorParams`]: run loop control and per-run defaults

pub mod orchestrator_params;

pub use orchestrator_params::OrchestratorParams;
