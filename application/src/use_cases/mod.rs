//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod estimate;
pub mod export_preset;
pub mod import_preset;
pub mod resolve_modes;
pub mod run_ensemble;
