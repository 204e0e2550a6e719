//! Application layer for pane-ensemble
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod pane_mapper;
pub mod ports;
pub mod registry;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::OrchestratorParams;
pub use pane_mapper::PaneMapper;
pub use ports::{
    pane_manager::{PaneError, PaneInfo, PaneManager},
    preset_storage::{ImportSource, PresetCodec, PresetIoError, PresetStorage},
    progress::{EnsembleProgressNotifier, NoProgress},
    synthesis::{EnsembleOutcome, ModeOutput, NoSynthesis, SynthesisError, SynthesisHandler},
};
pub use registry::{RegistryWriteGuard, SharedRegistry};
pub use use_cases::estimate::{EstimateRequest, EstimateResult, EstimateUseCase};
pub use use_cases::export_preset::{ExportPresetInput, ExportPresetOutput, ExportPresetUseCase};
pub use use_cases::import_preset::{
    ImportPresetInput, ImportPresetOutput, ImportPresetUseCase, normalize_checksum, sha256_hex,
};
pub use use_cases::resolve_modes::{ModeSelection, ResolveModesUseCase, ResolvedSelection};
pub use use_cases::run_ensemble::{
    EnsembleRun, PaneBinding, PreparedEnsemble, RunEnsembleError, RunEnsembleInput,
    RunEnsembleUseCase,
};
