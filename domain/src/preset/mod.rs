//! Ensemble presets
//!
//! Named, reusable ensembles: ordered mode references plus synthesis and
//! budget defaults. Presets come from the embedded set or from user imports.

pub mod document;
pub mod embedded;
pub mod entities;
pub mod registry;
pub mod strategy;

pub use document::{PRESET_SCHEMA_VERSION, PresetDocument};
pub use embedded::{default_registry, embedded_presets};
pub use entities::{EnsemblePreset, ModeRef, PresetSource, ResolvedPreset};
pub use registry::PresetRegistry;
pub use strategy::{STRATEGIES, StrategyConfig, SynthesisConfig, SynthesisStrategy};
