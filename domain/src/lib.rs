//! Domain layer for pane-ensemble
//!
//! Pure logic for coordinating an ensemble of terminal-hosted agents: no I/O,
//! no async, no knowledge of tmux or files.
//!
//! # Core Concepts
//!
//! ## Catalog and presets
//!
//! - **Mode**: a reasoning persona with an id (`deductive`) and a code (`A1`)
//! - **Preset**: a named, reusable ensemble of mode references
//!
//! ## Budget
//!
//! [`estimate`] predicts token usage before anything runs and reports
//! overruns as warnings.
//!
//! ## Sessions
//!
//! Each mode is bound to a pane as a [`ModeAssignment`] that moves forward
//! through `Pending → Injecting → Active → Done | Error`. The pane's state is
//! read off its screen text by the [`liveness`] classifier.

pub mod budget;
pub mod catalog;
pub mod config;
pub mod core;
pub mod liveness;
pub mod preset;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use budget::{BudgetConfig, EXCEED_BUDGET, EstimateInput, EstimateOutput, ModeEstimate, estimate};
pub use catalog::{
    CATALOG_VERSION, ModeCatalog, ModeCategory, ModeSource, ModeTier, ReasoningMode,
    default_catalog, embedded_modes,
};
pub use config::OutputFormat;
pub use core::{error::DomainError, question::Question};
pub use liveness::{
    AgentActivity, LivenessSignal, PATTERN_TABLE_VERSION, PaneObservation, classify_state,
    detect_rate_limit, extract_errors, observe,
};
pub use preset::{
    EnsemblePreset, ModeRef, PRESET_SCHEMA_VERSION, PresetDocument, PresetRegistry, PresetSource,
    ResolvedPreset, STRATEGIES, StrategyConfig, SynthesisConfig, SynthesisStrategy,
    default_registry, embedded_presets,
};
pub use prompt::PromptTemplate;
pub use session::{
    AssignmentEvent, AssignmentSpec, AssignmentStatus, AssignmentView, EnsembleSession,
    ModeAssignment, SessionSnapshot, Transition, default_pane_name, transition,
};
pub use util::{split_comma_separated, truncate_str};
