//! Infrastructure layer for pane-ensemble
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod modes;
pub mod presets;
pub mod tmux;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSource, ConfigValidationError, FileBudgetConfig, FileConfig,
    FileEnsembleConfig, FileImportConfig, FileOrchestratorConfig, FileOutputConfig,
    FileTmuxConfig,
};
pub use modes::{ModeLoadError, ModeLoader};
pub use presets::{FilePresetStorage, TomlPresetCodec};
pub use tmux::TmuxPaneManager;
