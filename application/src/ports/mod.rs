//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod pane_manager;
pub mod preset_storage;
pub mod progress;
pub mod synthesis;
