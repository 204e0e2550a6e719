//! tmux adapter for the pane manager port

mod pane_manager;

pub use pane_manager::{TmuxPaneManager, infer_status_token};
