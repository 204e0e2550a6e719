//! Pane manager port
//!
//! Defines the interface to whatever hosts the agent panes (tmux, a test
//! double, ...). The application only lists, writes to and reads from panes;
//! spawning and destroying them is someone else's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during pane operations
#[derive(Error, Debug)]
pub enum PaneError {
    /// The pane no longer exists
    #[error("Pane not found: {0}")]
    NotFound(String),

    #[error("Pane command failed: {0}")]
    CommandFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaneError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PaneError::NotFound(_))
    }
}

/// A live pane as reported by the pane manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneInfo {
    pub index: u32,
    pub title: String,
}

impl PaneInfo {
    pub fn new(index: u32, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
        }
    }
}

/// Access to agent panes
#[async_trait]
pub trait PaneManager: Send + Sync {
    /// All panes of the current session
    async fn list_panes(&self) -> Result<Vec<PaneInfo>, PaneError>;

    /// Type `text` into the pane and submit it
    async fn send_text(&self, index: u32, text: &str) -> Result<(), PaneError>;

    /// Currently visible text of the pane
    async fn capture_text(&self, index: u32) -> Result<String, PaneError>;

    /// Status token (`WAITING`, `GENERATING`, ...) for a pane, given the text
    /// just captured from it.
    ///
    /// Adapters that can tell what the agent is doing override this. The
    /// default reports nothing, which keeps assignments where they are.
    fn status_token(&self, _index: u32, _captured: &str) -> Option<String> {
        None
    }
}
