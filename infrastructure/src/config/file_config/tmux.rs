//! tmux adapter settings from TOML (`[tmux]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTmuxConfig {
    /// Session to search for panes; all sessions when unset
    pub session: Option<String>,
    /// Scrollback lines read per capture
    pub capture_lines: u32,
}

impl Default for FileTmuxConfig {
    fn default() -> Self {
        Self {
            session: None,
            capture_lines: 200,
        }
    }
}
