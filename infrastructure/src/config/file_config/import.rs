//! Preset import policy from TOML (`[import]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileImportConfig {
    /// Permit `http(s)://` sources without `--allow-remote`
    pub allow_remote: bool,
}
