//! Layered mode catalog loader
//!
//! Builds the catalog from the embedded modes, then the user file, then the
//! project file. A later layer replaces an earlier mode with the same id in
//! place and appends new ones. Missing files are skipped.
//!
//! ```toml
//! [[modes]]
//! id = "threat-hunting"
//! code = "K4"
//! name = "Threat Hunting"
//! tier = "core"          # optional, defaults to advanced
//! category = "Domain"    # optional, derived from the code letter
//! short_desc = "..."
//! outputs = "..."
//! failure_modes = ["..."]
//! ```

use crate::config::ConfigLoader;
use ensemble_domain::{
    CATALOG_VERSION, DomainError, ModeCatalog, ModeCategory, ModeSource, ModeTier, ReasoningMode,
    embedded_modes,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ModeLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mode file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Mode #{index} in {path} has no id")]
    MissingId { path: PathBuf, index: usize },

    #[error("Mode {id} in {path}: {message}")]
    Invalid {
        path: PathBuf,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Default, Deserialize)]
struct ModeFile {
    #[serde(default)]
    modes: Vec<FileMode>,
}

#[derive(Debug, Deserialize)]
struct FileMode {
    id: Option<String>,
    code: Option<String>,
    name: Option<String>,
    category: Option<ModeCategory>,
    tier: Option<ModeTier>,
    #[serde(default)]
    short_desc: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    outputs: String,
    #[serde(default)]
    best_for: Vec<String>,
    #[serde(default)]
    failure_modes: Vec<String>,
}

impl FileMode {
    fn into_mode(self, path: &Path, index: usize, source: ModeSource) -> Result<ReasoningMode, ModeLoadError> {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                return Err(ModeLoadError::MissingId {
                    path: path.to_path_buf(),
                    index: index + 1,
                });
            }
        };
        let invalid = |message: &str| ModeLoadError::Invalid {
            path: path.to_path_buf(),
            id: id.clone(),
            message: message.to_string(),
        };

        let code = self.code.ok_or_else(|| invalid("missing code"))?;
        let category = match self.category {
            Some(category) => category,
            None => code
                .chars()
                .next()
                .and_then(ModeCategory::from_letter)
                .ok_or_else(|| invalid("cannot derive category from code"))?,
        };
        let name = self.name.unwrap_or_else(|| id.clone());

        let mode = ReasoningMode {
            id,
            code,
            name,
            category,
            tier: self.tier.unwrap_or(ModeTier::Advanced),
            short_desc: self.short_desc,
            description: self.description,
            outputs: self.outputs,
            best_for: self.best_for,
            failure_modes: self.failure_modes,
            source,
        };
        mode.validate()?;
        Ok(mode)
    }
}

/// Loads the mode catalog from the embedded set plus optional TOML layers
#[derive(Debug, Clone)]
pub struct ModeLoader {
    user_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Default for ModeLoader {
    fn default() -> Self {
        Self {
            user_path: ConfigLoader::user_modes_path(),
            project_path: Some(ConfigLoader::project_modes_path()),
        }
    }
}

impl ModeLoader {
    /// Loader reading the standard user and project locations
    pub fn new() -> Self {
        Self::default()
    }

    /// Embedded modes only
    pub fn embedded_only() -> Self {
        Self {
            user_path: None,
            project_path: None,
        }
    }

    pub fn with_user_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_path = Some(path.into());
        self
    }

    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ModeCatalog, ModeLoadError> {
        let mut modes = embedded_modes();
        let mut layered = false;

        let layers = [
            (self.user_path.as_deref(), ModeSource::User),
            (self.project_path.as_deref(), ModeSource::Project),
        ];
        for (path, source) in layers {
            let Some(path) = path else { continue };
            let Some(text) = read_optional(path)? else {
                debug!("No mode file at {}", path.display());
                continue;
            };
            let file_modes = parse_modes(&text, path, source)?;
            info!("Loaded {} modes from {}", file_modes.len(), path.display());
            layered |= !file_modes.is_empty();
            merge_modes(&mut modes, file_modes);
        }

        let version = if layered {
            format!("{CATALOG_VERSION}+local")
        } else {
            CATALOG_VERSION.to_string()
        };
        Ok(ModeCatalog::new(modes, version)?)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ModeLoadError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ModeLoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse one mode file. Every entry must carry an id.
pub fn parse_modes(text: &str, path: &Path, source: ModeSource) -> Result<Vec<ReasoningMode>, ModeLoadError> {
    let file: ModeFile = toml::from_str(text).map_err(|e| ModeLoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    file.modes
        .into_iter()
        .enumerate()
        .map(|(index, mode)| mode.into_mode(path, index, source))
        .collect()
}

fn merge_modes(base: &mut Vec<ReasoningMode>, layer: Vec<ReasoningMode>) {
    for mode in layer {
        match base.iter_mut().find(|m| m.id == mode.id) {
            Some(existing) => *existing = mode,
            None => base.push(mode),
        }
    }
}
