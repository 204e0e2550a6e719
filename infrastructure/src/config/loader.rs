//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pane-ensemble";
const PROJECT_FILES: [&str; 2] = ["ensemble.toml", ".ensemble.toml"];

/// Where a configuration layer comes from and whether it is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub path: PathBuf,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ENSEMBLE_*` environment variables (`ENSEMBLE_BUDGET__MAX_TOTAL_TOKENS`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./ensemble.toml` or `./.ensemble.toml`
    /// 4. Global: `<config dir>/pane-ensemble/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed("ENSEMBLE_").split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// File layers only, lowest priority first. Missing files are skipped.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }
        // An explicit path must exist; figment reports it otherwise
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }
        figment
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `<config dir>/pane-ensemble`
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// User mode definitions layered over the embedded catalog
    pub fn user_modes_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("modes.toml"))
    }

    /// Project mode definitions, relative to the working directory
    pub fn project_modes_path() -> PathBuf {
        PathBuf::from(".ensemble").join("modes.toml")
    }

    /// File holding every imported preset
    pub fn imported_presets_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("presets.imported.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Every location consulted, in priority order
    pub fn sources(explicit: Option<&PathBuf>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();
        if let Some(path) = explicit {
            sources.push(ConfigSource {
                label: "Explicit",
                path: path.clone(),
                found: path.exists(),
            });
        }
        let project = Self::project_config_path()
            .unwrap_or_else(|| PathBuf::from(PROJECT_FILES[0]));
        sources.push(ConfigSource {
            label: "Project",
            found: project.exists(),
            path: project,
        });
        if let Some(path) = Self::global_config_path() {
            sources.push(ConfigSource {
                label: "Global",
                found: path.exists(),
                path,
            });
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.ensemble.agent_type, "claude");
        assert!(!config.import.allow_remote);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("pane-ensemble"));
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(
            &global,
            "[budget]\nmax_tokens_per_mode = 1000\nmax_total_tokens = 9000\n[tmux]\nsession = \"g\"\n",
        )
        .unwrap();
        fs::write(&project, "[budget]\nmax_tokens_per_mode = 2000\n").unwrap();
        fs::write(&explicit, "[tmux]\nsession = \"x\"\n").unwrap();

        let config: FileConfig =
            ConfigLoader::figment(Some(&global), Some(&project), Some(&explicit))
                .extract()
                .unwrap();
        assert_eq!(config.budget.max_tokens_per_mode, 2000);
        assert_eq!(config.budget.max_total_tokens, 9000);
        assert_eq!(config.tmux.session.as_deref(), Some("x"));
    }

    #[test]
    fn test_missing_layers_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let config: FileConfig = ConfigLoader::figment(Some(&missing), None, None)
            .extract()
            .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, None, Some(&missing)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[budget]\nmax_total_tokens = \"lots\"\n").unwrap();
        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, Some(&bad), None).extract();
        assert!(result.is_err());
    }
}
