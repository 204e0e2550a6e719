//! `[output]` section: how listings and run results are rendered

use ensemble_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Format used when `--output` is not given
    pub format: Option<OutputFormat>,
    /// Colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// A command-line choice wins over the file; text otherwise.
    pub fn resolve_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    #[test]
    fn test_json_from_file() {
        let config: FileConfig = toml::from_str("[output]\nformat = \"json\"\ncolor = false\n").unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(config.output.resolve_format(None), OutputFormat::Json);
    }

    #[test]
    fn test_requested_format_wins() {
        let output = FileOutputConfig {
            format: Some(OutputFormat::Json),
            color: true,
        };
        assert_eq!(
            output.resolve_format(Some(OutputFormat::Text)),
            OutputFormat::Text
        );
        assert_eq!(FileOutputConfig::default().resolve_format(None), OutputFormat::Text);
    }
}
