//! Output formatter trait

use super::console::ConsoleFormatter;
use super::json::JsonFormatter;
use ensemble_application::{EstimateResult, ExportPresetOutput, ImportPresetOutput};
use ensemble_domain::{EnsemblePreset, ModeCatalog, OutputFormat, ReasoningMode, SessionSnapshot};

/// Trait for rendering command results
pub trait OutputFormatter {
    /// Mode listing
    fn modes(&self, catalog: &ModeCatalog, modes: &[&ReasoningMode]) -> String;

    /// Preset listing; presets that no longer resolve are flagged
    fn presets(&self, catalog: &ModeCatalog, presets: &[&EnsemblePreset]) -> String;

    /// Budget estimate with warnings
    fn estimate(&self, result: &EstimateResult) -> String;

    /// Session state (final or intermediate)
    fn snapshot(&self, snapshot: &SessionSnapshot) -> String;

    /// Final snapshot plus the rendered synthesis prompt, if any
    fn run_result(&self, snapshot: &SessionSnapshot, synthesis: Option<&str>) -> String;

    fn imported(&self, output: &ImportPresetOutput) -> String;

    fn exported(&self, output: &ExportPresetOutput) -> String;
}

/// Formatter for the requested output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
