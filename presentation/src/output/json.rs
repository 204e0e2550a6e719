//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use ensemble_application::{EstimateResult, ExportPresetOutput, ImportPresetOutput};
use ensemble_domain::{EnsemblePreset, ModeCatalog, ReasoningMode, SessionSnapshot};
use serde::Serialize;
use serde_json::{Value, json};

/// Formats results as pretty-printed JSON
pub struct JsonFormatter;

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

impl OutputFormatter for JsonFormatter {
    fn modes(&self, catalog: &ModeCatalog, modes: &[&ReasoningMode]) -> String {
        pretty(&json!({
            "catalog_version": catalog.version(),
            "count": modes.len(),
            "modes": modes,
        }))
    }

    fn presets(&self, catalog: &ModeCatalog, presets: &[&EnsemblePreset]) -> String {
        let entries: Vec<Value> = presets
            .iter()
            .map(|preset| {
                let (mode_ids, error) = match preset.resolve(catalog) {
                    Ok(resolved) => (resolved.mode_ids, None),
                    Err(e) => (Vec::new(), Some(e.to_string())),
                };
                json!({
                    "preset": preset,
                    "mode_ids": mode_ids,
                    "error": error,
                })
            })
            .collect();
        pretty(&entries)
    }

    fn estimate(&self, result: &EstimateResult) -> String {
        pretty(&json!({
            "preset": result.selection.preset,
            "synthesis": result.selection.synthesis.strategy,
            "estimate": result.output,
            "over_budget": result.output.has_budget_warning(),
        }))
    }

    fn snapshot(&self, snapshot: &SessionSnapshot) -> String {
        pretty(snapshot)
    }

    fn run_result(&self, snapshot: &SessionSnapshot, synthesis: Option<&str>) -> String {
        pretty(&json!({
            "session": snapshot,
            "synthesis_prompt": synthesis,
        }))
    }

    fn imported(&self, output: &ImportPresetOutput) -> String {
        pretty(&json!({
            "name": output.name,
            "mode_ids": output.mode_ids,
            "replaced": output.replaced,
            "sha256": output.sha256,
        }))
    }

    fn exported(&self, output: &ExportPresetOutput) -> String {
        pretty(&json!({
            "name": output.name,
            "path": output.path,
            "mode_ids": output.mode_ids,
            "sha256": output.sha256,
        }))
    }
}
