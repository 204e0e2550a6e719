//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use ensemble_application::{EstimateResult, ExportPresetOutput, ImportPresetOutput};
use ensemble_domain::{
    AssignmentStatus, EnsemblePreset, ModeCatalog, ModeTier, PresetSource, ReasoningMode,
    SessionSnapshot, truncate_str,
};

const DESC_WIDTH: usize = 60;

/// Formats results as human-readable tables
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn ellipsize(text: &str) -> String {
        let cut = truncate_str(text, DESC_WIDTH);
        if cut.len() < text.len() {
            format!("{}...", cut.trim_end())
        } else {
            cut.to_string()
        }
    }

    fn status_label(status: AssignmentStatus) -> String {
        let text = format!("{} {:<9}", status.icon(), status.as_str());
        match status {
            AssignmentStatus::Done => text.green().to_string(),
            AssignmentStatus::Error => text.red().to_string(),
            AssignmentStatus::Active | AssignmentStatus::Injecting => text.yellow().to_string(),
            AssignmentStatus::Pending => text.dimmed().to_string(),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn modes(&self, catalog: &ModeCatalog, modes: &[&ReasoningMode]) -> String {
        let mut output = Self::header(&format!("Reasoning Modes ({})", catalog.version()));

        let mut category = None;
        for mode in modes {
            if category != Some(mode.category) {
                category = Some(mode.category);
                output.push_str(&Self::section_header(&format!(
                    "{} {}",
                    mode.category.letter(),
                    mode.category
                )));
            }
            let tier = match mode.tier {
                ModeTier::Core => "core".green(),
                ModeTier::Advanced => "advanced".yellow(),
            };
            output.push_str(&format!(
                "  {:<4} {:<24} {:<9} {}\n",
                mode.code.bold(),
                mode.id,
                tier,
                Self::ellipsize(&mode.short_desc).dimmed()
            ));
        }

        output.push_str(&format!(
            "\n{} modes shown ({} in catalog)\n",
            modes.len(),
            catalog.count()
        ));
        output
    }

    fn presets(&self, catalog: &ModeCatalog, presets: &[&EnsemblePreset]) -> String {
        let mut output = Self::header("Presets");
        if presets.is_empty() {
            output.push_str("\n  (no presets match)\n");
            return output;
        }

        for preset in presets {
            let source = match preset.source {
                PresetSource::Embedded => String::new(),
                PresetSource::Imported => format!(" {}", "[imported]".magenta()),
            };
            output.push_str(&format!(
                "\n{}{} {}\n",
                preset.name.yellow().bold(),
                source,
                format!("({})", preset.synthesis.strategy).dimmed()
            ));
            if !preset.description.is_empty() {
                output.push_str(&format!("  {}\n", Self::ellipsize(&preset.description)));
            }
            match preset.resolve(catalog) {
                Ok(resolved) => {
                    let codes: Vec<&str> = resolved
                        .mode_ids
                        .iter()
                        .filter_map(|id| catalog.get_mode(id))
                        .map(|m| m.code.as_str())
                        .collect();
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Modes:".cyan(),
                        codes.join(", ")
                    ));
                }
                Err(e) => {
                    output.push_str(&format!("  {} {}\n", "Unresolved:".red().bold(), e));
                }
            }
            if !preset.tags.is_empty() {
                output.push_str(&format!(
                    "  {} {}\n",
                    "Tags:".cyan(),
                    preset.tags.join(", ")
                ));
            }
        }
        output
    }

    fn estimate(&self, result: &EstimateResult) -> String {
        let estimate = &result.output;
        let mut output = Self::header("Token Estimate");

        if let Some(preset) = &result.selection.preset {
            output.push_str(&format!("{} {}\n", "Preset:".cyan().bold(), preset));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Synthesis:".cyan().bold(),
            result.selection.synthesis.strategy
        ));

        output.push_str(&Self::section_header("Modes"));
        for mode in &estimate.modes {
            let over = mode.token_estimate > estimate.budget.max_tokens_per_mode;
            let tokens = format!("~{:>6} tokens", mode.token_estimate);
            output.push_str(&format!(
                "  {:<4} {:<28} {}\n",
                mode.code.bold(),
                mode.name,
                if over { tokens.red() } else { tokens.normal() }
            ));
        }
        if !estimate.skipped.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Skipped:".dimmed(),
                estimate.skipped.join(", ")
            ));
        }

        let total = format!(
            "~{} / {} tokens",
            estimate.total_tokens, estimate.budget.max_total_tokens
        );
        output.push_str(&format!(
            "\n{} {}\n",
            "Total:".cyan().bold(),
            if estimate.total_tokens > estimate.budget.max_total_tokens {
                total.red().bold()
            } else {
                total.green()
            }
        ));

        if !estimate.warnings.is_empty() {
            output.push_str(&Self::section_header("Warnings"));
            for warning in &estimate.warnings {
                output.push_str(&format!("  {} {}\n", "!".yellow().bold(), warning));
            }
        }
        output
    }

    fn snapshot(&self, snapshot: &SessionSnapshot) -> String {
        let mut output = Self::header(&format!("Ensemble {}", snapshot.session_name));
        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            snapshot.question
        ));
        output.push_str(&format!(
            "{} {} | {} {:.0}%\n",
            "Synthesis:".cyan().bold(),
            snapshot.synthesis_strategy,
            "Progress:".cyan().bold(),
            snapshot.progress * 100.0
        ));

        output.push_str(&Self::section_header("Assignments"));
        for a in &snapshot.assignments {
            output.push_str(&format!(
                "  {} {:<4} {:<26} {}",
                Self::status_label(a.status),
                a.code.bold(),
                a.display_name,
                a.pane_name.dimmed()
            ));
            if let Some(reason) = &a.reason {
                output.push_str(&format!(" {}", format!("({reason})").red()));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{} done, {} failed, {} running\n",
            snapshot.count(AssignmentStatus::Done).to_string().green(),
            snapshot.count(AssignmentStatus::Error).to_string().red(),
            snapshot
                .assignments
                .iter()
                .filter(|a| !a.status.is_terminal())
                .count()
        ));
        output
    }

    fn run_result(&self, snapshot: &SessionSnapshot, synthesis: Option<&str>) -> String {
        let mut output = self.snapshot(snapshot);
        if let Some(prompt) = synthesis {
            output.push_str(&Self::section_header("Synthesis Prompt"));
            output.push_str(prompt);
            output.push('\n');
        }
        output
    }

    fn imported(&self, output: &ImportPresetOutput) -> String {
        let verb = if output.replaced { "Replaced" } else { "Imported" };
        format!(
            "{} preset {} ({} modes)\n  {} {}\n",
            verb.green().bold(),
            output.name.yellow(),
            output.mode_ids.len(),
            "sha256:".dimmed(),
            output.sha256
        )
    }

    fn exported(&self, output: &ExportPresetOutput) -> String {
        format!(
            "{} preset {} to {}\n  {} {}\n  {} {}\n",
            "Exported".green().bold(),
            output.name.yellow(),
            output.path.display(),
            "modes:".dimmed(),
            output.mode_ids.join(", "),
            "sha256:".dimmed(),
            output.sha256
        )
    }
}
