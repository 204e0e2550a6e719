//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use ensemble_application::ModeSelection;
use ensemble_domain::{BudgetConfig, ModeTier, SynthesisStrategy, split_comma_separated};
use std::path::PathBuf;

/// Output format for listings, estimates and run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for ensemble_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ensemble_domain::OutputFormat::Text,
            OutputFormat::Json => ensemble_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for pane-ensemble
#[derive(Parser, Debug)]
#[command(name = "pane-ensemble")]
#[command(author, version, about = "Run one question through several reasoning modes, one agent pane each")]
#[command(long_about = r#"
pane-ensemble sends one question to several coding agents running in tmux
panes. Each agent answers from a different reasoning mode (deductive,
root-cause, adversarial review, ...). The run watches every pane, records
which agents finished or failed, and hands the collected answers to a
synthesis step once all are done.

Configuration files are loaded from (in priority order):
1. --config <path>                           Explicit config file
2. ./ensemble.toml                           Project-level config
3. ~/.config/pane-ensemble/config.toml       Global config

Example:
  pane-ensemble presets
  pane-ensemble estimate -p bug-hunt "Why does the cache miss after deploys?"
  pane-ensemble run -m A1,F1,H3 --session api "Is the retry logic safe?"
  pane-ensemble import https://example.com/review.toml --allow-remote --sha256 <hex>
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List reasoning modes
    Modes {
        /// Only modes of this tier
        #[arg(long, value_enum)]
        tier: Option<TierArg>,

        /// Only modes of this category (name or code letter)
        #[arg(long)]
        category: Option<String>,
    },

    /// List presets
    Presets {
        /// Only presets carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only imported presets
        #[arg(long)]
        imported: bool,
    },

    /// Estimate token usage of an ensemble without running it
    Estimate {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Question the ensemble would answer
        question: String,
    },

    /// Import a preset from a file or URL
    Import {
        /// Local path or http(s) URL
        source: String,

        /// Permit http(s) sources
        #[arg(long)]
        allow_remote: bool,

        /// Expected SHA-256 of the document (hex, optionally `sha256:` prefixed)
        #[arg(long, value_name = "HEX")]
        sha256: Option<String>,

        /// Register under this name instead of the document's
        #[arg(long)]
        name: Option<String>,

        /// Replace a built-in preset of the same name
        #[arg(long)]
        force: bool,
    },

    /// Export a preset with concrete mode ids
    Export {
        /// Preset to export
        preset: String,

        /// Destination file
        #[arg(short = 'f', long = "file", value_name = "PATH")]
        file: PathBuf,

        /// Name written into the document
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run an ensemble across agent panes
    Run {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Session name used for default pane names
        #[arg(short, long, default_value = "ensemble")]
        session: String,

        /// Agent type used for default pane names
        #[arg(long)]
        agent: Option<String>,

        /// Explicit pane names, in mode order (comma-separated)
        #[arg(long, value_name = "NAMES")]
        panes: Option<String>,

        /// Synthesis strategy overriding the preset's
        #[arg(long, value_parser = parse_strategy)]
        strategy: Option<SynthesisStrategy>,

        /// Start even when the estimate exceeds the budget
        #[arg(short, long)]
        yes: bool,

        /// Question to send to every agent
        question: String,
    },

    /// Show configuration sources and validate the effective config
    Config,
}

/// Which modes to run: a preset or an explicit list
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Preset name
    #[arg(short, long, conflicts_with = "modes")]
    pub preset: Option<String>,

    /// Mode ids or codes (comma-separated, e.g. `A1,root-cause`)
    #[arg(short, long, value_name = "MODES")]
    pub modes: Option<String>,

    /// Include advanced-tier modes
    #[arg(long)]
    pub allow_advanced: bool,
}

impl SelectionArgs {
    /// The chosen selection, falling back to `default_preset`.
    pub fn selection(&self, default_preset: Option<&str>) -> Option<ModeSelection> {
        if let Some(modes) = &self.modes {
            return Some(ModeSelection::Explicit(split_comma_separated(modes)));
        }
        self.preset
            .as_deref()
            .or(default_preset)
            .map(|name| ModeSelection::Preset(name.to_string()))
    }
}

/// Per-command budget overrides
#[derive(Args, Debug, Clone, Default)]
pub struct BudgetArgs {
    /// Token ceiling for any single mode
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens_per_mode: Option<u64>,

    /// Token ceiling for the whole ensemble
    #[arg(long, value_name = "TOKENS")]
    pub max_total_tokens: Option<u64>,
}

impl BudgetArgs {
    /// Overrides as a budget where 0 means "not set"
    pub fn overrides(&self) -> BudgetConfig {
        BudgetConfig::new(
            self.max_tokens_per_mode.unwrap_or(0),
            self.max_total_tokens.unwrap_or(0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Core,
    Advanced,
}

impl From<TierArg> for ModeTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Core => ModeTier::Core,
            TierArg::Advanced => ModeTier::Advanced,
        }
    }
}

fn parse_strategy(s: &str) -> Result<SynthesisStrategy, String> {
    s.parse().map_err(|e: ensemble_domain::DomainError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "pane-ensemble",
            "run",
            "-m",
            "A1, F1,A1",
            "--max-total-tokens",
            "9000",
            "--strategy",
            "voting",
            "Why?",
        ])
        .unwrap();
        let Commands::Run {
            selection,
            budget,
            strategy,
            session,
            question,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(
            selection.selection(None),
            Some(ModeSelection::Explicit(vec!["A1".to_string(), "F1".to_string()]))
        );
        assert_eq!(budget.overrides(), BudgetConfig::new(0, 9000));
        assert_eq!(strategy, Some(SynthesisStrategy::Voting));
        assert_eq!(session, "ensemble");
        assert_eq!(question, "Why?");
    }

    #[test]
    fn test_deprecated_strategy_rejected() {
        let err = Cli::try_parse_from(["pane-ensemble", "run", "--strategy", "debate", "-p", "x", "q"])
            .unwrap_err();
        assert!(err.to_string().contains("dialectical"));
    }

    #[test]
    fn test_preset_and_modes_conflict() {
        assert!(
            Cli::try_parse_from(["pane-ensemble", "estimate", "-p", "bug-hunt", "-m", "A1", "q"])
                .is_err()
        );
    }

    #[test]
    fn test_default_preset_fallback() {
        let args = SelectionArgs::default();
        assert_eq!(args.selection(None), None);
        assert_eq!(
            args.selection(Some("bug-hunt")),
            Some(ModeSelection::Preset("bug-hunt".to_string()))
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pane-ensemble", "presets", "--imported", "-o", "json", "-vv"])
            .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Presets { imported: true, .. }));
    }
}
