//! CLI entrypoint for pane-ensemble
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use ensemble_application::{
    EnsembleProgressNotifier, EstimateRequest, EstimateUseCase, ExportPresetInput,
    ExportPresetUseCase, ImportPresetInput, ImportPresetUseCase, ModeSelection, NoProgress,
    PaneBinding, PresetCodec, PresetStorage, RunEnsembleInput, RunEnsembleUseCase, SharedRegistry,
};
use ensemble_domain::{ModeCategory, ModeTier, default_registry, split_comma_separated};
use ensemble_infrastructure::{
    ConfigLoader, FileConfig, FilePresetStorage, ModeLoader, TmuxPaneManager, TomlPresetCodec,
};
use ensemble_presentation::{
    Cli, Commands, ConsoleSynthesis, ProgressReporter, SelectionArgs, formatter_for,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting pane-ensemble");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let issues = config.validate();
    if !issues.is_empty() && !matches!(cli.command, Commands::Config) {
        for issue in &issues {
            eprintln!("{} {}", "Config error:".red().bold(), issue);
        }
        bail!("Invalid configuration ({} issues)", issues.len());
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let format = config.output.resolve_format(cli.output.map(Into::into));
    let formatter = formatter_for(format);

    // === Dependency Injection ===
    let loader = if cli.no_config {
        ModeLoader::embedded_only()
    } else {
        ModeLoader::new()
    };
    let catalog = loader.load().context("Failed to load reasoning modes")?;
    let registry = Arc::new(SharedRegistry::new(catalog, default_registry()?));

    let storage: Arc<dyn PresetStorage> = Arc::new(FilePresetStorage::new(
        ConfigLoader::imported_presets_path(),
    ));
    let codec: Arc<dyn PresetCodec> = Arc::new(TomlPresetCodec);
    let importer =
        ImportPresetUseCase::new(Arc::clone(&registry), Arc::clone(&storage), Arc::clone(&codec));
    match importer.load_persisted().await {
        Ok(0) => {}
        Ok(n) => info!("Loaded {} imported presets", n),
        Err(e) => warn!("Failed to load imported presets: {}", e),
    }

    match cli.command {
        Commands::Modes { tier, category } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let catalog = registry.catalog();
            let modes: Vec<_> = catalog
                .list_modes()
                .iter()
                .filter(|m| tier.is_none_or(|t| m.tier == ModeTier::from(t)))
                .filter(|m| category.is_none_or(|c| m.category == c))
                .collect();
            println!("{}", formatter.modes(&catalog, &modes));
        }

        Commands::Presets { tag, imported } => {
            let catalog = registry.catalog();
            let presets = registry.presets();
            let listed = if imported {
                presets.imported()
            } else {
                presets.list()
            };
            let listed: Vec<_> = listed
                .into_iter()
                .filter(|p| tag.as_deref().is_none_or(|t| p.has_tag(t)))
                .collect();
            println!("{}", formatter.presets(&catalog, &listed));
        }

        Commands::Estimate {
            selection,
            budget,
            question,
        } => {
            let mode_selection = require_selection(&selection, &config)?;
            let request = EstimateRequest::new(mode_selection, question)
                .with_budget_override(budget.overrides())
                .with_allow_advanced(selection.allow_advanced);
            let result = EstimateUseCase::new(Arc::clone(&registry))
                .with_default_budget(config.budget.to_budget())
                .with_allow_advanced(config.ensemble.allow_advanced)
                .execute(&request)?;
            println!("{}", formatter.estimate(&result));
        }

        Commands::Import {
            source,
            allow_remote,
            sha256,
            name,
            force,
        } => {
            let mut input = ImportPresetInput::new(source)
                .with_allow_remote(allow_remote || config.import.allow_remote)
                .with_force(force);
            if let Some(sha256) = sha256 {
                input = input.with_sha256(sha256);
            }
            if let Some(name) = name {
                input = input.with_rename(name);
            }
            let output = importer.execute(input).await?;
            println!("{}", formatter.imported(&output));
        }

        Commands::Export {
            preset,
            file,
            name,
            force,
        } => {
            let mut input = ExportPresetInput::new(preset, file).with_force(force);
            if let Some(name) = name {
                input = input.with_rename(name);
            }
            let output = ExportPresetUseCase::new(Arc::clone(&registry), storage, codec)
                .execute(input)
                .await?;
            println!("{}", formatter.exported(&output));
        }

        Commands::Run {
            selection,
            budget,
            session,
            agent,
            panes,
            strategy,
            yes,
            question,
        } => {
            let mode_selection = require_selection(&selection, &config)?;
            let mut input = RunEnsembleInput::new(mode_selection, question, session)
                .with_budget_override(budget.overrides())
                .with_allow_advanced(selection.allow_advanced);
            if let Some(strategy) = strategy {
                input = input.with_strategy(strategy);
            }
            if let Some(agent) = agent {
                input = input.with_agent_type(agent);
            }

            let pane_manager = Arc::new(
                TmuxPaneManager::new()
                    .with_session(config.tmux.session.clone())
                    .with_capture_lines(config.tmux.capture_lines),
            );
            let synthesis = Arc::new(ConsoleSynthesis::new());
            let progress: Arc<dyn EnsembleProgressNotifier> = if cli.quiet || format.is_json() {
                Arc::new(NoProgress)
            } else {
                Arc::new(ProgressReporter::new())
            };

            let use_case = RunEnsembleUseCase::new(
                Arc::clone(&registry),
                pane_manager,
                synthesis.clone(),
            )
            .with_params(config.to_orchestrator_params())
            .with_progress(progress);

            let prepared = use_case.prepare(&input)?;
            for warning in prepared.warnings() {
                eprintln!("{} {}", "Warning:".yellow().bold(), warning);
            }
            if prepared.has_budget_warning() && !yes {
                bail!("Estimated token usage exceeds the budget; pass --yes to run anyway");
            }

            let bindings = match panes.as_deref() {
                Some(list) => pane_bindings(list, &prepared.agent_type),
                None => use_case.default_bindings(&prepared),
            };
            let run = use_case.start(&prepared, bindings)?;

            let cancel = CancellationToken::new();
            tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                }
            });

            let snapshot = run.run(cancel).await;
            let rendered = synthesis.take_rendered();
            println!("{}", formatter.run_result(&snapshot, rendered.as_deref()));
        }

        Commands::Config => print_config(cli.config.as_ref(), &config)?,
    }

    Ok(())
}

/// Install the stderr subscriber and, with `--log-file`, a file writer.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file needs a file name: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn require_selection(args: &SelectionArgs, config: &FileConfig) -> Result<ModeSelection> {
    args.selection(config.ensemble.default_preset.as_deref())
        .context("No modes selected: pass --preset or --modes, or set ensemble.default_preset")
}

/// Category by name (`causal`) or code letter (`F`).
fn parse_category(s: &str) -> Result<ModeCategory> {
    let s = s.trim();
    let mut chars = s.chars();
    if let (Some(letter), None) = (chars.next(), chars.next())
        && let Some(category) = ModeCategory::from_letter(letter.to_ascii_uppercase())
    {
        return Ok(category);
    }
    ModeCategory::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s))
        .with_context(|| format!("Unknown mode category: {s}"))
}

/// One binding per listed pane name, all running `agent_type`.
fn pane_bindings(list: &str, agent_type: &str) -> Vec<PaneBinding> {
    split_comma_separated(list)
        .into_iter()
        .map(|pane| PaneBinding::new(agent_type, pane))
        .collect()
}

fn print_config(explicit: Option<&PathBuf>, config: &FileConfig) -> Result<()> {
    println!("{}", "Configuration sources".cyan().bold());
    for source in ConfigLoader::sources(explicit) {
        let state = if source.found {
            "found".green()
        } else {
            "missing".dimmed()
        };
        println!("  {:<9} {} ({})", source.label, source.path.display(), state);
    }
    if let Some(path) = ConfigLoader::imported_presets_path() {
        println!("  {:<9} {}", "Imported", path.display());
    }

    println!("\n{}", "Effective configuration".cyan().bold());
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to render configuration")?
    );

    let issues = config.validate();
    if issues.is_empty() {
        println!("{}", "Configuration is valid".green());
    } else {
        for issue in &issues {
            println!("{} {}", "x".red(), issue);
        }
        bail!("Invalid configuration ({} issues)", issues.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_by_letter_and_name() {
        assert_eq!(parse_category("f").unwrap(), ModeCategory::Causal);
        assert_eq!(parse_category("Causal").unwrap(), ModeCategory::Causal);
        assert_eq!(parse_category(" meta ").unwrap(), ModeCategory::Meta);
        assert!(parse_category("Z").is_err());
        assert!(parse_category("nonsense").is_err());
    }

    #[test]
    fn test_pane_bindings_from_list() {
        let bindings = pane_bindings("left, right,,left", "codex");
        assert_eq!(
            bindings,
            vec![
                PaneBinding::new("codex", "left"),
                PaneBinding::new("codex", "right"),
            ]
        );
    }

    #[test]
    fn test_require_selection_uses_default_preset() {
        let mut config = FileConfig::default();
        assert!(require_selection(&SelectionArgs::default(), &config).is_err());
        config.ensemble.default_preset = Some("bug-hunt".to_string());
        assert_eq!(
            require_selection(&SelectionArgs::default(), &config).unwrap(),
            ModeSelection::Preset("bug-hunt".to_string())
        );
    }
}
