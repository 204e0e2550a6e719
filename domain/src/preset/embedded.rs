//! Built-in ensemble presets.

use super::entities::{EnsemblePreset, ModeRef};
use super::registry::PresetRegistry;
use super::strategy::{SynthesisConfig, SynthesisStrategy};
use crate::budget::BudgetConfig;
use crate::core::error::DomainError;

fn refs(ids: &[&str]) -> Vec<ModeRef> {
    ids.iter().map(|id| ModeRef::from(*id)).collect()
}

/// The embedded preset list.
pub fn embedded_presets() -> Vec<EnsemblePreset> {
    vec![
        EnsemblePreset::new(
            "project-diagnosis",
            refs(&["root-cause", "systems-thinking", "failure-mode-analysis", "inductive"]),
        )
        .with_display_name("Project Diagnosis")
        .with_description("Find what is wrong with a project and why")
        .with_tags(&["analysis", "debugging"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Analytical)),
        EnsemblePreset::new(
            "idea-forge",
            refs(&["analogical", "first-principles", "counterfactual", "steelman"]),
        )
        .with_display_name("Idea Forge")
        .with_description("Generate and stress novel ideas from several angles")
        .with_tags(&["ideation", "creative"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Creative)),
        EnsemblePreset::new("bug-hunt", refs(&["abductive", "deductive", "root-cause"]))
            .with_display_name("Bug Hunt")
            .with_description("Narrow down the cause of a defect from symptoms")
            .with_tags(&["debugging"])
            .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Prioritized))
            .with_budget(BudgetConfig::new(4_000, 20_000)),
        EnsemblePreset::new(
            "root-cause-analysis",
            refs(&["root-cause", "causal-graph", "counterfactual", "abductive"]),
        )
        .with_display_name("Root Cause Analysis")
        .with_description("Trace an incident back through its causal chain")
        .with_tags(&["debugging", "incident"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Consensus))
        .with_allow_advanced(true)
        .with_budget(BudgetConfig::new(6_000, 30_000)),
        EnsemblePreset::new(
            "architecture-review",
            refs(&["systems-thinking", "api-design-review", "worst-case", "adversarial-review"]),
        )
        .with_display_name("Architecture Review")
        .with_description("Review a design for coupling, failure paths and interface quality")
        .with_tags(&["architecture", "review"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Analytical)),
        EnsemblePreset::new(
            "security-audit",
            refs(&["K1", "H3", "F3", "G3"]),
        )
        .with_display_name("Security Audit")
        .with_description("Threat-model and attack a system before someone else does")
        .with_tags(&["security", "review"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Adversarial)),
        EnsemblePreset::new(
            "decision-support",
            refs(&["decision-analysis", "cost-benefit", "probabilistic", "scenario-planning"]),
        )
        .with_display_name("Decision Support")
        .with_description("Weigh options under uncertainty and recommend one")
        .with_tags(&["decision"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Deliberative)),
        EnsemblePreset::new(
            "spec-critique",
            refs(&["deductive", "steelman", "dialectical", "meta-evaluation"]),
        )
        .with_display_name("Spec Critique")
        .with_description("Find gaps, contradictions and unstated assumptions in a specification")
        .with_tags(&["review", "writing"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::Dialectical)),
        EnsemblePreset::new(
            "strategic-planning",
            refs(&["scenario-planning", "game-theoretic", "systems-thinking", "belief-revision"]),
        )
        .with_display_name("Strategic Planning")
        .with_description("Plan under competition and shifting conditions")
        .with_tags(&["decision", "planning"])
        .with_synthesis(SynthesisConfig::with_strategy(SynthesisStrategy::MetaReasoning))
        .with_allow_advanced(true)
        .with_budget(BudgetConfig::new(6_000, 30_000)),
    ]
}

/// Registry holding only the embedded presets.
pub fn default_registry() -> Result<PresetRegistry, DomainError> {
    PresetRegistry::new(embedded_presets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModeTier, default_catalog};
    use crate::preset::entities::PresetSource;

    #[test]
    fn test_every_embedded_preset_resolves() {
        let catalog = default_catalog().unwrap();
        let registry = default_registry().unwrap();
        assert_eq!(registry.len(), 9);
        for preset in registry.list() {
            let resolved = preset.resolve(&catalog).unwrap();
            assert_eq!(resolved.mode_ids.len(), preset.modes.len(), "{}", preset.name);
            assert_eq!(preset.source, PresetSource::Embedded);
        }
    }

    #[test]
    fn test_advanced_modes_only_where_allowed() {
        let catalog = default_catalog().unwrap();
        for preset in embedded_presets() {
            let resolved = preset.resolve(&catalog).unwrap();
            let has_advanced = resolved
                .mode_ids
                .iter()
                .any(|id| catalog.get_mode(id).unwrap().tier == ModeTier::Advanced);
            if has_advanced {
                assert!(preset.allow_advanced, "{} needs allow_advanced", preset.name);
            }
        }
    }

    #[test]
    fn test_budgets_are_valid() {
        for preset in embedded_presets() {
            if let Some(budget) = preset.budget {
                assert!(budget.validate().is_empty(), "{}", preset.name);
            }
        }
    }
}
