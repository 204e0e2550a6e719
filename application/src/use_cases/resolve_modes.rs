//! Resolve a preset name or an explicit mode list into runnable mode ids.

use crate::registry::SharedRegistry;
use ensemble_domain::{BudgetConfig, DomainError, SynthesisConfig};
use std::sync::Arc;
use tracing::debug;

/// What the caller asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSelection {
    /// A registered preset, by name
    Preset(String),
    /// Mode ids and/or codes, in order
    Explicit(Vec<String>),
}

impl ModeSelection {
    pub fn label(&self) -> String {
        match self {
            ModeSelection::Preset(name) => format!("preset {name}"),
            ModeSelection::Explicit(ids) => format!("modes {}", ids.join(",")),
        }
    }
}

/// A selection with preset defaults attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub preset: Option<String>,
    /// Canonical ids for presets; the raw request for explicit lists, so the
    /// estimator can report unknown entries as warnings
    pub mode_ids: Vec<String>,
    pub synthesis: SynthesisConfig,
    /// Budget carried by the preset, if any
    pub budget: Option<BudgetConfig>,
    pub allow_advanced: bool,
}

pub struct ResolveModesUseCase {
    registry: Arc<SharedRegistry>,
}

impl ResolveModesUseCase {
    pub fn new(registry: Arc<SharedRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(&self, selection: &ModeSelection) -> Result<ResolvedSelection, DomainError> {
        match selection {
            ModeSelection::Preset(name) => {
                let catalog = self.registry.catalog();
                let resolved = self.registry.presets().resolve(name, &catalog)?;
                debug!(
                    "Preset {} resolved to {} modes",
                    name,
                    resolved.mode_ids.len()
                );
                Ok(ResolvedSelection {
                    preset: Some(name.clone()),
                    mode_ids: resolved.mode_ids,
                    synthesis: resolved.preset.synthesis,
                    budget: resolved.preset.budget,
                    allow_advanced: resolved.preset.allow_advanced,
                })
            }
            ModeSelection::Explicit(ids) => {
                if ids.is_empty() {
                    return Err(DomainError::EmptyEnsemble);
                }
                Ok(ResolvedSelection {
                    preset: None,
                    mode_ids: ids.clone(),
                    synthesis: SynthesisConfig::default(),
                    budget: None,
                    allow_advanced: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{SynthesisStrategy, default_catalog, default_registry};

    fn use_case() -> ResolveModesUseCase {
        ResolveModesUseCase::new(Arc::new(SharedRegistry::new(
            default_catalog().unwrap(),
            default_registry().unwrap(),
        )))
    }

    #[test]
    fn test_preset_carries_defaults() {
        let resolved = use_case()
            .execute(&ModeSelection::Preset("security-audit".to_string()))
            .unwrap();
        assert_eq!(resolved.mode_ids[0], "security-threat-model");
        assert_eq!(resolved.synthesis.strategy, SynthesisStrategy::Adversarial);
        assert_eq!(resolved.budget, None);

        let resolved = use_case()
            .execute(&ModeSelection::Preset("bug-hunt".to_string()))
            .unwrap();
        assert!(resolved.budget.is_some());
    }

    #[test]
    fn test_unknown_preset() {
        let err = use_case()
            .execute(&ModeSelection::Preset("nope".to_string()))
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownPreset("nope".to_string()));
    }

    #[test]
    fn test_explicit_passes_through() {
        let ids = vec!["A1".to_string(), "unknown".to_string()];
        let resolved = use_case()
            .execute(&ModeSelection::Explicit(ids.clone()))
            .unwrap();
        assert_eq!(resolved.mode_ids, ids);
        assert!(resolved.preset.is_none());
    }

    #[test]
    fn test_explicit_empty_rejected() {
        let err = use_case()
            .execute(&ModeSelection::Explicit(vec![]))
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyEnsemble);
    }
}
