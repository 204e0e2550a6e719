//! Serialized preset document
//!
//! The on-disk shape of a preset. Exports expand mode references to concrete
//! mode ids so the document stays meaningful if the code assignments of a
//! catalog change between revisions.

use super::entities::{EnsemblePreset, ModeRef, PresetSource, ResolvedPreset};
use super::strategy::SynthesisConfig;
use crate::budget::BudgetConfig;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Highest document schema version this build understands.
pub const PRESET_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    PRESET_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub modes: Vec<String>,
    #[serde(default)]
    pub allow_advanced: bool,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetConfig>,
}

impl PresetDocument {
    /// Build a document from a resolved preset, with concrete mode ids.
    pub fn from_resolved(resolved: &ResolvedPreset) -> Self {
        let preset = &resolved.preset;
        Self {
            schema_version: PRESET_SCHEMA_VERSION,
            name: preset.name.clone(),
            display_name: preset.display_name.clone(),
            description: preset.description.clone(),
            tags: preset.tags.clone(),
            modes: resolved.mode_ids.clone(),
            allow_advanced: preset.allow_advanced,
            synthesis: preset.synthesis.clone(),
            budget: preset.budget,
        }
    }

    /// Build a document from a preset, keeping its references as written.
    pub fn from_preset(preset: &EnsemblePreset) -> Self {
        Self {
            schema_version: PRESET_SCHEMA_VERSION,
            name: preset.name.clone(),
            display_name: preset.display_name.clone(),
            description: preset.description.clone(),
            tags: preset.tags.clone(),
            modes: preset.modes.iter().map(|m| m.to_string()).collect(),
            allow_advanced: preset.allow_advanced,
            synthesis: preset.synthesis.clone(),
            budget: preset.budget,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.schema_version > PRESET_SCHEMA_VERSION {
            return Err(DomainError::UnsupportedSchema {
                found: self.schema_version,
                supported: PRESET_SCHEMA_VERSION,
            });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidPreset("missing name".to_string()));
        }
        if self.modes.is_empty() {
            return Err(DomainError::EmptyEnsemble);
        }
        Ok(())
    }

    /// Convert into a preset tagged with `source`.
    pub fn into_preset(self, source: PresetSource) -> Result<EnsemblePreset, DomainError> {
        self.validate()?;
        Ok(EnsemblePreset {
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            modes: self.modes.into_iter().map(ModeRef::from).collect(),
            tags: self.tags,
            synthesis: self.synthesis,
            budget: self.budget,
            allow_advanced: self.allow_advanced,
            source,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
