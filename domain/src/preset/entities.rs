//! Preset entities: mode references and ensemble presets.

use super::strategy::SynthesisConfig;
use crate::budget::BudgetConfig;
use crate::catalog::{ModeCatalog, looks_like_code};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Reference to a catalog mode, by id or by short code.
///
/// Serialized as a plain string. Strings shaped like a code (`A1`, `K12`)
/// deserialize as [`ModeRef::Code`], everything else as [`ModeRef::Id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModeRef {
    Id(String),
    Code(String),
}

impl ModeRef {
    pub fn id(id: impl Into<String>) -> Self {
        ModeRef::Id(id.into())
    }

    pub fn code(code: impl Into<String>) -> Self {
        ModeRef::Code(code.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModeRef::Id(s) | ModeRef::Code(s) => s,
        }
    }

    /// Canonical mode id this reference points to in `catalog`.
    pub fn resolve<'a>(&self, catalog: &'a ModeCatalog) -> Option<&'a str> {
        let mode = match self {
            ModeRef::Id(id) => catalog.get_mode(id),
            ModeRef::Code(code) => catalog.get_mode_by_code(code),
        };
        mode.map(|m| m.id.as_str())
    }
}

impl From<String> for ModeRef {
    fn from(s: String) -> Self {
        if looks_like_code(&s) {
            ModeRef::Code(s)
        } else {
            ModeRef::Id(s)
        }
    }
}

impl From<&str> for ModeRef {
    fn from(s: &str) -> Self {
        ModeRef::from(s.to_string())
    }
}

impl From<ModeRef> for String {
    fn from(r: ModeRef) -> Self {
        match r {
            ModeRef::Id(s) | ModeRef::Code(s) => s,
        }
    }
}

impl std::fmt::Display for ModeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a preset was registered from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetSource {
    #[default]
    Embedded,
    Imported,
}

impl PresetSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetSource::Embedded => "embedded",
            PresetSource::Imported => "imported",
        }
    }
}

impl std::fmt::Display for PresetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, reusable ensemble: ordered mode references plus defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsemblePreset {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub modes: Vec<ModeRef>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// `None` defers to the configured default budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetConfig>,
    #[serde(default)]
    pub allow_advanced: bool,
    #[serde(default)]
    pub source: PresetSource,
}

impl EnsemblePreset {
    pub fn new(name: impl Into<String>, modes: Vec<ModeRef>) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            description: String::new(),
            modes,
            tags: Vec::new(),
            synthesis: SynthesisConfig::default(),
            budget: None,
            allow_advanced: false,
            source: PresetSource::Embedded,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisConfig) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_allow_advanced(mut self, allow: bool) -> Self {
        self.allow_advanced = allow;
        self
    }

    pub fn with_source(mut self, source: PresetSource) -> Self {
        self.source = source;
        self
    }

    // ==================== Queries ====================

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Display name, falling back to the preset name.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// Dereference every mode reference against `catalog`.
    ///
    /// Resolution happens against whatever catalog is active at call time,
    /// so presets and catalogs can be registered independently.
    pub fn resolve(&self, catalog: &ModeCatalog) -> Result<ResolvedPreset, DomainError> {
        if self.modes.is_empty() {
            return Err(DomainError::EmptyEnsemble);
        }
        let mut mode_ids: Vec<String> = Vec::with_capacity(self.modes.len());
        for reference in &self.modes {
            let id = reference
                .resolve(catalog)
                .ok_or_else(|| DomainError::UnresolvedModeRef {
                    preset: self.name.clone(),
                    reference: reference.to_string(),
                })?;
            if !mode_ids.iter().any(|seen| seen == id) {
                mode_ids.push(id.to_string());
            }
        }
        Ok(ResolvedPreset {
            preset: self.clone(),
            mode_ids,
        })
    }
}

/// A preset whose references have been dereferenced to concrete mode ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPreset {
    pub preset: EnsemblePreset,
    pub mode_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModeCategory, ModeTier, ReasoningMode};

    fn catalog() -> ModeCatalog {
        ModeCatalog::new(
            vec![
                ReasoningMode::new("deductive", "A1", "Deductive", ModeCategory::Formal, ModeTier::Core),
                ReasoningMode::new("worst-case", "G3", "Worst Case", ModeCategory::Practical, ModeTier::Core),
            ],
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_mode_ref_from_string_detects_codes() {
        assert_eq!(ModeRef::from("A1"), ModeRef::Code("A1".to_string()));
        assert_eq!(ModeRef::from("deductive"), ModeRef::Id("deductive".to_string()));
    }

    #[test]
    fn test_mode_ref_serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![ModeRef::code("A1"), ModeRef::id("worst-case")]).unwrap();
        assert_eq!(json, r#"["A1","worst-case"]"#);
        let back: Vec<ModeRef> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], ModeRef::code("A1"));
    }

    #[test]
    fn test_resolve_mixed_refs() {
        let preset = EnsemblePreset::new(
            "p",
            vec![ModeRef::code("G3"), ModeRef::id("deductive"), ModeRef::code("A1")],
        );
        let resolved = preset.resolve(&catalog()).unwrap();
        assert_eq!(resolved.mode_ids, vec!["worst-case", "deductive"]);
    }

    #[test]
    fn test_resolve_unknown_ref_fails() {
        let preset = EnsemblePreset::new("p", vec![ModeRef::id("nope")]);
        let err = preset.resolve(&catalog()).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnresolvedModeRef {
                preset: "p".to_string(),
                reference: "nope".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_empty_preset_fails() {
        let preset = EnsemblePreset::new("p", vec![]);
        assert_eq!(preset.resolve(&catalog()).unwrap_err(), DomainError::EmptyEnsemble);
    }

    #[test]
    fn test_label_and_tags() {
        let preset = EnsemblePreset::new("bug-hunt", vec![ModeRef::code("A1")])
            .with_display_name("Bug Hunt")
            .with_tags(&["Debugging"]);
        assert_eq!(preset.label(), "Bug Hunt");
        assert!(preset.has_tag("debugging"));
        assert_eq!(EnsemblePreset::new("x", vec![]).label(), "x");
    }
}
