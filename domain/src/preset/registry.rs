//! Preset registry
//!
//! An immutable set of [`EnsemblePreset`]s keyed by name. Mutation happens by
//! building a new registry ([`PresetRegistry::with_preset`]) and swapping it in,
//! so a reader never sees a half-applied import.

use super::entities::{EnsemblePreset, PresetSource, ResolvedPreset};
use crate::catalog::ModeCatalog;
use crate::core::error::DomainError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetRegistry {
    presets: BTreeMap<String, EnsemblePreset>,
}

impl PresetRegistry {
    /// Build a registry, rejecting duplicate names.
    pub fn new(presets: Vec<EnsemblePreset>) -> Result<Self, DomainError> {
        let mut map = BTreeMap::new();
        for preset in presets {
            if map.contains_key(&preset.name) {
                return Err(DomainError::DuplicatePreset(preset.name));
            }
            map.insert(preset.name.clone(), preset);
        }
        Ok(Self { presets: map })
    }

    pub fn get(&self, name: &str) -> Option<&EnsemblePreset> {
        self.presets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// All presets sorted by name.
    pub fn list(&self) -> Vec<&EnsemblePreset> {
        self.presets.values().collect()
    }

    pub fn with_tag(&self, tag: &str) -> Vec<&EnsemblePreset> {
        self.presets.values().filter(|p| p.has_tag(tag)).collect()
    }

    pub fn imported(&self) -> Vec<&EnsemblePreset> {
        self.presets
            .values()
            .filter(|p| p.source == PresetSource::Imported)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Look up `name` and dereference its modes against `catalog`.
    pub fn resolve(&self, name: &str, catalog: &ModeCatalog) -> Result<ResolvedPreset, DomainError> {
        self.get(name)
            .ok_or_else(|| DomainError::UnknownPreset(name.to_string()))?
            .resolve(catalog)
    }

    /// A copy of this registry with `preset` inserted, replacing any preset
    /// of the same name wholesale.
    pub fn with_preset(&self, preset: EnsemblePreset) -> Self {
        let mut presets = self.presets.clone();
        presets.insert(preset.name.clone(), preset);
        Self { presets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ModeCategory, ModeTier, ReasoningMode};
    use crate::preset::entities::ModeRef;

    fn catalog() -> ModeCatalog {
        ModeCatalog::new(
            vec![ReasoningMode::new(
                "deductive",
                "A1",
                "Deductive",
                ModeCategory::Formal,
                ModeTier::Core,
            )],
            "test",
        )
        .unwrap()
    }

    fn preset(name: &str) -> EnsemblePreset {
        EnsemblePreset::new(name, vec![ModeRef::code("A1")])
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = PresetRegistry::new(vec![preset("a"), preset("a")]).unwrap_err();
        assert_eq!(err, DomainError::DuplicatePreset("a".to_string()));
    }

    #[test]
    fn test_list_sorted_by_name() {
        let registry = PresetRegistry::new(vec![preset("zeta"), preset("alpha")]).unwrap();
        let names: Vec<_> = registry.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_with_preset_replaces_wholesale_and_leaves_original() {
        let original = PresetRegistry::new(vec![preset("a").with_description("old")]).unwrap();
        let replacement = EnsemblePreset::new("a", vec![ModeRef::id("deductive")])
            .with_description("new")
            .with_source(PresetSource::Imported);
        let updated = original.with_preset(replacement.clone());

        assert_eq!(updated.get("a"), Some(&replacement));
        assert_eq!(original.get("a").unwrap().description, "old");
        assert_eq!(updated.imported().len(), 1);
        assert!(original.imported().is_empty());
    }

    #[test]
    fn test_resolve_unknown_preset() {
        let registry = PresetRegistry::default();
        assert_eq!(
            registry.resolve("missing", &catalog()).unwrap_err(),
            DomainError::UnknownPreset("missing".to_string())
        );
    }

    #[test]
    fn test_resolve_against_active_catalog() {
        let registry = PresetRegistry::new(vec![preset("a")]).unwrap();
        let resolved = registry.resolve("a", &catalog()).unwrap();
        assert_eq!(resolved.mode_ids, vec!["deductive"]);

        let empty = ModeCatalog::new(vec![], "empty").unwrap();
        assert!(registry.resolve("a", &empty).unwrap_err().is_unresolved());
    }

    #[test]
    fn test_with_tag() {
        let registry = PresetRegistry::new(vec![
            preset("a").with_tags(&["security"]),
            preset("b").with_tags(&["ideas"]),
        ])
        .unwrap();
        let tagged = registry.with_tag("security");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].name, "a");
    }
}
