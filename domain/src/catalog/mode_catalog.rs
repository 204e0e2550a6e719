//! Immutable mode registry keyed by id and by short code.

use super::mode::{ModeCategory, ModeTier, ReasoningMode, looks_like_code};
use crate::core::error::DomainError;
use std::collections::HashMap;

/// Validated, immutable set of reasoning modes.
///
/// Ids and codes are unique within one catalog (exact, case-sensitive). A
/// catalog is never mutated after construction; reloading builds a new one.
#[derive(Debug, Clone)]
pub struct ModeCatalog {
    modes: Vec<ReasoningMode>,
    by_id: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    version: String,
}

impl ModeCatalog {
    /// Build a catalog from an ordered mode list.
    ///
    /// Fails on the first duplicate id or code, or on a structurally invalid
    /// mode. Insertion order is preserved for listings.
    pub fn new(modes: Vec<ReasoningMode>, version: impl Into<String>) -> Result<Self, DomainError> {
        let mut by_id = HashMap::with_capacity(modes.len());
        let mut by_code: HashMap<String, usize> = HashMap::with_capacity(modes.len());

        for (idx, mode) in modes.iter().enumerate() {
            mode.validate()?;
            if by_id.insert(mode.id.clone(), idx).is_some() {
                return Err(DomainError::DuplicateModeId(mode.id.clone()));
            }
            if let Some(&prev) = by_code.get(&mode.code) {
                return Err(DomainError::DuplicateModeCode {
                    code: mode.code.clone(),
                    first: modes[prev].id.clone(),
                    second: mode.id.clone(),
                });
            }
            by_code.insert(mode.code.clone(), idx);
        }

        Ok(Self {
            modes,
            by_id,
            by_code,
            version: version.into(),
        })
    }

    pub fn get_mode(&self, id: &str) -> Option<&ReasoningMode> {
        self.by_id.get(id).map(|&idx| &self.modes[idx])
    }

    pub fn get_mode_by_code(&self, code: &str) -> Option<&ReasoningMode> {
        self.by_code.get(code).map(|&idx| &self.modes[idx])
    }

    /// Look a mode up by id, falling back to code for code-shaped input.
    pub fn resolve(&self, id_or_code: &str) -> Option<&ReasoningMode> {
        self.get_mode(id_or_code).or_else(|| {
            if looks_like_code(id_or_code) {
                self.get_mode_by_code(id_or_code)
            } else {
                None
            }
        })
    }

    /// Resolve a list of ids/codes into canonical mode ids.
    ///
    /// Duplicates (including an id and its own code) collapse to the first
    /// occurrence. Unknown entries fail with [`DomainError::UnknownMode`].
    pub fn resolve_ids<S: AsRef<str>>(&self, refs: &[S]) -> Result<Vec<String>, DomainError> {
        let mut ids: Vec<String> = Vec::with_capacity(refs.len());
        for r in refs {
            let r = r.as_ref();
            let mode = self
                .resolve(r)
                .ok_or_else(|| DomainError::UnknownMode(r.to_string()))?;
            if !ids.contains(&mode.id) {
                ids.push(mode.id.clone());
            }
        }
        Ok(ids)
    }

    pub fn list_modes(&self) -> &[ReasoningMode] {
        &self.modes
    }

    pub fn by_tier(&self, tier: ModeTier) -> Vec<&ReasoningMode> {
        self.modes.iter().filter(|m| m.tier == tier).collect()
    }

    pub fn by_category(&self, category: ModeCategory) -> Vec<&ReasoningMode> {
        self.modes.iter().filter(|m| m.category == category).collect()
    }

    pub fn count(&self) -> usize {
        self.modes.len()
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
