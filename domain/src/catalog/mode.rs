//! Reasoning mode entity and its classification axes.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Availability tier of a reasoning mode.
///
/// Core modes are always available. Advanced modes are costlier and only run
/// when the caller opts in. Modes loaded from user or project files without an
/// explicit tier default to Advanced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeTier {
    Core,
    #[default]
    Advanced,
}

impl ModeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeTier::Core => "core",
            ModeTier::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for ModeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family of reasoning a mode belongs to.
///
/// Each category owns one code letter; every mode code starts with the
/// letter of its category (`A1` is Formal, `G3` is Practical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModeCategory {
    Formal,
    Ampliative,
    Uncertainty,
    Vagueness,
    Change,
    Causal,
    Practical,
    Strategic,
    Dialectical,
    Modal,
    Domain,
    Meta,
}

impl ModeCategory {
    pub const ALL: [ModeCategory; 12] = [
        ModeCategory::Formal,
        ModeCategory::Ampliative,
        ModeCategory::Uncertainty,
        ModeCategory::Vagueness,
        ModeCategory::Change,
        ModeCategory::Causal,
        ModeCategory::Practical,
        ModeCategory::Strategic,
        ModeCategory::Dialectical,
        ModeCategory::Modal,
        ModeCategory::Domain,
        ModeCategory::Meta,
    ];

    /// Code letter shared by every mode in this category
    pub fn letter(&self) -> char {
        match self {
            ModeCategory::Formal => 'A',
            ModeCategory::Ampliative => 'B',
            ModeCategory::Uncertainty => 'C',
            ModeCategory::Vagueness => 'D',
            ModeCategory::Change => 'E',
            ModeCategory::Causal => 'F',
            ModeCategory::Practical => 'G',
            ModeCategory::Strategic => 'H',
            ModeCategory::Dialectical => 'I',
            ModeCategory::Modal => 'J',
            ModeCategory::Domain => 'K',
            ModeCategory::Meta => 'L',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.letter() == letter)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeCategory::Formal => "Formal",
            ModeCategory::Ampliative => "Ampliative",
            ModeCategory::Uncertainty => "Uncertainty",
            ModeCategory::Vagueness => "Vagueness",
            ModeCategory::Change => "Change",
            ModeCategory::Causal => "Causal",
            ModeCategory::Practical => "Practical",
            ModeCategory::Strategic => "Strategic",
            ModeCategory::Dialectical => "Dialectical",
            ModeCategory::Modal => "Modal",
            ModeCategory::Domain => "Domain",
            ModeCategory::Meta => "Meta",
        }
    }
}

impl std::fmt::Display for ModeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a mode definition came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSource {
    #[default]
    Embedded,
    User,
    Project,
}

/// An analytical persona / prompt template applied by one agent.
///
/// Immutable once loaded into a [`ModeCatalog`](super::ModeCatalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningMode {
    /// Stable kebab-case identifier (e.g. `deductive`)
    pub id: String,
    /// Short mnemonic (e.g. `A1`)
    pub code: String,
    pub name: String,
    pub category: ModeCategory,
    #[serde(default)]
    pub tier: ModeTier,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub description: String,
    /// What the mode is expected to produce
    #[serde(default)]
    pub outputs: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub best_for: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_modes: Vec<String>,
    #[serde(default, skip_serializing)]
    pub source: ModeSource,
}

impl ReasoningMode {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        category: ModeCategory,
        tier: ModeTier,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            category,
            tier,
            short_desc: String::new(),
            description: String::new(),
            outputs: String::new(),
            best_for: Vec::new(),
            failure_modes: Vec::new(),
            source: ModeSource::Embedded,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_short_desc(mut self, short_desc: impl Into<String>) -> Self {
        self.short_desc = short_desc.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_outputs(mut self, outputs: impl Into<String>) -> Self {
        self.outputs = outputs.into();
        self
    }

    pub fn with_best_for(mut self, items: &[&str]) -> Self {
        self.best_for = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_failure_modes(mut self, items: &[&str]) -> Self {
        self.failure_modes = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_source(mut self, source: ModeSource) -> Self {
        self.source = source;
        self
    }

    // ==================== Queries ====================

    pub fn is_core(&self) -> bool {
        self.tier == ModeTier::Core
    }

    /// Size in characters of the descriptive text a prompt carries for this mode.
    pub fn payload_chars(&self) -> usize {
        self.short_desc.chars().count()
            + self.description.chars().count()
            + self.outputs.chars().count()
            + self.best_for.iter().map(|s| s.chars().count()).sum::<usize>()
    }

    /// `"A1 Deductive"` style label for listings.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }

    /// Structural checks on a single mode definition.
    ///
    /// - id is non-empty lowercase kebab-case
    /// - name is non-empty
    /// - code is `<category letter><digits>`
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidMode {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.is_empty() {
            return Err(invalid("missing id"));
        }
        if !is_valid_mode_id(&self.id) {
            return Err(invalid("id must be lowercase kebab-case"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("missing name"));
        }
        if !looks_like_code(&self.code) {
            return Err(invalid("code must be a letter followed by digits"));
        }
        if !self.code.starts_with(self.category.letter()) {
            return Err(invalid(&format!(
                "code {} does not match category {} ({})",
                self.code,
                self.category,
                self.category.letter()
            )));
        }
        Ok(())
    }
}

fn is_valid_mode_id(id: &str) -> bool {
    !id.starts_with('-')
        && !id.ends_with('-')
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// True for strings shaped like a mode code: one uppercase letter then digits.
pub fn looks_like_code(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    let rest = chars.as_str();
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReasoningMode {
        ReasoningMode::new(
            "deductive",
            "A1",
            "Deductive",
            ModeCategory::Formal,
            ModeTier::Core,
        )
    }

    #[test]
    fn test_valid_mode() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_code_must_match_category() {
        let mut mode = sample();
        mode.code = "G1".to_string();
        let err = mode.validate().unwrap_err();
        assert!(err.to_string().contains("does not match category"));
    }

    #[test]
    fn test_id_must_be_kebab() {
        let mut mode = sample();
        mode.id = "Deductive Mode".to_string();
        assert!(mode.validate().is_err());
        mode.id = String::new();
        assert!(mode.validate().unwrap_err().to_string().contains("missing id"));
    }

    #[test]
    fn test_looks_like_code() {
        assert!(looks_like_code("A1"));
        assert!(looks_like_code("K12"));
        assert!(!looks_like_code("a1"));
        assert!(!looks_like_code("A"));
        assert!(!looks_like_code("deductive"));
        assert!(!looks_like_code("AB1"));
    }

    #[test]
    fn test_category_letters_roundtrip() {
        for category in ModeCategory::ALL {
            assert_eq!(ModeCategory::from_letter(category.letter()), Some(category));
        }
        assert_eq!(ModeCategory::from_letter('Z'), None);
    }

    #[test]
    fn test_tier_defaults_to_advanced() {
        let json = r#"{"id":"custom","code":"K8","name":"Custom","category":"Domain"}"#;
        let mode: ReasoningMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode.tier, ModeTier::Advanced);
        assert_eq!(mode.source, ModeSource::Embedded);
    }

    #[test]
    fn test_payload_chars_grows_with_text() {
        let short = sample().with_description("abc");
        let long = sample().with_description("abcdefghij");
        assert!(long.payload_chars() > short.payload_chars());
    }
}
