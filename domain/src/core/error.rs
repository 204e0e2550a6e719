//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are configuration errors: they surface synchronously from catalog
/// and preset construction and are never partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate mode id {0:?} in catalog")]
    DuplicateModeId(String),

    #[error("duplicate mode code {code:?} ({first} and {second})")]
    DuplicateModeCode {
        code: String,
        first: String,
        second: String,
    },

    #[error("duplicate preset name {0:?}")]
    DuplicatePreset(String),

    #[error("invalid mode {id:?}: {reason}")]
    InvalidMode { id: String, reason: String },

    #[error("preset {preset:?} references unknown mode {reference:?}")]
    UnresolvedModeRef { preset: String, reference: String },

    #[error("unknown mode {0:?}")]
    UnknownMode(String),

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),

    #[error("unknown synthesis strategy {0:?}")]
    UnknownStrategy(String),

    #[error("synthesis strategy {name:?} is deprecated; use {replacement:?} instead")]
    DeprecatedStrategy { name: String, replacement: String },

    #[error("unsupported preset schema version {found} (max supported {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    #[error("ensemble has no modes")]
    EmptyEnsemble,

    #[error("invalid question: {0}")]
    InvalidQuestion(String),
}

impl DomainError {
    /// Check if this error was caused by a missing catalog entry
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            DomainError::UnresolvedModeRef { .. } | DomainError::UnknownMode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_code_display() {
        let error = DomainError::DuplicateModeCode {
            code: "A1".to_string(),
            first: "deductive".to_string(),
            second: "formal-proof".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "duplicate mode code \"A1\" (deductive and formal-proof)"
        );
    }

    #[test]
    fn test_is_unresolved_check() {
        assert!(DomainError::UnknownMode("x".to_string()).is_unresolved());
        assert!(
            DomainError::UnresolvedModeRef {
                preset: "p".to_string(),
                reference: "x".to_string(),
            }
            .is_unresolved()
        );
        assert!(!DomainError::EmptyEnsemble.is_unresolved());
    }
}
