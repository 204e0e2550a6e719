//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A question to be answered by the ensemble (Value Object)
///
/// The same question is injected into every pane, each wrapped in the
/// prompt of the reasoning mode assigned to that pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a new question, rejecting empty or whitespace-only content
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters (not bytes), used for token estimation
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::try_new("Why does the build flake?").unwrap();
        assert_eq!(q.content(), "Why does the build flake?");
    }

    #[test]
    fn test_empty_question_rejected() {
        assert!(Question::try_new("").is_err());
        assert!(Question::try_new("   \n\t").is_err());
    }

    #[test]
    fn test_char_len_counts_chars() {
        let q = Question::try_new("あのね").unwrap();
        assert_eq!(q.char_len(), 3);
    }
}
