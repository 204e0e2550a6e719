//! Liveness classification of captured pane text.
//!
//! All functions here are pure. They may run concurrently across panes
//! without coordination.

use super::patterns::{
    ERROR_PATTERNS, MAX_ERRORS, MAX_MATCHES_PER_PATTERN, RATE_LIMIT_PATTERNS, STATE_TOKENS,
};
use serde::{Deserialize, Serialize};

/// What an agent appears to be doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentActivity {
    Waiting,
    Generating,
    Thinking,
    Error,
    Stalled,
    #[default]
    Unknown,
}

impl AgentActivity {
    /// Display indicator.
    pub fn indicator(&self) -> &'static str {
        match self {
            AgentActivity::Waiting => "waiting",
            AgentActivity::Generating => "generating",
            AgentActivity::Thinking => "thinking",
            AgentActivity::Error => "error",
            AgentActivity::Stalled => "stalled",
            AgentActivity::Unknown => "unknown",
        }
    }

    /// Generating or thinking.
    pub fn is_working(&self) -> bool {
        matches!(self, AgentActivity::Generating | AgentActivity::Thinking)
    }
}

impl std::fmt::Display for AgentActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.indicator())
    }
}

/// Map an extracted status token to an activity. Matching is exact; anything
/// else (including the empty string) is [`AgentActivity::Unknown`].
pub fn classify_state(token: &str) -> AgentActivity {
    STATE_TOKENS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, activity)| *activity)
        .unwrap_or_default()
}

/// True if `text` contains a rate-limit phrase.
pub fn detect_rate_limit(text: &str) -> bool {
    RATE_LIMIT_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Diagnostic error messages found in `text`.
///
/// At most two matches per marker and three distinct messages overall;
/// identical messages are reported once.
pub fn extract_errors(text: &str) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    for pattern in ERROR_PATTERNS.iter() {
        for m in pattern.regex.find_iter(text).take(MAX_MATCHES_PER_PATTERN) {
            let message = m.as_str().trim_end().to_string();
            if errors.contains(&message) {
                continue;
            }
            errors.push(message);
            if errors.len() >= MAX_ERRORS {
                return errors;
            }
        }
    }
    errors
}

/// Combined reading of one pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneObservation {
    pub activity: AgentActivity,
    pub rate_limited: bool,
    pub errors: Vec<String>,
}

/// What an observation means for an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LivenessSignal {
    Working,
    Idle,
    Failed(String),
    Unknown,
}

impl PaneObservation {
    /// What this reading means for an assignment. `confirmed` is true once
    /// the agent has been seen working.
    ///
    /// A working token wins over anything found in the text. Otherwise a
    /// rate limit fails the assignment, and extracted errors fail it only
    /// before it was confirmed; after that they are the agent's own output.
    pub fn signal(&self, confirmed: bool) -> LivenessSignal {
        if self.activity.is_working() {
            return LivenessSignal::Working;
        }
        if self.rate_limited {
            return LivenessSignal::Failed("rate limited".to_string());
        }
        if !confirmed && let Some(first) = self.errors.first() {
            return LivenessSignal::Failed(first.clone());
        }
        match self.activity {
            AgentActivity::Generating | AgentActivity::Thinking => LivenessSignal::Working,
            AgentActivity::Waiting => LivenessSignal::Idle,
            AgentActivity::Error => LivenessSignal::Failed("agent reported error".to_string()),
            AgentActivity::Stalled => LivenessSignal::Failed("agent stalled".to_string()),
            AgentActivity::Unknown => LivenessSignal::Unknown,
        }
    }
}

/// Classify a pane from its status token (if any) and captured text.
pub fn observe(token: Option<&str>, text: &str) -> PaneObservation {
    PaneObservation {
        activity: token.map(classify_state).unwrap_or_default(),
        rate_limited: detect_rate_limit(text),
        errors: extract_errors(text),
    }
}
