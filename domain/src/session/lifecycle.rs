//! Assignment lifecycle
//!
//! Forward-only state machine for one mode assignment:
//!
//! ```text
//! Pending ──BeginInjection──▶ Injecting ──ConfirmActive──▶ Active ──Complete──▶ Done
//!    │                            │                          │
//!    └────────────Fail────────────┴───────────Fail───────────┴──────────────▶ Error
//! ```
//!
//! [`transition`] is the whole table. Any pair not listed is a rejected no-op,
//! and the terminal states reject everything, so re-sending an event after
//! completion is harmless.

use serde::{Deserialize, Serialize};

/// Status of a mode assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// Created, prompt not yet sent
    #[default]
    Pending,
    /// Prompt injection started but not confirmed
    Injecting,
    /// The agent was seen working
    Active,
    Done,
    Error,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Injecting => "injecting",
            AssignmentStatus::Active => "active",
            AssignmentStatus::Done => "done",
            AssignmentStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Done | AssignmentStatus::Error)
    }

    /// Display-only progress fraction, non-decreasing along every valid path.
    pub fn progress(&self) -> f64 {
        match self {
            AssignmentStatus::Pending => 0.05,
            AssignmentStatus::Injecting => 0.25,
            AssignmentStatus::Active => 0.6,
            AssignmentStatus::Done | AssignmentStatus::Error => 1.0,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "○",
            AssignmentStatus::Injecting => "◐",
            AssignmentStatus::Active => "●",
            AssignmentStatus::Done => "✓",
            AssignmentStatus::Error => "✗",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that drive an assignment forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentEvent {
    BeginInjection,
    ConfirmActive,
    Complete,
    Fail(String),
}

impl AssignmentEvent {
    pub fn fail(reason: impl Into<String>) -> Self {
        AssignmentEvent::Fail(reason.into())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssignmentEvent::BeginInjection => "begin_injection",
            AssignmentEvent::ConfirmActive => "confirm_active",
            AssignmentEvent::Complete => "complete",
            AssignmentEvent::Fail(_) => "fail",
        }
    }
}

/// Result of applying an event to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: AssignmentStatus,
    pub accepted: bool,
}

impl Transition {
    fn to(status: AssignmentStatus) -> Self {
        Self {
            status,
            accepted: true,
        }
    }

    fn reject(status: AssignmentStatus) -> Self {
        Self {
            status,
            accepted: false,
        }
    }
}

/// Apply `event` to `from`.
pub fn transition(from: AssignmentStatus, event: &AssignmentEvent) -> Transition {
    use AssignmentEvent as E;
    use AssignmentStatus as S;

    match (from, event) {
        (S::Pending, E::BeginInjection) => Transition::to(S::Injecting),
        (S::Injecting, E::ConfirmActive) => Transition::to(S::Active),
        (S::Active, E::Complete) => Transition::to(S::Done),
        (S::Pending | S::Injecting | S::Active, E::Fail(_)) => Transition::to(S::Error),
        (status, _) => Transition::reject(status),
    }
}
