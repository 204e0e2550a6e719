//! Mode assignment entity

use super::lifecycle::{AssignmentEvent, AssignmentStatus, transition};

/// Binding of one mode to one agent pane for one session.
///
/// Fields are private: the pane name is fixed at creation and the status
/// only moves through [`ModeAssignment::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeAssignment {
    mode_id: String,
    agent_type: String,
    pane_name: String,
    status: AssignmentStatus,
    reason: Option<String>,
}

impl ModeAssignment {
    pub fn new(
        mode_id: impl Into<String>,
        agent_type: impl Into<String>,
        pane_name: impl Into<String>,
    ) -> Self {
        Self {
            mode_id: mode_id.into(),
            agent_type: agent_type.into(),
            pane_name: pane_name.into(),
            status: AssignmentStatus::Pending,
            reason: None,
        }
    }

    pub fn mode_id(&self) -> &str {
        &self.mode_id
    }

    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    pub fn pane_name(&self) -> &str {
        &self.pane_name
    }

    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    /// Failure reason, set when the assignment moved to `Error`.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Apply `event`; returns whether it was accepted.
    pub fn apply(&mut self, event: &AssignmentEvent) -> bool {
        let t = transition(self.status, event);
        if t.accepted {
            self.status = t.status;
            if let AssignmentEvent::Fail(reason) = event {
                self.reason = Some(reason.clone());
            }
        }
        t.accepted
    }
}
