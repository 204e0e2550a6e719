//! Ensemble session entity

use super::assignment::ModeAssignment;
use super::lifecycle::{AssignmentEvent, AssignmentStatus};
use super::snapshot::{AssignmentView, SessionSnapshot};
use crate::catalog::ModeCatalog;
use crate::core::error::DomainError;
use crate::preset::SynthesisStrategy;

/// Default pane name for the `n`th (1-based) agent of `agent_type`.
pub fn default_pane_name(session_name: &str, agent_type: &str, n: usize) -> String {
    format!("{session_name}__{agent_type}_{n}")
}

/// Requested assignment, before the session exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSpec {
    pub mode_id: String,
    pub agent_type: String,
    pub pane_name: String,
}

impl AssignmentSpec {
    pub fn new(
        mode_id: impl Into<String>,
        agent_type: impl Into<String>,
        pane_name: impl Into<String>,
    ) -> Self {
        Self {
            mode_id: mode_id.into(),
            agent_type: agent_type.into(),
            pane_name: pane_name.into(),
        }
    }
}

/// One ensemble run: a question, fixed assignments and a synthesis strategy.
///
/// Membership is fixed at creation. Assignments change only through
/// [`EnsembleSession::apply`].
#[derive(Debug, Clone)]
pub struct EnsembleSession {
    session_name: String,
    question: String,
    assignments: Vec<ModeAssignment>,
    synthesis_strategy: SynthesisStrategy,
}

impl EnsembleSession {
    pub fn new(
        session_name: impl Into<String>,
        question: impl Into<String>,
        specs: Vec<AssignmentSpec>,
        synthesis_strategy: SynthesisStrategy,
    ) -> Result<Self, DomainError> {
        if specs.is_empty() {
            return Err(DomainError::EmptyEnsemble);
        }
        let assignments = specs
            .into_iter()
            .map(|s| ModeAssignment::new(s.mode_id, s.agent_type, s.pane_name))
            .collect();
        Ok(Self {
            session_name: session_name.into(),
            question: question.into(),
            assignments,
            synthesis_strategy,
        })
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn synthesis_strategy(&self) -> SynthesisStrategy {
        self.synthesis_strategy
    }

    pub fn assignments(&self) -> &[ModeAssignment] {
        &self.assignments
    }

    pub fn assignment(&self, index: usize) -> Option<&ModeAssignment> {
        self.assignments.get(index)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Apply `event` to the assignment at `index`. Out-of-range indices and
    /// rejected transitions both return `false`.
    pub fn apply(&mut self, index: usize, event: &AssignmentEvent) -> bool {
        self.assignments
            .get_mut(index)
            .is_some_and(|a| a.apply(event))
    }

    /// Fail every non-terminal assignment; returns how many were failed.
    pub fn fail_remaining(&mut self, reason: &str) -> usize {
        let event = AssignmentEvent::fail(reason);
        self.assignments
            .iter_mut()
            .filter(|a| !a.is_terminal())
            .map(|a| a.apply(&event))
            .filter(|accepted| *accepted)
            .count()
    }

    /// True when every assignment is terminal.
    pub fn is_complete(&self) -> bool {
        self.assignments.iter().all(ModeAssignment::is_terminal)
    }

    /// Mean progress fraction across assignments.
    pub fn progress(&self) -> f64 {
        if self.assignments.is_empty() {
            return 1.0;
        }
        let sum: f64 = self.assignments.iter().map(|a| a.status().progress()).sum();
        sum / self.assignments.len() as f64
    }

    pub fn count(&self, status: AssignmentStatus) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.status() == status)
            .count()
    }

    pub fn indices_with(&self, status: AssignmentStatus) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.status() == status)
            .map(|(i, _)| i)
            .collect()
    }

    /// Read-only view for reporting, with display data looked up in `catalog`.
    pub fn snapshot(&self, catalog: &ModeCatalog) -> SessionSnapshot {
        let assignments = self
            .assignments
            .iter()
            .map(|a| {
                let mode = catalog.get_mode(a.mode_id());
                AssignmentView {
                    mode_id: a.mode_id().to_string(),
                    code: mode.map(|m| m.code.clone()).unwrap_or_default(),
                    display_name: mode
                        .map(|m| m.display_name())
                        .unwrap_or_else(|| a.mode_id().to_string()),
                    tier: mode.map(|m| m.tier),
                    agent_type: a.agent_type().to_string(),
                    pane_name: a.pane_name().to_string(),
                    status: a.status(),
                    reason: a.reason().map(str::to_string),
                    progress: a.status().progress(),
                }
            })
            .collect();
        SessionSnapshot {
            session_name: self.session_name.clone(),
            question: self.question.clone(),
            synthesis_strategy: self.synthesis_strategy.as_str().to_string(),
            progress: self.progress(),
            complete: self.is_complete(),
            assignments,
        }
    }
}
