//! Read-only session views for reporting layers.

use super::lifecycle::AssignmentStatus;
use crate::catalog::ModeTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub mode_id: String,
    pub code: String,
    pub display_name: String,
    /// `None` when the mode is no longer in the catalog
    pub tier: Option<ModeTier>,
    pub agent_type: String,
    pub pane_name: String,
    pub status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_name: String,
    pub question: String,
    pub synthesis_strategy: String,
    pub progress: f64,
    pub complete: bool,
    pub assignments: Vec<AssignmentView>,
}

impl SessionSnapshot {
    pub fn count(&self, status: AssignmentStatus) -> usize {
        self.assignments.iter().filter(|a| a.status == status).count()
    }
}
