//! Synthesis port
//!
//! Called once per ensemble run, after every assignment reached a terminal
//! state (including after cancellation).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ensemble_domain::{AssignmentStatus, SessionSnapshot};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Synthesis failed: {0}")]
    Failed(String),
}

/// Last captured output of one assignment.
#[derive(Debug, Clone, Serialize)]
pub struct ModeOutput {
    pub mode_id: String,
    pub status: AssignmentStatus,
    pub text: String,
}

/// Everything a synthesis step gets to work with.
#[derive(Debug, Clone, Serialize)]
pub struct EnsembleOutcome {
    pub snapshot: SessionSnapshot,
    pub outputs: Vec<ModeOutput>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl EnsembleOutcome {
    /// Outputs of assignments that finished successfully
    pub fn completed_outputs(&self) -> impl Iterator<Item = &ModeOutput> {
        self.outputs
            .iter()
            .filter(|o| o.status == AssignmentStatus::Done)
    }

    pub fn elapsed_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Combines the outputs of a finished run
#[async_trait]
pub trait SynthesisHandler: Send + Sync {
    async fn synthesize(&self, outcome: &EnsembleOutcome) -> Result<(), SynthesisError>;
}

/// Handler that does nothing
pub struct NoSynthesis;

#[async_trait]
impl SynthesisHandler for NoSynthesis {
    async fn synthesize(&self, _outcome: &EnsembleOutcome) -> Result<(), SynthesisError> {
        Ok(())
    }
}
