//! Synthesis handler that renders the synthesis prompt for the user

use async_trait::async_trait;
use ensemble_application::{EnsembleOutcome, SynthesisError, SynthesisHandler};
use ensemble_domain::{PromptTemplate, SynthesisStrategy};
use std::sync::Mutex;
use tracing::debug;

/// Renders the synthesis prompt from the completed outputs and keeps it
/// for the caller to print alongside the final snapshot.
#[derive(Default)]
pub struct ConsoleSynthesis {
    rendered: Mutex<Option<String>>,
}

impl ConsoleSynthesis {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rendered prompt, once the run finished
    pub fn take_rendered(&self) -> Option<String> {
        self.rendered.lock().ok().and_then(|mut slot| slot.take())
    }

    fn render(outcome: &EnsembleOutcome) -> Result<String, SynthesisError> {
        let snapshot = &outcome.snapshot;
        let strategy: SynthesisStrategy = snapshot.synthesis_strategy.parse().unwrap_or_default();

        let outputs: Vec<(String, String)> = outcome
            .completed_outputs()
            .map(|output| {
                let label = snapshot
                    .assignments
                    .iter()
                    .find(|a| a.mode_id == output.mode_id)
                    .map(|a| a.display_name.clone())
                    .unwrap_or_else(|| output.mode_id.clone());
                (label, output.text.trim().to_string())
            })
            .collect();

        if outputs.is_empty() {
            return Err(SynthesisError::Failed(
                "no assignment completed successfully".to_string(),
            ));
        }

        Ok(PromptTemplate::synthesis_prompt(
            strategy.config(),
            &snapshot.question,
            &outputs,
        ))
    }
}

#[async_trait]
impl SynthesisHandler for ConsoleSynthesis {
    async fn synthesize(&self, outcome: &EnsembleOutcome) -> Result<(), SynthesisError> {
        let prompt = Self::render(outcome)?;
        debug!("Synthesis prompt rendered ({} chars)", prompt.len());
        if let Ok(mut slot) = self.rendered.lock() {
            *slot = Some(prompt);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ensemble_application::ModeOutput;
    use ensemble_domain::{AssignmentStatus, AssignmentView, ModeTier, SessionSnapshot};

    fn outcome(statuses: &[AssignmentStatus]) -> EnsembleOutcome {
        let assignments = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| AssignmentView {
                mode_id: format!("mode-{i}"),
                code: format!("A{i}"),
                display_name: format!("A{i} Mode {i}"),
                tier: Some(ModeTier::Core),
                agent_type: "claude".to_string(),
                pane_name: format!("demo__claude_{}", i + 1),
                status: *status,
                reason: None,
                progress: 1.0,
            })
            .collect();
        let outputs = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| ModeOutput {
                mode_id: format!("mode-{i}"),
                status: *status,
                text: format!("  finding {i}  "),
            })
            .collect();
        EnsembleOutcome {
            snapshot: SessionSnapshot {
                session_name: "demo".to_string(),
                question: "Why is the build slow?".to_string(),
                synthesis_strategy: "voting".to_string(),
                progress: 1.0,
                complete: true,
                assignments,
            },
            outputs,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_renders_completed_outputs_only() {
        let handler = ConsoleSynthesis::new();
        handler
            .synthesize(&outcome(&[AssignmentStatus::Done, AssignmentStatus::Error]))
            .await
            .unwrap();

        let prompt = handler.take_rendered().unwrap();
        assert!(prompt.contains("Why is the build slow?"));
        assert!(prompt.contains("voting"));
        assert!(prompt.contains("--- A0 Mode 0 ---\nfinding 0"));
        assert!(!prompt.contains("finding 1"));
        assert!(handler.take_rendered().is_none());
    }

    #[tokio::test]
    async fn test_all_failed_is_an_error() {
        let handler = ConsoleSynthesis::new();
        let err = handler
            .synthesize(&outcome(&[AssignmentStatus::Error]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no assignment completed"));
        assert!(handler.take_rendered().is_none());
    }
}
