//! Run Ensemble use case
//!
//! Drives one ensemble session end to end:
//!
//! 1. [`RunEnsembleUseCase::prepare`] resolves the modes and runs the budget
//!    estimator; the caller reads the warnings and decides whether to go on
//! 2. [`RunEnsembleUseCase::start`] creates the session, one Pending
//!    assignment per mode, each bound to a named pane
//! 3. [`EnsembleRun::poll`] injects prompts, reads the panes and moves
//!    assignments forward; [`EnsembleRun::run`] repeats it until the session
//!    completes or is cancelled
//!
//! Right before a prompt is sent the pane is captured once as a baseline.
//! Later captures are classified on their fresh output only: lines absent
//! from the baseline and from the prompt itself.
//!
//! Session state lives under one mutex that is never held across an await.
//! Pane I/O happens outside it and the results are applied afterwards, one
//! transition at a time. The Pending → Injecting flip happens under the lock
//! before the prompt is sent, so overlapping polls inject at most once. The
//! synthesis handler sits in the same state and is taken out exactly once.

use super::estimate::{EstimateRequest, EstimateUseCase};
use super::resolve_modes::ModeSelection;
use crate::config::OrchestratorParams;
use crate::pane_mapper::PaneMapper;
use crate::ports::pane_manager::{PaneError, PaneManager};
use crate::ports::progress::{EnsembleProgressNotifier, NoProgress};
use crate::ports::synthesis::{EnsembleOutcome, ModeOutput, SynthesisHandler};
use crate::registry::SharedRegistry;
use chrono::{DateTime, Utc};
use ensemble_domain::{
    AssignmentEvent, AssignmentSpec, AssignmentStatus, BudgetConfig, DomainError, EnsembleSession,
    EstimateOutput, LivenessSignal, ModeCatalog, PaneObservation, PromptTemplate, Question,
    SessionSnapshot, SynthesisConfig, SynthesisStrategy, default_pane_name, observe,
};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a run before it starts.
///
/// Once a session exists, failures are recorded on the affected assignment
/// and never surface here.
#[derive(Error, Debug)]
pub enum RunEnsembleError {
    #[error("No runnable modes: {0}")]
    NoModes(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Expected {expected} pane bindings, got {actual}")]
    PaneCountMismatch { expected: usize, actual: usize },
}

/// Input for one ensemble run
#[derive(Debug, Clone)]
pub struct RunEnsembleInput {
    pub selection: ModeSelection,
    pub question: String,
    pub session_name: String,
    /// Non-zero fields override the preset/default budget
    pub budget_override: BudgetConfig,
    pub allow_advanced: bool,
    pub strategy: Option<SynthesisStrategy>,
    pub agent_type: Option<String>,
}

impl RunEnsembleInput {
    pub fn new(
        selection: ModeSelection,
        question: impl Into<String>,
        session_name: impl Into<String>,
    ) -> Self {
        Self {
            selection,
            question: question.into(),
            session_name: session_name.into(),
            budget_override: BudgetConfig::new(0, 0),
            allow_advanced: false,
            strategy: None,
            agent_type: None,
        }
    }

    pub fn with_budget_override(mut self, budget: BudgetConfig) -> Self {
        self.budget_override = budget;
        self
    }

    pub fn with_allow_advanced(mut self, allow: bool) -> Self {
        self.allow_advanced = allow;
        self
    }

    pub fn with_strategy(mut self, strategy: SynthesisStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_agent_type(mut self, agent_type: impl Into<String>) -> Self {
        self.agent_type = Some(agent_type.into());
        self
    }
}

/// A resolved, estimated run that has not started yet.
#[derive(Debug, Clone)]
pub struct PreparedEnsemble {
    pub session_name: String,
    pub question: String,
    pub preset: Option<String>,
    /// Modes that made it through estimation, in order
    pub mode_ids: Vec<String>,
    pub estimate: EstimateOutput,
    pub synthesis: SynthesisConfig,
    pub agent_type: String,
}

impl PreparedEnsemble {
    pub fn warnings(&self) -> &[String] {
        &self.estimate.warnings
    }

    pub fn has_budget_warning(&self) -> bool {
        self.estimate.has_budget_warning()
    }
}

/// Which pane (and agent) an assignment runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneBinding {
    pub agent_type: String,
    pub pane_name: String,
}

impl PaneBinding {
    pub fn new(agent_type: impl Into<String>, pane_name: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            pane_name: pane_name.into(),
        }
    }
}

/// Use case for running an ensemble across agent panes
pub struct RunEnsembleUseCase {
    registry: Arc<SharedRegistry>,
    panes: Arc<dyn PaneManager>,
    synthesis: Arc<dyn SynthesisHandler>,
    params: OrchestratorParams,
    progress: Arc<dyn EnsembleProgressNotifier>,
}

impl RunEnsembleUseCase {
    pub fn new(
        registry: Arc<SharedRegistry>,
        panes: Arc<dyn PaneManager>,
        synthesis: Arc<dyn SynthesisHandler>,
    ) -> Self {
        Self {
            registry,
            panes,
            synthesis,
            params: OrchestratorParams::default(),
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_params(mut self, params: OrchestratorParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn EnsembleProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Resolve modes and estimate the run.
    pub fn prepare(&self, input: &RunEnsembleInput) -> Result<PreparedEnsemble, RunEnsembleError> {
        let question = Question::try_new(input.question.clone())?;

        let request = EstimateRequest::new(input.selection.clone(), question.content())
            .with_budget_override(input.budget_override)
            .with_allow_advanced(input.allow_advanced);
        let result = EstimateUseCase::new(Arc::clone(&self.registry))
            .with_default_budget(self.params.default_budget)
            .with_allow_advanced(self.params.allow_advanced)
            .execute(&request)?;

        if result.output.modes.is_empty() {
            return Err(RunEnsembleError::NoModes(result.output.warnings.join("; ")));
        }

        let mut synthesis = result.selection.synthesis.clone();
        if let Some(strategy) = input.strategy {
            synthesis.strategy = strategy;
        }

        Ok(PreparedEnsemble {
            session_name: input.session_name.clone(),
            question: question.content().to_string(),
            preset: result.selection.preset.clone(),
            mode_ids: result.output.mode_ids(),
            estimate: result.output,
            synthesis,
            agent_type: input
                .agent_type
                .clone()
                .unwrap_or_else(|| self.params.default_agent_type.clone()),
        })
    }

    /// `<session>__<agent>_<n>` for every mode, numbered from 1.
    pub fn default_bindings(&self, prepared: &PreparedEnsemble) -> Vec<PaneBinding> {
        (1..=prepared.mode_ids.len())
            .map(|n| {
                PaneBinding::new(
                    prepared.agent_type.clone(),
                    default_pane_name(&prepared.session_name, &prepared.agent_type, n),
                )
            })
            .collect()
    }

    /// Create the session and return a handle that drives it.
    pub fn start(
        &self,
        prepared: &PreparedEnsemble,
        bindings: Vec<PaneBinding>,
    ) -> Result<EnsembleRun, RunEnsembleError> {
        if bindings.len() != prepared.mode_ids.len() {
            return Err(RunEnsembleError::PaneCountMismatch {
                expected: prepared.mode_ids.len(),
                actual: bindings.len(),
            });
        }

        let catalog = self.registry.catalog();
        let token_budget = prepared.estimate.budget.max_tokens_per_mode;
        let mut prompts = Vec::with_capacity(bindings.len());
        for mode_id in &prepared.mode_ids {
            let mode = catalog
                .get_mode(mode_id)
                .ok_or_else(|| DomainError::UnknownMode(mode_id.clone()))?;
            prompts.push(PromptTemplate::mode_prompt(mode, &prepared.question, token_budget));
        }

        let specs = prepared
            .mode_ids
            .iter()
            .zip(bindings)
            .map(|(mode_id, b)| AssignmentSpec::new(mode_id.clone(), b.agent_type, b.pane_name))
            .collect();
        let session = EnsembleSession::new(
            prepared.session_name.clone(),
            prepared.question.clone(),
            specs,
            prepared.synthesis.strategy,
        )?;

        info!(
            "Starting ensemble {} with {} modes ({} synthesis)",
            prepared.session_name,
            session.len(),
            prepared.synthesis.strategy
        );

        let run = EnsembleRun::new(
            session,
            prompts,
            catalog,
            Arc::clone(&self.panes),
            Arc::clone(&self.synthesis),
            Arc::clone(&self.progress),
            self.params.clone(),
        );
        self.progress.on_run_start(&run.snapshot());
        Ok(run)
    }

    /// Prepare, start with default bindings and run to completion.
    pub async fn execute(
        &self,
        input: &RunEnsembleInput,
        cancel: CancellationToken,
    ) -> Result<SessionSnapshot, RunEnsembleError> {
        let prepared = self.prepare(input)?;
        let bindings = self.default_bindings(&prepared);
        let run = self.start(&prepared, bindings)?;
        Ok(run.run(cancel).await)
    }
}

struct RunState {
    session: EnsembleSession,
    mapper: PaneMapper,
    injected_at: Vec<Option<Instant>>,
    /// Pane text just before injection; `None` until it was taken
    baseline: Vec<Option<String>>,
    last_output: Vec<String>,
    /// Taken exactly once, when the session completes
    synthesis: Option<Arc<dyn SynthesisHandler>>,
}

struct RunInner {
    state: Mutex<RunState>,
    prompts: Vec<String>,
    catalog: Arc<ModeCatalog>,
    panes: Arc<dyn PaneManager>,
    progress: Arc<dyn EnsembleProgressNotifier>,
    params: OrchestratorParams,
    started_at: DateTime<Utc>,
}

/// Handle to a running ensemble session. Cheap to clone; clones drive the
/// same session.
#[derive(Clone)]
pub struct EnsembleRun {
    inner: Arc<RunInner>,
}

impl EnsembleRun {
    fn new(
        session: EnsembleSession,
        prompts: Vec<String>,
        catalog: Arc<ModeCatalog>,
        panes: Arc<dyn PaneManager>,
        synthesis: Arc<dyn SynthesisHandler>,
        progress: Arc<dyn EnsembleProgressNotifier>,
        params: OrchestratorParams,
    ) -> Self {
        let n = session.len();
        Self {
            inner: Arc::new(RunInner {
                state: Mutex::new(RunState {
                    session,
                    mapper: PaneMapper::new(),
                    injected_at: vec![None; n],
                    baseline: vec![None; n],
                    last_output: vec![String::new(); n],
                    synthesis: Some(synthesis),
                }),
                prompts,
                catalog,
                panes,
                progress,
                params,
                started_at: Utc::now(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RunState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current read-only view of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().session.snapshot(&self.inner.catalog)
    }

    pub fn is_complete(&self) -> bool {
        self.state().session.is_complete()
    }

    /// Prompt injected into the assignment at `index`
    pub fn prompt(&self, index: usize) -> Option<&str> {
        self.inner.prompts.get(index).map(String::as_str)
    }

    /// Apply an event while holding the state lock and report accepted ones.
    fn apply(&self, state: &mut RunState, index: usize, event: &AssignmentEvent) -> bool {
        if !state.session.apply(index, event) {
            return false;
        }
        if let Some(a) = state.session.assignment(index) {
            match a.status() {
                AssignmentStatus::Error => warn!(
                    "Assignment {} ({}) failed: {}",
                    a.mode_id(),
                    a.pane_name(),
                    a.reason().unwrap_or("unknown")
                ),
                status => debug!("Assignment {} ({}) -> {}", a.mode_id(), a.pane_name(), status),
            }
            self.inner
                .progress
                .on_transition(index, a.mode_id(), a.status(), a.reason());
        }
        true
    }

    /// One round: refresh panes, inject, capture, classify, apply, finish.
    pub async fn poll(&self) -> SessionSnapshot {
        match self.inner.panes.list_panes().await {
            Ok(panes) => self.state().mapper.refresh(&panes),
            Err(e) => {
                warn!("Failed to list panes: {}", e);
                self.enforce_timeouts();
                self.finish_if_complete().await;
                return self.snapshot();
            }
        }

        let (injections, captures) = self.plan();
        self.inject(injections).await;
        let observations = self.capture(captures).await;
        self.apply_observations(observations);
        self.finish_if_complete().await;

        let snapshot = self.snapshot();
        self.inner.progress.on_poll(&snapshot);
        snapshot
    }

    /// Decide what to do with every live assignment. Pending assignments are
    /// flipped to Injecting here, before any prompt is sent.
    fn plan(&self) -> (Vec<(usize, u32)>, Vec<(usize, u32)>) {
        let now = Instant::now();
        let max_active = self.inner.params.max_active_duration;
        let mut injections = Vec::new();
        let mut captures = Vec::new();

        let mut guard = self.state();
        let state = &mut *guard;
        for index in 0..state.session.len() {
            let Some(a) = state.session.assignment(index) else {
                continue;
            };
            let status = a.status();
            if status.is_terminal() {
                continue;
            }
            let Some(pane) = state.mapper.lookup(a.pane_name()) else {
                let reason = if status == AssignmentStatus::Pending {
                    "pane not found"
                } else {
                    "pane gone"
                };
                self.apply(state, index, &AssignmentEvent::fail(reason));
                continue;
            };

            if status == AssignmentStatus::Pending {
                if self.apply(state, index, &AssignmentEvent::BeginInjection) {
                    state.injected_at[index] = Some(now);
                    injections.push((index, pane));
                }
                continue;
            }

            let timed_out = state.injected_at[index]
                .is_some_and(|at| now.duration_since(at) >= max_active);
            if timed_out {
                self.apply(state, index, &AssignmentEvent::fail("timeout"));
            } else if state.baseline[index].is_some() {
                captures.push((index, pane));
            }
        }
        (injections, captures)
    }

    fn enforce_timeouts(&self) {
        let now = Instant::now();
        let max_active = self.inner.params.max_active_duration;
        let mut guard = self.state();
        let state = &mut *guard;
        for index in 0..state.session.len() {
            let expired = state.injected_at[index]
                .is_some_and(|at| now.duration_since(at) >= max_active);
            let live = state
                .session
                .assignment(index)
                .is_some_and(|a| !a.is_terminal());
            if expired && live {
                self.apply(state, index, &AssignmentEvent::fail("timeout"));
            }
        }
    }

    async fn inject(&self, injections: Vec<(usize, u32)>) {
        if injections.is_empty() {
            return;
        }
        debug!("Injecting {} prompts", injections.len());
        let panes = &self.inner.panes;
        let results = join_all(injections.into_iter().map(|(index, pane)| {
            let prompt = self.inner.prompts[index].as_str();
            async move {
                let baseline = panes.capture_text(pane).await.unwrap_or_default();
                self.state().baseline[index] = Some(baseline);
                (index, panes.send_text(pane, prompt).await)
            }
        }))
        .await;

        let mut guard = self.state();
        for (index, result) in results {
            if let Err(e) = result {
                let reason = if e.is_not_found() {
                    "pane gone".to_string()
                } else {
                    format!("injection failed: {e}")
                };
                self.apply(&mut guard, index, &AssignmentEvent::fail(reason));
            }
        }
    }

    /// Capture every pane concurrently and classify its fresh output.
    async fn capture(
        &self,
        captures: Vec<(usize, u32)>,
    ) -> Vec<(usize, Result<(PaneObservation, String), PaneError>)> {
        let panes = &self.inner.panes;
        let baselines: Vec<String> = {
            let state = self.state();
            captures
                .iter()
                .map(|(index, _)| state.baseline[*index].clone().unwrap_or_default())
                .collect()
        };
        let captured = join_all(
            captures
                .into_iter()
                .map(|(index, pane)| async move { (index, pane, panes.capture_text(pane).await) }),
        )
        .await;

        captured
            .into_iter()
            .zip(baselines)
            .map(|((index, pane, result), baseline)| {
                let observed = result.map(|text| {
                    let token = panes.status_token(pane, &text);
                    let fresh = fresh_output(&text, &baseline, &self.inner.prompts[index]);
                    (observe(token.as_deref(), &fresh), fresh)
                });
                (index, observed)
            })
            .collect()
    }

    fn apply_observations(
        &self,
        observations: Vec<(usize, Result<(PaneObservation, String), PaneError>)>,
    ) {
        let mut guard = self.state();
        let state = &mut *guard;
        for (index, observed) in observations {
            let Some(status) = state.session.assignment(index).map(|a| a.status()) else {
                continue;
            };
            match observed {
                Ok((observation, fresh)) => {
                    let confirmed = status == AssignmentStatus::Active;
                    let events = match observation.signal(confirmed) {
                        LivenessSignal::Failed(reason) => vec![AssignmentEvent::Fail(reason)],
                        LivenessSignal::Working if !confirmed => {
                            vec![AssignmentEvent::ConfirmActive]
                        }
                        LivenessSignal::Idle if confirmed => vec![AssignmentEvent::Complete],
                        // Finished between two polls: it answered without
                        // ever being seen working.
                        LivenessSignal::Idle if has_answer(&fresh) => {
                            vec![AssignmentEvent::ConfirmActive, AssignmentEvent::Complete]
                        }
                        _ => Vec::new(),
                    };
                    state.last_output[index] = fresh;
                    for event in &events {
                        self.apply(state, index, event);
                    }
                }
                Err(e) if e.is_not_found() => {
                    self.apply(state, index, &AssignmentEvent::fail("pane gone"));
                }
                Err(e) => warn!("Capture failed for assignment {}: {}", index, e),
            }
        }
    }

    /// Fire the synthesis handler if the session is complete and it has not
    /// fired yet.
    async fn finish_if_complete(&self) {
        let (handler, outcome) = {
            let mut state = self.state();
            if !state.session.is_complete() {
                return;
            }
            let Some(handler) = state.synthesis.take() else {
                return;
            };
            let outputs = state
                .session
                .assignments()
                .iter()
                .zip(&state.last_output)
                .map(|(a, text)| ModeOutput {
                    mode_id: a.mode_id().to_string(),
                    status: a.status(),
                    text: text.clone(),
                })
                .collect();
            let outcome = EnsembleOutcome {
                snapshot: state.session.snapshot(&self.inner.catalog),
                outputs,
                started_at: self.inner.started_at,
                finished_at: Utc::now(),
            };
            (handler, outcome)
        };

        info!(
            "Ensemble {} complete: {} done, {} failed",
            outcome.snapshot.session_name,
            outcome.snapshot.count(AssignmentStatus::Done),
            outcome.snapshot.count(AssignmentStatus::Error)
        );
        self.inner.progress.on_run_complete(&outcome.snapshot);
        if let Err(e) = handler.synthesize(&outcome).await {
            warn!("Synthesis failed: {}", e);
        }
    }

    /// Fail every live assignment with `reason` and fire synthesis.
    pub async fn cancel(&self, reason: &str) -> SessionSnapshot {
        {
            let mut guard = self.state();
            let state = &mut *guard;
            let event = AssignmentEvent::fail(reason);
            for index in 0..state.session.len() {
                self.apply(state, index, &event);
            }
        }
        info!("Ensemble cancelled: {}", reason);
        self.finish_if_complete().await;
        self.snapshot()
    }

    /// Poll until every assignment is terminal or `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) -> SessionSnapshot {
        loop {
            if cancel.is_cancelled() {
                return self.cancel("cancelled").await;
            }
            let snapshot = self.poll().await;
            if snapshot.complete {
                return snapshot;
            }
            tokio::select! {
                _ = cancel.cancelled() => return self.cancel("cancelled").await,
                _ = tokio::time::sleep(self.inner.params.poll_interval) => {}
            }
        }
    }
}

fn normalize_line(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['>', '│', '|'])
        .trim()
}

/// Lines of `captured` that were neither on screen before injection nor
/// an echo of the injected `prompt`.
fn fresh_output(captured: &str, baseline: &str, prompt: &str) -> String {
    let seen: HashSet<&str> = baseline
        .lines()
        .chain(prompt.lines())
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .collect();
    let kept: Vec<&str> = captured
        .lines()
        .filter(|l| match normalize_line(l) {
            // Blank lines stay, bare prompt markers go
            "" => l.trim().is_empty(),
            line => !seen.contains(line),
        })
        .collect();
    kept.join("\n").trim_matches('\n').to_string()
}

/// Fresh output that carries words, not just prompt chrome.
fn has_answer(fresh: &str) -> bool {
    fresh
        .lines()
        .any(|l| l.chars().filter(|c| c.is_alphanumeric()).count() >= 2)
}
