//! Progress notification port
//!
//! Defines the interface for reporting progress during an ensemble run.

use ensemble_domain::{AssignmentStatus, SessionSnapshot};

/// Callback for progress updates during an ensemble run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console bars, JSON lines, ...)
pub trait EnsembleProgressNotifier: Send + Sync {
    /// Called once, before the first poll
    fn on_run_start(&self, snapshot: &SessionSnapshot);

    /// Called when an assignment changes status
    fn on_transition(&self, index: usize, mode_id: &str, status: AssignmentStatus, reason: Option<&str>);

    /// Called once, when every assignment is terminal
    fn on_run_complete(&self, snapshot: &SessionSnapshot);

    /// Called after every poll
    fn on_poll(&self, _snapshot: &SessionSnapshot) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl EnsembleProgressNotifier for NoProgress {
    fn on_run_start(&self, _snapshot: &SessionSnapshot) {}
    fn on_transition(&self, _index: usize, _mode_id: &str, _status: AssignmentStatus, _reason: Option<&str>) {}
    fn on_run_complete(&self, _snapshot: &SessionSnapshot) {}
}
