//! Progress reporting for ensemble runs

use colored::Colorize;
use ensemble_application::EnsembleProgressNotifier;
use ensemble_domain::{AssignmentStatus, SessionSnapshot};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per assignment and an overall bar
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<Vec<ProgressBar>>,
    overall: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(Vec::new()),
            overall: Mutex::new(None),
        }
    }

    fn overall_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn status_message(status: AssignmentStatus, reason: Option<&str>) -> String {
        let label = format!("{} {}", status.icon(), status);
        match (status, reason) {
            (AssignmentStatus::Done, _) => label.green().to_string(),
            (AssignmentStatus::Error, Some(reason)) => format!("{} ({})", label.red(), reason),
            (AssignmentStatus::Error, None) => label.red().to_string(),
            _ => label,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EnsembleProgressNotifier for ProgressReporter {
    fn on_run_start(&self, snapshot: &SessionSnapshot) {
        let overall = self
            .multi
            .add(ProgressBar::new(snapshot.assignments.len() as u64));
        overall.set_style(Self::overall_style());
        overall.set_prefix(snapshot.session_name.clone());
        overall.set_message("Starting...");

        let bars: Vec<ProgressBar> = snapshot
            .assignments
            .iter()
            .map(|a| {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix(format!("{:<4} {}", a.code, a.pane_name));
                pb.set_message(Self::status_message(a.status, a.reason.as_deref()));
                pb.enable_steady_tick(Duration::from_millis(120));
                pb
            })
            .collect();

        if let Ok(mut slot) = self.bars.lock() {
            *slot = bars;
        }
        if let Ok(mut slot) = self.overall.lock() {
            *slot = Some(overall);
        }
    }

    fn on_transition(
        &self,
        index: usize,
        _mode_id: &str,
        status: AssignmentStatus,
        reason: Option<&str>,
    ) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(index)
        {
            let message = Self::status_message(status, reason);
            if status.is_terminal() {
                pb.finish_with_message(message);
            } else {
                pb.set_message(message);
            }
        }
        if status.is_terminal()
            && let Ok(overall) = self.overall.lock()
            && let Some(pb) = overall.as_ref()
        {
            pb.inc(1);
        }
    }

    fn on_run_complete(&self, snapshot: &SessionSnapshot) {
        if let Ok(bars) = self.bars.lock() {
            for pb in bars.iter().filter(|pb| !pb.is_finished()) {
                pb.finish();
            }
        }
        if let Ok(mut overall) = self.overall.lock()
            && let Some(pb) = overall.take()
        {
            let failed = snapshot.count(AssignmentStatus::Error);
            let message = if failed == 0 {
                "complete!".green().to_string()
            } else {
                format!("complete ({} failed)", failed).yellow().to_string()
            };
            pb.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl EnsembleProgressNotifier for SimpleProgress {
    fn on_run_start(&self, snapshot: &SessionSnapshot) {
        println!(
            "{} {} ({} panes)",
            "->".cyan(),
            snapshot.session_name.bold(),
            snapshot.assignments.len()
        );
    }

    fn on_transition(
        &self,
        _index: usize,
        mode_id: &str,
        status: AssignmentStatus,
        reason: Option<&str>,
    ) {
        match (status, reason) {
            (AssignmentStatus::Done, _) => println!("  {} {}", "v".green(), mode_id),
            (AssignmentStatus::Error, reason) => println!(
                "  {} {} ({})",
                "x".red(),
                mode_id,
                reason.unwrap_or("failed")
            ),
            (status, _) => println!("  {} {} {}", "..".dimmed(), mode_id, status),
        }
    }

    fn on_run_complete(&self, _snapshot: &SessionSnapshot) {
        println!();
    }
}
