//! tmux-backed [`PaneManager`]
//!
//! Panes are addressed by their tmux pane id (`%12` becomes index 12), which
//! stays unique across windows and sessions. Pane names are pane titles.
//! Prompts go through a paste buffer so multi-line text arrives as one
//! message, followed by a single Enter. Each pane gets its own buffer, so
//! concurrent sends never paste each other's text.

use async_trait::async_trait;
use ensemble_application::{PaneError, PaneInfo, PaneManager};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const LIST_FORMAT: &str = "#{pane_id}\t#{pane_title}";

/// Lines from the bottom of a capture inspected for a status token
const STATUS_TAIL_LINES: usize = 12;

pub struct TmuxPaneManager {
    program: String,
    session: Option<String>,
    capture_lines: u32,
}

impl Default for TmuxPaneManager {
    fn default() -> Self {
        Self {
            program: "tmux".to_string(),
            session: None,
            capture_lines: 200,
        }
    }
}

impl TmuxPaneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consider panes of this session
    pub fn with_session(mut self, session: Option<String>) -> Self {
        self.session = session;
        self
    }

    pub fn with_capture_lines(mut self, lines: u32) -> Self {
        self.capture_lines = lines.max(1);
        self
    }

    /// Run tmux with `args`, optionally feeding `stdin`, and return stdout.
    async fn tmux(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<String, PaneError> {
        debug!("{} {}", self.program, args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = cmd.spawn()?;
        if let (Some(bytes), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(bytes).await?;
            pipe.shutdown().await?;
        }
        let output = child.wait_with_output().await?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if is_missing_target(&stderr) {
            Err(PaneError::NotFound(stderr))
        } else {
            Err(PaneError::CommandFailed(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                output.status.code().unwrap_or(-1),
                stderr
            )))
        }
    }
}

fn is_missing_target(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("can't find pane")
        || lower.contains("can't find session")
        || lower.contains("can't find window")
}

fn pane_target(index: u32) -> String {
    format!("%{index}")
}

fn buffer_name(index: u32) -> String {
    format!("pane-ensemble-{index}")
}

/// Parse `list-panes` output in [`LIST_FORMAT`].
fn parse_pane_list(output: &str) -> Vec<PaneInfo> {
    output
        .lines()
        .filter_map(|line| {
            let (id, title) = line.split_once('\t')?;
            let index = id.trim().strip_prefix('%')?.parse().ok()?;
            Some(PaneInfo::new(index, title.trim()))
        })
        .collect()
}

/// Infer a status token from the visible bottom of a pane.
///
/// Recognizes the interrupt hint shown while an agent generates, its
/// thinking indicator, and an empty input prompt near the bottom (box
/// borders ignored).
pub fn infer_status_token(captured: &str) -> Option<&'static str> {
    let tail: Vec<&str> = captured
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .rev()
        .take(STATUS_TAIL_LINES)
        .collect();
    if tail.is_empty() {
        return None;
    }

    let lower: Vec<String> = tail.iter().map(|l| l.to_lowercase()).collect();
    if lower.iter().any(|l| l.contains("esc to interrupt")) {
        return Some("GENERATING");
    }
    if lower
        .iter()
        .any(|l| l.starts_with("thinking") || l.contains("✻ thinking") || l.contains("(thinking"))
    {
        return Some("THINKING");
    }
    let waiting = tail
        .iter()
        .filter(|l| !is_border(l))
        .take(3)
        .any(|l| is_empty_prompt(l));
    waiting.then_some("WAITING")
}

/// Input box borders drawn around a prompt
fn is_border(line: &str) -> bool {
    line.chars()
        .all(|c| matches!(c, '─' | '╭' | '╮' | '╰' | '╯' | '│' | '-' | ' '))
}

fn is_empty_prompt(line: &str) -> bool {
    let inner = line.trim_matches(|c: char| c == '│' || c == '|' || c.is_whitespace());
    matches!(inner, ">" | "❯" | "›" | "$" | "%")
}

#[async_trait]
impl PaneManager for TmuxPaneManager {
    async fn list_panes(&self) -> Result<Vec<PaneInfo>, PaneError> {
        let output = match &self.session {
            Some(session) => {
                self.tmux(&["list-panes", "-s", "-t", session, "-F", LIST_FORMAT], None)
                    .await?
            }
            None => self.tmux(&["list-panes", "-a", "-F", LIST_FORMAT], None).await?,
        };
        Ok(parse_pane_list(&output))
    }

    async fn send_text(&self, index: u32, text: &str) -> Result<(), PaneError> {
        let target = pane_target(index);
        let buffer = buffer_name(index);
        self.tmux(&["load-buffer", "-b", &buffer, "-"], Some(text.as_bytes()))
            .await?;
        self.tmux(&["paste-buffer", "-d", "-b", &buffer, "-t", &target], None)
            .await?;
        self.tmux(&["send-keys", "-t", &target, "Enter"], None).await?;
        Ok(())
    }

    async fn capture_text(&self, index: u32) -> Result<String, PaneError> {
        let start = format!("-{}", self.capture_lines);
        self.tmux(
            &["capture-pane", "-p", "-J", "-t", &pane_target(index), "-S", &start],
            None,
        )
        .await
    }

    fn status_token(&self, _index: u32, captured: &str) -> Option<String> {
        infer_status_token(captured).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Pane listing ====================

    #[test]
    fn test_parse_pane_list() {
        let output = "%0\tdemo__claude_1\n%7\tdemo__claude_2\n%12\t\nnot a pane\n";
        let panes = parse_pane_list(output);
        assert_eq!(
            panes,
            vec![
                PaneInfo::new(0, "demo__claude_1"),
                PaneInfo::new(7, "demo__claude_2"),
                PaneInfo::new(12, ""),
            ]
        );
    }

    #[test]
    fn test_missing_target_detection() {
        assert!(is_missing_target("can't find pane: %99"));
        assert!(is_missing_target("can't find session: nope"));
        assert!(!is_missing_target("no server running on /tmp/tmux-0/default"));
    }

    // ==================== Status inference ====================

    #[test]
    fn test_generating_hint() {
        let text = "Reading files...\n✳ Pondering… (12s · esc to interrupt)\n";
        assert_eq!(infer_status_token(text), Some("GENERATING"));
    }

    #[test]
    fn test_thinking_indicator() {
        assert_eq!(infer_status_token("output\n✻ Thinking…\n"), Some("THINKING"));
    }

    #[test]
    fn test_empty_prompt_is_waiting() {
        let boxed = "Here is my analysis.\n\n╭──────╮\n│ >    │\n╰──────╯\n  ? for shortcuts\n";
        assert_eq!(infer_status_token("done\n> \n"), Some("WAITING"));
        assert_eq!(infer_status_token(boxed), Some("WAITING"));
        assert_eq!(infer_status_token("> typed but not sent\nmore output"), None);
    }

    #[test]
    fn test_no_signal() {
        assert_eq!(infer_status_token(""), None);
        assert_eq!(infer_status_token("compiling crate foo"), None);
    }

    // ==================== Sending ====================

    /// A stand-in `tmux` that appends its arguments and stdin to `log`.
    #[cfg(unix)]
    fn recording_tmux(dir: &std::path::Path, log: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("tmux");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nline=\"$*\"\nif [ \"$1\" = load-buffer ]; then line=\"$line $(cat)\"; fi\necho \"$line\" >> '{}'\n",
                log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_concurrent_sends_use_separate_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let manager = TmuxPaneManager {
            program: recording_tmux(dir.path(), &log),
            ..TmuxPaneManager::default()
        };

        let (a, b, c) = tokio::join!(
            manager.send_text(1, "PROMPT-FOR-1"),
            manager.send_text(2, "PROMPT-FOR-2"),
            manager.send_text(3, "PROMPT-FOR-3"),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let calls = std::fs::read_to_string(&log).unwrap();
        for i in 1..=3 {
            assert!(
                calls.contains(&format!("load-buffer -b pane-ensemble-{i} - PROMPT-FOR-{i}")),
                "{calls}"
            );
            assert!(
                calls.contains(&format!("paste-buffer -d -b pane-ensemble-{i} -t %{i}")),
                "{calls}"
            );
        }
    }

    #[test]
    fn test_buffer_per_pane() {
        assert_eq!(buffer_name(7), "pane-ensemble-7");
        assert_ne!(buffer_name(1), buffer_name(2));
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let manager = TmuxPaneManager {
            program: "definitely-not-tmux-binary".to_string(),
            ..TmuxPaneManager::default()
        };
        let err = manager.list_panes().await.unwrap_err();
        assert!(matches!(err, PaneError::Io(_)));
    }
}
