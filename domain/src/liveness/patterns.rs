//! Pattern vocabulary for screen-scraped liveness.
//!
//! Every phrase, marker and token the classifier recognizes lives here, in
//! one table. Bump [`PATTERN_TABLE_VERSION`] whenever an entry changes so
//! observations can be traced back to the vocabulary that produced them.

use super::classifier::AgentActivity;
use regex::Regex;
use std::sync::LazyLock;

pub const PATTERN_TABLE_VERSION: &str = "2026.10.1";

/// Exact status tokens and the activity each one maps to.
pub const STATE_TOKENS: &[(&str, AgentActivity)] = &[
    ("WAITING", AgentActivity::Waiting),
    ("GENERATING", AgentActivity::Generating),
    ("THINKING", AgentActivity::Thinking),
    ("ERROR", AgentActivity::Error),
    ("STALLED", AgentActivity::Stalled),
];

/// Bounds on the content that must follow an error marker.
pub const ERROR_CONTENT_MIN: usize = 10;
pub const ERROR_CONTENT_MAX: usize = 50;

/// Matches kept per error marker.
pub const MAX_MATCHES_PER_PATTERN: usize = 2;

/// Distinct error messages kept overall.
pub const MAX_ERRORS: usize = 3;

/// Rate-limit phrases. Each is anchored on word boundaries so that
/// "rate", "limit" or "429" inside unrelated text does not match.
pub static RATE_LIMIT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\brate[- ]?limit(?:s|ed|ing)?\b",
        r"(?i)\busage limits?\b",
        r"(?i)\btoo many requests\b",
        r"(?i)\bquota (?:has been |was )?exceeded\b",
        // HTTP 429 on its own: not part of a longer number, a port or a version
        r"(?m)(?:^|[^\w.:/-])429(?:$|[^\w.])",
        r"(?i)\btry again (?:later|in)\b",
        r"(?i)\byou(?:'|’)?ve hit\b[^\r\n]{0,40}?\blimit\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("rate-limit pattern must compile"))
    .collect()
});

/// Error markers, in scan order.
const ERROR_MARKERS: &[(&str, &str)] = &[
    ("error", r"\berror:"),
    ("exception", r"\bexception:"),
    ("panic", r"\bpanic:"),
    ("failed_to", r"\bfailed to\b"),
    ("connection_refused", r"\bconnection refused\b"),
    ("unauthorized", r"\bunauthorized\b"),
    ("auth_failed", r"\bauthentication failed\b"),
    (
        "signal",
        r"\b(?:SIGSEGV|SIGABRT|SIGKILL|SIGTERM|SIGBUS|segmentation fault)\b",
    ),
];

/// A named error marker followed by bounded content.
#[derive(Debug)]
pub struct ErrorPattern {
    pub name: &'static str,
    pub regex: Regex,
}

pub static ERROR_PATTERNS: LazyLock<Vec<ErrorPattern>> = LazyLock::new(|| {
    ERROR_MARKERS
        .iter()
        .map(|(name, marker)| {
            let pattern = format!(
                r"(?i){marker}[ \t:,-]*[^\s][^\r\n]{{{},{}}}",
                ERROR_CONTENT_MIN - 1,
                ERROR_CONTENT_MAX - 1
            );
            ErrorPattern {
                name,
                regex: Regex::new(&pattern).expect("error pattern must compile"),
            }
        })
        .collect()
});
