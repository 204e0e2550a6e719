//! Liveness classification
//!
//! Agents expose no progress API, so their state is inferred from the text
//! visible in their pane. The vocabulary is kept in [`patterns`], apart from
//! the lifecycle state machine that consumes the result.

pub mod classifier;
pub mod patterns;

pub use classifier::{
    AgentActivity, LivenessSignal, PaneObservation, classify_state, detect_rate_limit,
    extract_errors, observe,
};
pub use patterns::PATTERN_TABLE_VERSION;
