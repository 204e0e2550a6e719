//! Prompt domain
//!
//! Text injected into agent panes and handed to the synthesis step.

mod template;

pub use template::PromptTemplate;
