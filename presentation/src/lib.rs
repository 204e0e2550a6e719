//! Presentation layer for pane-ensemble
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the console synthesis handler.

pub mod cli;
pub mod output;
pub mod progress;
pub mod synthesis;

// Re-export commonly used types
pub use cli::commands::{BudgetArgs, Cli, Commands, OutputFormat, SelectionArgs, TierArg};
pub use output::{ConsoleFormatter, JsonFormatter, OutputFormatter, formatter_for};
pub use progress::{ProgressReporter, SimpleProgress};
pub use synthesis::ConsoleSynthesis;
