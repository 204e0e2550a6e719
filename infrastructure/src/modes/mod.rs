//! Mode catalog loading from embedded, user and project sources

mod loader;

pub use loader::{ModeLoadError, ModeLoader, parse_modes};
