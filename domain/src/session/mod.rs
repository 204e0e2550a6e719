//! Ensemble sessions and the assignment lifecycle.

pub mod assignment;
pub mod entities;
pub mod lifecycle;
pub mod snapshot;

pub use assignment::ModeAssignment;
pub use entities::{AssignmentSpec, EnsembleSession, default_pane_name};
pub use lifecycle::{AssignmentEvent, AssignmentStatus, Transition, transition};
pub use snapshot::{AssignmentView, SessionSnapshot};
