//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: a validated question posed to the ensemble
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod question;
