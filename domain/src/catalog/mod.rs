//! Reasoning mode catalog
//!
//! A [`ModeCatalog`] is an immutable registry of [`ReasoningMode`]s keyed by
//! id and by short code. Catalogs are rebuilt wholesale when sources change;
//! nothing mutates a catalog in place.

pub mod embedded;
pub mod mode;
pub mod mode_catalog;

pub use embedded::{CATALOG_VERSION, default_catalog, embedded_modes};
pub use mode::{ModeCategory, ModeSource, ModeTier, ReasoningMode, looks_like_code};
pub use mode_catalog::ModeCatalog;
