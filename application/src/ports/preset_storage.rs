//! Preset storage and codec ports
//!
//! Storage moves raw bytes (local files, remote URLs, the imported-presets
//! file); the codec turns bytes into [`PresetDocument`]s and back. Keeping
//! them apart lets the import path verify checksums on the raw bytes before
//! any decoding happens.

use async_trait::async_trait;
use ensemble_domain::{DomainError, PresetDocument};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while importing, exporting or persisting presets
#[derive(Error, Debug)]
pub enum PresetIoError {
    #[error("remote import not allowed: {0} (pass --allow-remote to permit it)")]
    RemoteNotAllowed(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("malformed preset document: {0}")]
    Malformed(String),

    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(String),

    #[error("preset name {0:?} is reserved by a built-in preset (use --force to shadow it)")]
    ReservedName(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<std::io::Error> for PresetIoError {
    fn from(e: std::io::Error) -> Self {
        PresetIoError::Storage(e.to_string())
    }
}

/// Where a preset is imported from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    Local(PathBuf),
    Remote(String),
}

impl ImportSource {
    /// `http://` and `https://` sources are remote, everything else is a path.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImportSource::Remote(trimmed.to_string())
        } else {
            ImportSource::Local(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImportSource::Remote(_))
    }
}

impl std::fmt::Display for ImportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportSource::Local(path) => write!(f, "{}", path.display()),
            ImportSource::Remote(url) => f.write_str(url),
        }
    }
}

/// Byte-level preset storage
#[async_trait]
pub trait PresetStorage: Send + Sync {
    /// Read the raw bytes of a preset source
    async fn fetch(&self, source: &ImportSource) -> Result<Vec<u8>, PresetIoError>;

    async fn exists(&self, path: &Path) -> bool;

    /// Write `bytes` to `path`. Fails with `AlreadyExists` when the file is
    /// present and `overwrite` is false.
    async fn write(&self, path: &Path, bytes: &[u8], overwrite: bool) -> Result<(), PresetIoError>;

    /// Contents of the imported-presets file, `None` if it does not exist yet
    async fn read_imported(&self) -> Result<Option<Vec<u8>>, PresetIoError>;

    /// Replace the imported-presets file
    async fn write_imported(&self, bytes: &[u8]) -> Result<(), PresetIoError>;
}

/// Serialized preset format
pub trait PresetCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<PresetDocument, PresetIoError>;

    fn encode(&self, document: &PresetDocument) -> Result<Vec<u8>, PresetIoError>;

    /// Decode the imported-presets file
    fn decode_collection(&self, bytes: &[u8]) -> Result<Vec<PresetDocument>, PresetIoError>;

    fn encode_collection(&self, documents: &[PresetDocument]) -> Result<Vec<u8>, PresetIoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_source_parse() {
        assert!(ImportSource::parse("https://example.com/p.toml").is_remote());
        assert!(ImportSource::parse("HTTP://example.com/p.toml").is_remote());
        assert_eq!(
            ImportSource::parse("./presets/p.toml"),
            ImportSource::Local(PathBuf::from("./presets/p.toml"))
        );
        assert!(!ImportSource::parse("httpfile.toml").is_remote());
    }

    #[test]
    fn test_error_messages_carry_stable_phrases() {
        let e = PresetIoError::RemoteNotAllowed("https://x".to_string());
        assert!(e.to_string().contains("remote import not allowed"));
        let e = PresetIoError::ChecksumMismatch {
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        assert!(e.to_string().contains("checksum mismatch"));
    }
}
