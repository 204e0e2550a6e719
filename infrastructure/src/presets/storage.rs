//! Filesystem and HTTP backed preset storage

use async_trait::async_trait;
use ensemble_application::{ImportSource, PresetIoError, PresetStorage};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Maximum accepted preset document size (1 MB)
const MAX_DOCUMENT_SIZE: usize = 1024 * 1024;

pub struct FilePresetStorage {
    imported_path: Option<PathBuf>,
    #[cfg(feature = "remote-import")]
    http_client: reqwest::Client,
}

impl FilePresetStorage {
    /// Storage persisting imported presets at `imported_path`. With `None`
    /// imports live only for the current process.
    pub fn new(imported_path: Option<PathBuf>) -> Self {
        Self {
            imported_path,
            #[cfg(feature = "remote-import")]
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn imported_path(&self) -> Option<&Path> {
        self.imported_path.as_deref()
    }

    async fn read_local(&self, path: &Path) -> Result<Vec<u8>, PresetIoError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PresetIoError::Storage(format!("{}: {}", path.display(), e)))?;
        check_size(bytes.len())?;
        Ok(bytes)
    }

    #[cfg(feature = "remote-import")]
    async fn read_remote(&self, url: &str) -> Result<Vec<u8>, PresetIoError> {
        let response = self
            .http_client
            .get(url)
            .header(
                "User-Agent",
                concat!("pane-ensemble/", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await
            .map_err(|e| PresetIoError::Storage(format!("Failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PresetIoError::Storage(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }
        if response.content_length().unwrap_or(0) > MAX_DOCUMENT_SIZE as u64 {
            return Err(PresetIoError::Storage(format!(
                "Response too large (max: {MAX_DOCUMENT_SIZE} bytes)"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PresetIoError::Storage(format!("Failed to read body: {e}")))?;
        check_size(bytes.len())?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "remote-import"))]
    async fn read_remote(&self, url: &str) -> Result<Vec<u8>, PresetIoError> {
        Err(PresetIoError::Storage(format!(
            "{url}: built without remote-import support"
        )))
    }
}

fn check_size(len: usize) -> Result<(), PresetIoError> {
    if len > MAX_DOCUMENT_SIZE {
        return Err(PresetIoError::Storage(format!(
            "Preset document too large: {len} bytes (max: {MAX_DOCUMENT_SIZE} bytes)"
        )));
    }
    Ok(())
}

async fn ensure_parent(path: &Path) -> Result<(), PresetIoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

#[async_trait]
impl PresetStorage for FilePresetStorage {
    async fn fetch(&self, source: &ImportSource) -> Result<Vec<u8>, PresetIoError> {
        debug!("Fetching preset from {}", source);
        match source {
            ImportSource::Local(path) => self.read_local(path).await,
            ImportSource::Remote(url) => self.read_remote(url).await,
        }
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn write(&self, path: &Path, bytes: &[u8], overwrite: bool) -> Result<(), PresetIoError> {
        ensure_parent(path).await?;
        if overwrite {
            tokio::fs::write(path, bytes).await?;
            return Ok(());
        }
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    PresetIoError::AlreadyExists(path.display().to_string())
                }
                _ => PresetIoError::from(e),
            })?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_imported(&self) -> Result<Option<Vec<u8>>, PresetIoError> {
        let Some(path) = &self.imported_path else {
            return Ok(None);
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PresetIoError::Storage(format!("{}: {}", path.display(), e))),
        }
    }

    async fn write_imported(&self, bytes: &[u8]) -> Result<(), PresetIoError> {
        let Some(path) = &self.imported_path else {
            return Ok(());
        };
        ensure_parent(path).await?;
        // Atomic replace
        let tmp = path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!("Persisted imported presets to {}", path.display());
        Ok(())
    }
}
