//! In-process fakes for the application ports.

use crate::ports::pane_manager::{PaneError, PaneInfo, PaneManager};
use crate::ports::preset_storage::{ImportSource, PresetCodec, PresetIoError, PresetStorage};
use crate::ports::synthesis::{EnsembleOutcome, SynthesisError, SynthesisHandler};
use async_trait::async_trait;
use ensemble_domain::PresetDocument;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

// ==================== Presets ====================

#[derive(Default)]
pub struct MemoryStorage {
    pub local: Mutex<HashMap<PathBuf, Vec<u8>>>,
    pub remote: Mutex<HashMap<String, Vec<u8>>>,
    pub imported: Mutex<Option<Vec<u8>>>,
    pub fail_imported_writes: bool,
}

impl MemoryStorage {
    pub fn with_local(self, path: &str, bytes: Vec<u8>) -> Self {
        self.local.lock().unwrap().insert(PathBuf::from(path), bytes);
        self
    }

    pub fn with_remote(self, url: &str, bytes: Vec<u8>) -> Self {
        self.remote.lock().unwrap().insert(url.to_string(), bytes);
        self
    }

    pub fn local_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.local.lock().unwrap().get(Path::new(path)).cloned()
    }
}

#[async_trait]
impl PresetStorage for MemoryStorage {
    async fn fetch(&self, source: &ImportSource) -> Result<Vec<u8>, PresetIoError> {
        let found = match source {
            ImportSource::Local(path) => self.local.lock().unwrap().get(path).cloned(),
            ImportSource::Remote(url) => self.remote.lock().unwrap().get(url).cloned(),
        };
        found.ok_or_else(|| PresetIoError::Storage(format!("{source} not found")))
    }

    async fn exists(&self, path: &Path) -> bool {
        self.local.lock().unwrap().contains_key(path)
    }

    async fn write(&self, path: &Path, bytes: &[u8], overwrite: bool) -> Result<(), PresetIoError> {
        let mut local = self.local.lock().unwrap();
        if local.contains_key(path) && !overwrite {
            return Err(PresetIoError::AlreadyExists(path.display().to_string()));
        }
        local.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    async fn read_imported(&self) -> Result<Option<Vec<u8>>, PresetIoError> {
        Ok(self.imported.lock().unwrap().clone())
    }

    async fn write_imported(&self, bytes: &[u8]) -> Result<(), PresetIoError> {
        if self.fail_imported_writes {
            return Err(PresetIoError::Storage("disk full".to_string()));
        }
        *self.imported.lock().unwrap() = Some(bytes.to_vec());
        Ok(())
    }
}

/// JSON stand-in for the TOML codec.
pub struct JsonCodec;

impl PresetCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PresetDocument, PresetIoError> {
        serde_json::from_slice(bytes).map_err(|e| PresetIoError::Malformed(e.to_string()))
    }

    fn encode(&self, document: &PresetDocument) -> Result<Vec<u8>, PresetIoError> {
        serde_json::to_vec(document).map_err(|e| PresetIoError::Malformed(e.to_string()))
    }

    fn decode_collection(&self, bytes: &[u8]) -> Result<Vec<PresetDocument>, PresetIoError> {
        serde_json::from_slice(bytes).map_err(|e| PresetIoError::Malformed(e.to_string()))
    }

    fn encode_collection(&self, documents: &[PresetDocument]) -> Result<Vec<u8>, PresetIoError> {
        serde_json::to_vec(documents).map_err(|e| PresetIoError::Malformed(e.to_string()))
    }
}

// ==================== Panes ====================

/// Scripted pane: what a capture returns and which status token it reports.
#[derive(Debug, Clone, Default)]
pub struct FakePane {
    pub title: String,
    pub text: String,
    pub token: Option<String>,
    pub sent: Vec<String>,
}

#[derive(Default)]
pub struct FakePaneManager {
    pub panes: Mutex<HashMap<u32, FakePane>>,
    pub fail_send: bool,
}

impl FakePaneManager {
    pub fn with_panes(titles: &[&str]) -> Self {
        let panes = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                (
                    i as u32,
                    FakePane {
                        title: t.to_string(),
                        ..FakePane::default()
                    },
                )
            })
            .collect();
        Self {
            panes: Mutex::new(panes),
            fail_send: false,
        }
    }

    pub fn set_state(&self, index: u32, token: Option<&str>, text: &str) {
        if let Some(pane) = self.panes.lock().unwrap().get_mut(&index) {
            pane.token = token.map(str::to_string);
            pane.text = text.to_string();
        }
    }

    pub fn set_all(&self, token: Option<&str>, text: &str) {
        for pane in self.panes.lock().unwrap().values_mut() {
            pane.token = token.map(str::to_string);
            pane.text = text.to_string();
        }
    }

    pub fn remove(&self, index: u32) {
        self.panes.lock().unwrap().remove(&index);
    }

    pub fn sent(&self, index: u32) -> Vec<String> {
        self.panes
            .lock()
            .unwrap()
            .get(&index)
            .map(|p| p.sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaneManager for FakePaneManager {
    async fn list_panes(&self) -> Result<Vec<PaneInfo>, PaneError> {
        let mut panes: Vec<_> = self
            .panes
            .lock()
            .unwrap()
            .iter()
            .map(|(i, p)| PaneInfo::new(*i, p.title.clone()))
            .collect();
        panes.sort_by_key(|p| p.index);
        Ok(panes)
    }

    async fn send_text(&self, index: u32, text: &str) -> Result<(), PaneError> {
        if self.fail_send {
            return Err(PaneError::CommandFailed("send-keys exited with 1".to_string()));
        }
        let mut panes = self.panes.lock().unwrap();
        let pane = panes
            .get_mut(&index)
            .ok_or_else(|| PaneError::NotFound(index.to_string()))?;
        pane.sent.push(text.to_string());
        Ok(())
    }

    async fn capture_text(&self, index: u32) -> Result<String, PaneError> {
        self.panes
            .lock()
            .unwrap()
            .get(&index)
            .map(|p| p.text.clone())
            .ok_or_else(|| PaneError::NotFound(index.to_string()))
    }

    fn status_token(&self, index: u32, _captured: &str) -> Option<String> {
        self.panes
            .lock()
            .unwrap()
            .get(&index)
            .and_then(|p| p.token.clone())
    }
}

// ==================== Synthesis ====================

#[derive(Default)]
pub struct RecordingSynthesis {
    pub calls: AtomicUsize,
    pub last: Mutex<Option<EnsembleOutcome>>,
}

impl RecordingSynthesis {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesisHandler for RecordingSynthesis {
    async fn synthesize(&self, outcome: &EnsembleOutcome) -> Result<(), SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(outcome.clone());
        Ok(())
    }
}
