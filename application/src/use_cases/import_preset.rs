//! Import a preset from a local file or a remote URL.
//!
//! Gate order matters:
//!
//! 1. remote sources need an explicit opt-in
//! 2. a pinned SHA-256 is compared against the raw bytes
//! 3. only then are the bytes decoded, validated and resolved
//!
//! The registry swap and the write of the imported-presets file happen under
//! the registry writer lock. If anything fails the registry is left as it was.

use crate::ports::preset_storage::{ImportSource, PresetCodec, PresetIoError, PresetStorage};
use crate::registry::SharedRegistry;
use ensemble_domain::{PresetDocument, PresetRegistry, PresetSource};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Accepts `abc…`, `ABC…` and `sha256:abc…`.
pub fn normalize_checksum(pinned: &str) -> String {
    let trimmed = pinned.trim();
    let stripped = trimmed
        .strip_prefix("sha256:")
        .or_else(|| trimmed.strip_prefix("SHA256:"))
        .unwrap_or(trimmed);
    stripped.to_ascii_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct ImportPresetInput {
    /// Path or `http(s)://` URL
    pub source: String,
    pub allow_remote: bool,
    /// Expected SHA-256 of the raw document bytes
    pub sha256: Option<String>,
    /// Register under this name instead of the document's
    pub rename: Option<String>,
    /// Allow shadowing a built-in preset
    pub force: bool,
}

impl ImportPresetInput {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    pub fn with_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.sha256 = Some(sha256.into());
        self
    }

    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPresetOutput {
    pub name: String,
    pub mode_ids: Vec<String>,
    /// A preset with the same name existed and was replaced
    pub replaced: bool,
    pub sha256: String,
}

pub struct ImportPresetUseCase {
    registry: Arc<SharedRegistry>,
    storage: Arc<dyn PresetStorage>,
    codec: Arc<dyn PresetCodec>,
}

impl ImportPresetUseCase {
    pub fn new(
        registry: Arc<SharedRegistry>,
        storage: Arc<dyn PresetStorage>,
        codec: Arc<dyn PresetCodec>,
    ) -> Self {
        Self {
            registry,
            storage,
            codec,
        }
    }

    pub async fn execute(&self, input: ImportPresetInput) -> Result<ImportPresetOutput, PresetIoError> {
        let source = ImportSource::parse(&input.source);
        if source.is_remote() && !input.allow_remote {
            warn!("Rejected remote preset import from {}", source);
            return Err(PresetIoError::RemoteNotAllowed(source.to_string()));
        }

        let bytes = self.storage.fetch(&source).await?;
        let actual = sha256_hex(&bytes);
        if let Some(pinned) = &input.sha256 {
            let expected = normalize_checksum(pinned);
            if expected != actual {
                warn!("Checksum mismatch for {}: expected {}, got {}", source, expected, actual);
                return Err(PresetIoError::ChecksumMismatch { expected, actual });
            }
            debug!("Checksum verified for {}", source);
        }

        let mut document = self.codec.decode(&bytes)?;
        if let Some(name) = &input.rename {
            document = document.with_name(name.clone());
        }
        let preset = document.into_preset(PresetSource::Imported)?;
        let resolved = preset.resolve(&self.registry.catalog())?;

        let guard = self.registry.lock_writer().await;
        let current = self.registry.presets();
        let existing = current.get(&preset.name);
        if let Some(existing) = existing
            && existing.source == PresetSource::Embedded
            && !input.force
        {
            return Err(PresetIoError::ReservedName(preset.name.clone()));
        }
        let replaced = existing.is_some();
        let name = preset.name.clone();
        let next = current.with_preset(preset);

        self.persist(&next).await?;
        self.registry.replace_presets(&guard, next);
        drop(guard);

        info!(
            "Imported preset {} ({} modes) from {}",
            name,
            resolved.mode_ids.len(),
            source
        );
        Ok(ImportPresetOutput {
            name,
            mode_ids: resolved.mode_ids,
            replaced,
            sha256: actual,
        })
    }

    /// Merge the persisted imported presets into the registry. Returns how
    /// many were loaded. Invalid documents are skipped with a warning.
    /// Presets whose modes no longer resolve are kept and reported; they fail
    /// when used.
    pub async fn load_persisted(&self) -> Result<usize, PresetIoError> {
        let Some(bytes) = self.storage.read_imported().await? else {
            return Ok(0);
        };
        let documents = self.codec.decode_collection(&bytes)?;

        let guard = self.registry.lock_writer().await;
        let catalog = self.registry.catalog();
        let mut next: PresetRegistry = (*self.registry.presets()).clone();
        let mut loaded = 0;
        for document in documents {
            let name = document.name.clone();
            let preset = match document.into_preset(PresetSource::Imported) {
                Ok(preset) => preset,
                Err(e) => {
                    warn!("Skipping imported preset {:?}: {}", name, e);
                    continue;
                }
            };
            if let Err(e) = preset.resolve(&catalog) {
                warn!("Imported preset {} no longer resolves: {}", preset.name, e);
            }
            next = next.with_preset(preset);
            loaded += 1;
        }
        self.registry.replace_presets(&guard, next);
        debug!("Loaded {} imported presets", loaded);
        Ok(loaded)
    }

    async fn persist(&self, registry: &PresetRegistry) -> Result<(), PresetIoError> {
        let documents: Vec<PresetDocument> = registry
            .imported()
            .into_iter()
            .map(PresetDocument::from_preset)
            .collect();
        let bytes = self.codec.encode_collection(&documents)?;
        self.storage.write_imported(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{JsonCodec, MemoryStorage};
    use ensemble_domain::{
        BudgetConfig, DomainError, SynthesisConfig, SynthesisStrategy, default_catalog,
        default_registry,
    };

    const URL: &str = "https://presets.example.com/triage.json";

    fn document(name: &str, modes: &[&str]) -> Vec<u8> {
        let doc = PresetDocument {
            schema_version: 1,
            name: name.to_string(),
            display_name: String::new(),
            description: "triage".to_string(),
            tags: vec!["ops".to_string()],
            modes: modes.iter().map(|s| s.to_string()).collect(),
            allow_advanced: false,
            synthesis: SynthesisConfig::with_strategy(SynthesisStrategy::Voting),
            budget: Some(BudgetConfig::new(5_000, 15_000)),
        };
        serde_json::to_vec(&doc).unwrap()
    }

    fn setup(storage: MemoryStorage) -> (Arc<SharedRegistry>, Arc<MemoryStorage>, ImportPresetUseCase) {
        let registry = Arc::new(SharedRegistry::new(
            default_catalog().unwrap(),
            default_registry().unwrap(),
        ));
        let storage = Arc::new(storage);
        let use_case = ImportPresetUseCase::new(
            Arc::clone(&registry),
            Arc::clone(&storage) as Arc<dyn PresetStorage>,
            Arc::new(JsonCodec),
        );
        (registry, storage, use_case)
    }

    // ==================== Remote gate ====================

    #[tokio::test]
    async fn test_remote_without_opt_in_fails() {
        let (registry, _, use_case) =
            setup(MemoryStorage::default().with_remote(URL, document("triage", &["A1"])));
        let err = use_case.execute(ImportPresetInput::new(URL)).await.unwrap_err();
        assert!(err.to_string().contains("remote import not allowed"));
        assert!(registry.presets().get("triage").is_none());
    }

    #[tokio::test]
    async fn test_remote_with_wrong_checksum_fails() {
        let (registry, storage, use_case) =
            setup(MemoryStorage::default().with_remote(URL, document("triage", &["A1"])));
        let input = ImportPresetInput::new(URL)
            .with_allow_remote(true)
            .with_sha256("0".repeat(64));
        let err = use_case.execute(input).await.unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
        assert!(registry.presets().get("triage").is_none());
        assert!(storage.imported.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checksum_checked_before_decoding() {
        let garbage = b"not a preset at all".to_vec();
        let (_, _, use_case) = setup(MemoryStorage::default().with_remote(URL, garbage));
        let input = ImportPresetInput::new(URL)
            .with_allow_remote(true)
            .with_sha256("f".repeat(64));
        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(err, PresetIoError::ChecksumMismatch { .. }));
    }

    #[tokio::test]
    async fn test_remote_with_correct_checksum_succeeds() {
        let bytes = document("triage", &["A1", "root-cause"]);
        let pinned = format!("sha256:{}", sha256_hex(&bytes).to_uppercase());
        let (registry, storage, use_case) =
            setup(MemoryStorage::default().with_remote(URL, bytes));
        let input = ImportPresetInput::new(URL)
            .with_allow_remote(true)
            .with_sha256(pinned);
        let output = use_case.execute(input).await.unwrap();

        assert_eq!(output.name, "triage");
        assert_eq!(output.mode_ids, vec!["deductive", "root-cause"]);
        assert!(!output.replaced);
        let preset = registry.presets().get("triage").cloned().unwrap();
        assert_eq!(preset.source, PresetSource::Imported);
        assert!(storage.imported.lock().unwrap().is_some());
    }

    // ==================== Local imports ====================

    #[tokio::test]
    async fn test_local_import_always_allowed() {
        let (registry, _, use_case) =
            setup(MemoryStorage::default().with_local("triage.json", document("triage", &["A1"])));
        use_case
            .execute(ImportPresetInput::new("triage.json"))
            .await
            .unwrap();
        assert!(registry.presets().get("triage").is_some());
    }

    #[tokio::test]
    async fn test_malformed_document_leaves_registry_unchanged() {
        let (registry, _, use_case) =
            setup(MemoryStorage::default().with_local("bad.json", b"{".to_vec()));
        let before = registry.presets();
        let err = use_case
            .execute(ImportPresetInput::new("bad.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PresetIoError::Malformed(_)));
        assert_eq!(*registry.presets(), *before);
    }

    #[tokio::test]
    async fn test_unresolved_mode_fails() {
        let (registry, _, use_case) = setup(
            MemoryStorage::default().with_local("p.json", document("triage", &["A1", "telepathy"])),
        );
        let err = use_case
            .execute(ImportPresetInput::new("p.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PresetIoError::Domain(DomainError::UnresolvedModeRef { .. })
        ));
        assert!(registry.presets().get("triage").is_none());
    }

    #[tokio::test]
    async fn test_builtin_name_requires_force() {
        let (registry, _, use_case) =
            setup(MemoryStorage::default().with_local("p.json", document("bug-hunt", &["A1"])));
        let err = use_case
            .execute(ImportPresetInput::new("p.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PresetIoError::ReservedName(_)));
        assert_eq!(
            registry.presets().get("bug-hunt").unwrap().source,
            PresetSource::Embedded
        );

        let output = use_case
            .execute(ImportPresetInput::new("p.json").with_force(true))
            .await
            .unwrap();
        assert!(output.replaced);
        assert_eq!(
            registry.presets().get("bug-hunt").unwrap().source,
            PresetSource::Imported
        );
    }

    #[tokio::test]
    async fn test_reimport_replaces_wholesale() {
        let storage = MemoryStorage::default()
            .with_local("v1.json", document("triage", &["A1", "B1"]))
            .with_local("v2.json", document("triage", &["G3"]));
        let (registry, _, use_case) = setup(storage);
        use_case.execute(ImportPresetInput::new("v1.json")).await.unwrap();
        let output = use_case.execute(ImportPresetInput::new("v2.json")).await.unwrap();
        assert!(output.replaced);
        assert_eq!(registry.presets().get("triage").unwrap().modes.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_registry_unchanged() {
        let storage = MemoryStorage {
            fail_imported_writes: true,
            ..MemoryStorage::default()
        }
        .with_local("p.json", document("triage", &["A1"]));
        let (registry, _, use_case) = setup(storage);
        let err = use_case
            .execute(ImportPresetInput::new("p.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PresetIoError::Storage(_)));
        assert!(registry.presets().get("triage").is_none());
    }

    #[tokio::test]
    async fn test_load_persisted_restores_imports() {
        let storage = MemoryStorage::default().with_local("p.json", document("triage", &["A1"]));
        let (_, storage, use_case) = setup(storage);
        use_case.execute(ImportPresetInput::new("p.json")).await.unwrap();
        let persisted = storage.imported.lock().unwrap().clone();

        let fresh = MemoryStorage::default();
        *fresh.imported.lock().unwrap() = persisted;
        let (registry, _, use_case) = setup(fresh);
        assert_eq!(use_case.load_persisted().await.unwrap(), 1);
        let preset = registry.presets().get("triage").cloned().unwrap();
        assert_eq!(preset.source, PresetSource::Imported);
        assert_eq!(registry.presets().imported().len(), 1);
    }

    #[tokio::test]
    async fn test_load_persisted_skips_invalid_documents() {
        let documents: Vec<PresetDocument> = [document("broken", &[]), document("triage", &["A1"])]
            .iter()
            .map(|bytes| serde_json::from_slice(bytes).unwrap())
            .collect();
        let storage = MemoryStorage::default();
        *storage.imported.lock().unwrap() = Some(serde_json::to_vec(&documents).unwrap());

        let (registry, _, use_case) = setup(storage);
        assert_eq!(use_case.load_persisted().await.unwrap(), 1);
        assert!(registry.presets().get("broken").is_none());
        assert!(registry.presets().get("triage").is_some());
    }
}
