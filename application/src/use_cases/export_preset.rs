//! Export a registered preset as a document with concrete mode ids.

use super::import_preset::sha256_hex;
use crate::ports::preset_storage::{PresetCodec, PresetIoError, PresetStorage};
use crate::registry::SharedRegistry;
use ensemble_domain::PresetDocument;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExportPresetInput {
    pub name: String,
    pub destination: PathBuf,
    /// Overwrite an existing destination
    pub force: bool,
    /// Name written into the document
    pub rename: Option<String>,
}

impl ExportPresetInput {
    pub fn new(name: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            destination: destination.into(),
            force: false,
            rename: None,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPresetOutput {
    pub name: String,
    pub path: PathBuf,
    pub mode_ids: Vec<String>,
    /// SHA-256 of the written bytes, for pinning a later import
    pub sha256: String,
}

pub struct ExportPresetUseCase {
    registry: Arc<SharedRegistry>,
    storage: Arc<dyn PresetStorage>,
    codec: Arc<dyn PresetCodec>,
}

impl ExportPresetUseCase {
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

    /// Resolve and encode a preset without writing it anywhere.
    pub fn render(&self, name: &str, rename: Option<&str>) -> Result<(PresetDocument, Vec<u8>), PresetIoError> {
        let catalog = self.registry.catalog();
        let resolved = self.registry.presets().resolve(name, &catalog)?;
        let mut document = PresetDocument::from_resolved(&resolved);
        if let Some(rename) = rename {
            document = document.with_name(rename);
        }
        let bytes = self.codec.encode(&document)?;
        Ok((document, bytes))
    }

    pub async fn execute(&self, input: ExportPresetInput) -> Result<ExportPresetOutput, PresetIoError> {
        let (document, bytes) = self.render(&input.name, input.rename.as_deref())?;

        if !input.force && self.storage.exists(&input.destination).await {
            return Err(PresetIoError::AlreadyExists(
                input.destination.display().to_string(),
            ));
        }
        self.storage
            .write(&input.destination, &bytes, input.force)
            .await?;

        info!(
            "Exported preset {} to {}",
            document.name,
            input.destination.display()
        );
        Ok(ExportPresetOutput {
            name: document.name,
            path: input.destination,
            mode_ids: document.modes,
            sha256: sha256_hex(&bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{JsonCodec, MemoryStorage};
    use crate::use_cases::import_preset::{ImportPresetInput, ImportPresetUseCase};
    use ensemble_domain::{default_catalog, default_registry};
    use std::collections::BTreeSet;

    fn setup() -> (Arc<SharedRegistry>, ExportPresetUseCase, ImportPresetUseCase) {
        let registry = Arc::new(SharedRegistry::new(
            default_catalog().unwrap(),
            default_registry().unwrap(),
        ));
        let storage: Arc<dyn PresetStorage> = Arc::new(MemoryStorage::default());
        let codec: Arc<dyn PresetCodec> = Arc::new(JsonCodec);
        let export = ExportPresetUseCase::new(
            Arc::clone(&registry),
            Arc::clone(&storage),
            Arc::clone(&codec),
        );
        let import = ImportPresetUseCase::new(Arc::clone(&registry), storage, codec);
        (registry, export, import)
    }

    #[tokio::test]
    async fn test_export_expands_codes() {
        let (_, export, _) = setup();
        let output = export
            .execute(ExportPresetInput::new("security-audit", "out.json"))
            .await
            .unwrap();
        assert_eq!(output.mode_ids[0], "security-threat-model");
        assert_eq!(output.sha256.len(), 64);
    }

    #[tokio::test]
    async fn test_overwrite_guard() {
        let (_, export, _) = setup();
        export
            .execute(ExportPresetInput::new("bug-hunt", "out.json"))
            .await
            .unwrap();
        let err = export
            .execute(ExportPresetInput::new("bug-hunt", "out.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
        export
            .execute(ExportPresetInput::new("bug-hunt", "out.json").with_force(true))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_preset() {
        let (_, export, _) = setup();
        let err = export
            .execute(ExportPresetInput::new("nope", "out.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PresetIoError::Domain(_)));
    }

    #[tokio::test]
    async fn test_round_trip_under_new_name() {
        let (registry, export, import) = setup();
        export
            .execute(ExportPresetInput::new("security-audit", "first.json").with_rename("audit-copy"))
            .await
            .unwrap();
        import
            .execute(ImportPresetInput::new("first.json"))
            .await
            .unwrap();
        let second = export
            .execute(ExportPresetInput::new("audit-copy", "second.json"))
            .await
            .unwrap();

        let presets = registry.presets();
        let original = presets.get("security-audit").unwrap();
        let copy = presets.get("audit-copy").unwrap();
        let original_ids: BTreeSet<_> = registry
            .presets()
            .resolve("security-audit", &registry.catalog())
            .unwrap()
            .mode_ids
            .into_iter()
            .collect();
        let copy_ids: BTreeSet<_> = second.mode_ids.into_iter().collect();

        assert_eq!(original_ids, copy_ids);
        assert_eq!(original.synthesis, copy.synthesis);
        assert_eq!(original.budget, copy.budget);
        assert_eq!(original.allow_advanced, copy.allow_advanced);
    }
}
