//! TOML encoding of preset documents
//!
//! A single exported preset is one document at the top level. The imported
//! presets file holds many under `[[presets]]`.

use ensemble_application::{PresetCodec, PresetIoError};
use ensemble_domain::PresetDocument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct PresetCollection {
    #[serde(default)]
    presets: Vec<PresetDocument>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlPresetCodec;

impl TomlPresetCodec {
    pub fn new() -> Self {
        Self
    }
}

fn as_text(bytes: &[u8]) -> Result<&str, PresetIoError> {
    std::str::from_utf8(bytes).map_err(|e| PresetIoError::Malformed(format!("not UTF-8: {e}")))
}

impl PresetCodec for TomlPresetCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PresetDocument, PresetIoError> {
        toml::from_str(as_text(bytes)?).map_err(|e| PresetIoError::Malformed(e.to_string()))
    }

    fn encode(&self, document: &PresetDocument) -> Result<Vec<u8>, PresetIoError> {
        toml::to_string_pretty(document)
            .map(String::into_bytes)
            .map_err(|e| PresetIoError::Malformed(e.to_string()))
    }

    fn decode_collection(&self, bytes: &[u8]) -> Result<Vec<PresetDocument>, PresetIoError> {
        let collection: PresetCollection =
            toml::from_str(as_text(bytes)?).map_err(|e| PresetIoError::Malformed(e.to_string()))?;
        Ok(collection.presets)
    }

    fn encode_collection(&self, documents: &[PresetDocument]) -> Result<Vec<u8>, PresetIoError> {
        let collection = PresetCollection {
            presets: documents.to_vec(),
        };
        toml::to_string_pretty(&collection)
            .map(String::into_bytes)
            .map_err(|e| PresetIoError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{
        BudgetConfig, PRESET_SCHEMA_VERSION, SynthesisStrategy, default_catalog, default_registry,
    };

    fn document(name: &str) -> PresetDocument {
        let catalog = default_catalog().unwrap();
        let resolved = default_registry().unwrap().resolve(name, &catalog).unwrap();
        PresetDocument::from_resolved(&resolved)
    }

    #[test]
    fn test_encoded_document_is_readable_toml() {
        let bytes = TomlPresetCodec.encode(&document("bug-hunt")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("name = \"bug-hunt\""));
        assert!(text.contains("schema_version = 1"));
        assert!(text.contains("[synthesis]"));
        assert!(text.contains("[budget]"));
    }

    #[test]
    fn test_decode_hand_written_document() {
        let text = r#"
name = "my-review"
modes = ["A1", "systems-thinking"]
tags = ["review"]

[synthesis]
strategy = "consensus"

[budget]
max_tokens_per_mode = 3000
max_total_tokens = 9000
"#;
        let doc = TomlPresetCodec.decode(text.as_bytes()).unwrap();
        assert_eq!(doc.schema_version, PRESET_SCHEMA_VERSION);
        assert_eq!(doc.modes, vec!["A1", "systems-thinking"]);
        assert_eq!(doc.synthesis.strategy, SynthesisStrategy::Consensus);
        assert_eq!(doc.budget, Some(BudgetConfig::new(3000, 9000)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = TomlPresetCodec.decode(b"name = ").unwrap_err();
        assert!(matches!(err, PresetIoError::Malformed(_)));
        let err = TomlPresetCodec.decode(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, PresetIoError::Malformed(_)));
    }

    #[test]
    fn test_collection_preserves_order() {
        let docs = vec![document("security-audit"), document("idea-forge")];
        let bytes = TomlPresetCodec.encode_collection(&docs).unwrap();
        let decoded = TomlPresetCodec.decode_collection(&bytes).unwrap();
        assert_eq!(decoded, docs);
    }

    #[test]
    fn test_empty_collection() {
        assert!(TomlPresetCodec.decode_collection(b"").unwrap().is_empty());
    }
}
