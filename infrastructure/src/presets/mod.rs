//! Preset persistence: TOML codec and file/HTTP storage

mod codec;
mod storage;

pub use codec::TomlPresetCodec;
pub use storage::FilePresetStorage;
