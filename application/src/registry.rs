//! Shared catalog and preset registry.
//!
//! One [`SharedRegistry`] is built at startup and handed to every use case as
//! `Arc<SharedRegistry>`. Readers take cheap `Arc` snapshots and never block
//! on writers. Writers serialize on an async writer lock, build a complete
//! replacement and swap it in, so a reader sees either the old registry or
//! the new one and nothing in between.

use ensemble_domain::{ModeCatalog, PresetRegistry};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{Mutex, MutexGuard};

/// Proof that the caller holds the registry writer lock.
pub struct RegistryWriteGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

pub struct SharedRegistry {
    catalog: RwLock<Arc<ModeCatalog>>,
    presets: RwLock<Arc<PresetRegistry>>,
    writer: Mutex<()>,
    initial_catalog: Arc<ModeCatalog>,
    initial_presets: Arc<PresetRegistry>,
}

impl SharedRegistry {
    pub fn new(catalog: ModeCatalog, presets: PresetRegistry) -> Self {
        let catalog = Arc::new(catalog);
        let presets = Arc::new(presets);
        Self {
            catalog: RwLock::new(Arc::clone(&catalog)),
            presets: RwLock::new(Arc::clone(&presets)),
            writer: Mutex::new(()),
            initial_catalog: catalog,
            initial_presets: presets,
        }
    }

    /// Snapshot of the active catalog
    pub fn catalog(&self) -> Arc<ModeCatalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Snapshot of the active preset registry
    pub fn presets(&self) -> Arc<PresetRegistry> {
        Arc::clone(&self.presets.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Take the writer lock. Held across the whole read-modify-persist-swap
    /// sequence of an import.
    pub async fn lock_writer(&self) -> RegistryWriteGuard<'_> {
        RegistryWriteGuard {
            _guard: self.writer.lock().await,
        }
    }

    /// Swap in a new preset registry.
    pub fn replace_presets(&self, _guard: &RegistryWriteGuard<'_>, presets: PresetRegistry) {
        *self.presets.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(presets);
    }

    /// Swap in a rebuilt catalog. Presets are resolved lazily, so they keep
    /// working as long as their references exist in the new catalog.
    pub async fn reload_catalog(&self, catalog: ModeCatalog) {
        let _guard = self.writer.lock().await;
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    /// Restore the catalog and presets this registry was created with
    pub async fn reset(&self) {
        let _guard = self.writer.lock().await;
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) =
            Arc::clone(&self.initial_catalog);
        *self.presets.write().unwrap_or_else(PoisonError::into_inner) =
            Arc::clone(&self.initial_presets);
    }
}

impl std::fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("modes", &self.catalog().count())
            .field("presets", &self.presets().len())
            .finish()
    }
}
