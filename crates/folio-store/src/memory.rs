use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use folio_types::{SequenceKey, VolumeId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::VolumeStore;
use crate::unit::{StoredVolume, WriteUnit};

/// In-memory, HashMap-based volume store.
///
/// Intended for tests and embedding. Starts without a target, like a fresh
/// cluster; call [`VolumeStore::create_target`] or use
/// [`InMemoryVolumeStore::with_target`].
pub struct InMemoryVolumeStore {
    target: AtomicBool,
    volumes: RwLock<HashMap<VolumeId, StoredVolume>>,
}

impl InMemoryVolumeStore {
    pub fn new() -> Self {
        Self {
            target: AtomicBool::new(false),
            volumes: RwLock::new(HashMap::new()),
        }
    }

    /// A store whose target already exists.
    pub fn with_target() -> Self {
        let store = Self::new();
        store.target.store(true, Ordering::SeqCst);
        store
    }

    /// Number of volumes currently stored.
    pub fn len(&self) -> usize {
        self.volumes.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.read().expect("lock poisoned").is_empty()
    }

    /// Return a sorted list of stored volume ids.
    pub fn volume_ids(&self) -> Vec<VolumeId> {
        let map = self.volumes.read().expect("lock poisoned");
        let mut ids: Vec<VolumeId> = map.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn require_target(&self) -> StoreResult<()> {
        if self.target.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Permanent("ingestion target does not exist".into()))
        }
    }
}

impl Default for InMemoryVolumeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VolumeStore for InMemoryVolumeStore {
    async fn target_exists(&self) -> StoreResult<bool> {
        Ok(self.target.load(Ordering::SeqCst))
    }

    async fn create_target(&self) -> StoreResult<()> {
        self.target.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(&self, unit: &WriteUnit) -> StoreResult<()> {
        self.require_target()?;
        let mut map = self.volumes.write().expect("lock poisoned");
        map.entry(unit.volume_id.clone())
            .or_insert_with(|| StoredVolume::new(unit.volume_id.clone()))
            .apply(unit);
        debug!(volume = %unit.volume_id, rows = unit.row_count(), "applied write unit");
        Ok(())
    }

    async fn sequence_keys(&self, volume: &VolumeId) -> StoreResult<BTreeSet<SequenceKey>> {
        self.require_target()?;
        let map = self.volumes.read().expect("lock poisoned");
        Ok(map.get(volume).map(StoredVolume::sequence_keys).unwrap_or_default())
    }

    async fn read_volume(&self, volume: &VolumeId) -> StoreResult<Option<StoredVolume>> {
        self.require_target()?;
        let map = self.volumes.read().expect("lock poisoned");
        Ok(map.get(volume).cloned())
    }

    async fn delete_volume(&self, volume: &VolumeId) -> StoreResult<bool> {
        self.require_target()?;
        let mut map = self.volumes.write().expect("lock poisoned");
        Ok(map.remove(volume).is_some())
    }
}
