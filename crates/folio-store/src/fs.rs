use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_types::pairtree::clean_id;
use tokio::io::AsyncWriteExt;
use folio_types::{SequenceKey, VolumeId};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::VolumeStore;
use crate::unit::{StoredVolume, WriteUnit};

const VOLUMES_DIR: &str = "volumes";

/// Filesystem volume store: one JSON document per volume.
///
/// Layout: `<root>/volumes/<clean id>.json`, where the clean id is the
/// pairtree encoding of the volume id. A unit is applied by rewriting the
/// volume's document to a temporary file and renaming it into place, so a
/// failed write leaves the previous document untouched.
#[derive(Clone, Debug)]
pub struct FsVolumeStore {
    root: PathBuf,
}

impl FsVolumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn volumes_dir(&self) -> PathBuf {
        self.root.join(VOLUMES_DIR)
    }

    fn volume_path(&self, volume: &VolumeId) -> PathBuf {
        self.volumes_dir().join(format!("{}.json", clean_id(volume.as_str())))
    }

    async fn require_target(&self) -> StoreResult<()> {
        if self.target_exists().await? {
            Ok(())
        } else {
            Err(StoreError::Permanent(format!(
                "ingestion target {} does not exist",
                self.volumes_dir().display()
            )))
        }
    }

    async fn load(&self, volume: &VolumeId) -> StoreResult<Option<StoredVolume>> {
        let bytes = match tokio::fs::read(self.volume_path(volume)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let stored: StoredVolume =
            serde_json::from_slice(&bytes).map_err(|err| StoreError::Corrupt {
                volume: volume.clone(),
                reason: err.to_string(),
            })?;
        if &stored.volume_id != volume {
            return Err(StoreError::Corrupt {
                volume: volume.clone(),
                reason: format!("document belongs to {}", stored.volume_id),
            });
        }
        Ok(Some(stored))
    }
}

/// Replace `path` with `bytes`: write a sibling temp file, flush it to disk,
/// then rename it over `path`. The temp file never outlives a failure.
async fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    let result = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

#[async_trait]
impl VolumeStore for FsVolumeStore {
    async fn target_exists(&self) -> StoreResult<bool> {
        match tokio::fs::metadata(self.volumes_dir()).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn create_target(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(self.volumes_dir()).await?;
        info!(root = %self.root.display(), "created volume store");
        Ok(())
    }

    async fn execute(&self, unit: &WriteUnit) -> StoreResult<()> {
        self.require_target().await?;
        let mut stored = self
            .load(&unit.volume_id)
            .await?
            .unwrap_or_else(|| StoredVolume::new(unit.volume_id.clone()));
        stored.apply(unit);

        let path = self.volume_path(&unit.volume_id);
        let json = serde_json::to_vec_pretty(&stored)?;
        write_atomically(&path, &json).await?;
        debug!(volume = %unit.volume_id, rows = unit.row_count(), path = %path.display(), "wrote volume");
        Ok(())
    }

    async fn sequence_keys(&self, volume: &VolumeId) -> StoreResult<BTreeSet<SequenceKey>> {
        self.require_target().await?;
        Ok(self
            .load(volume)
            .await?
            .map(|stored| stored.sequence_keys())
            .unwrap_or_default())
    }

    async fn read_volume(&self, volume: &VolumeId) -> StoreResult<Option<StoredVolume>> {
        self.require_target().await?;
        self.load(volume).await
    }

    async fn delete_volume(&self, volume: &VolumeId) -> StoreResult<bool> {
        self.require_target().await?;
        match tokio::fs::remove_file(self.volume_path(volume)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
