use std::collections::BTreeSet;

use async_trait::async_trait;
use folio_types::{SequenceKey, VolumeId};

use crate::error::StoreResult;
use crate::unit::{StoredVolume, WriteUnit};

/// Durable store of ingested volumes.
///
/// All implementations must satisfy these invariants:
/// - `execute` is atomic per unit: on error, nothing from the unit is
///   visible to later reads.
/// - Page rows are upserted by sequence key; rows a unit does not name are
///   left in place.
/// - Distinct volumes may be written concurrently. Callers never write the
///   same volume from two tasks at once.
#[async_trait]
pub trait VolumeStore: Send + Sync {
    /// Whether the ingestion target (schema, directory) is in place.
    async fn target_exists(&self) -> StoreResult<bool>;

    /// Create the ingestion target. A no-op if it already exists.
    async fn create_target(&self) -> StoreResult<()>;

    /// Apply one write unit.
    async fn execute(&self, unit: &WriteUnit) -> StoreResult<()>;

    /// Sequence keys currently stored for a volume; empty if the volume is
    /// unknown.
    async fn sequence_keys(&self, volume: &VolumeId) -> StoreResult<BTreeSet<SequenceKey>>;

    /// Read back a stored volume.
    async fn read_volume(&self, volume: &VolumeId) -> StoreResult<Option<StoredVolume>>;

    /// Delete every row of a volume. Returns `true` if the volume existed.
    async fn delete_volume(&self, volume: &VolumeId) -> StoreResult<bool>;
}
