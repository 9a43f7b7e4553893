use async_trait::async_trait;
use folio_types::VolumeId;

use crate::error::IngestResult;

/// Receives availability changes after a batch completes.
///
/// Notification is a post-step: a failure here is logged by the caller and
/// never changes the outcome of the volumes involved.
#[async_trait]
pub trait AvailabilityNotifier: Send + Sync {
    /// Mark freshly ingested volumes as available.
    async fn set_available(&self, volumes: &[VolumeId]) -> IngestResult<()>;

    /// Mark removed volumes as unavailable.
    async fn set_unavailable(&self, volumes: &[VolumeId]) -> IngestResult<()>;
}

pub struct NoOpNotifier;

#[async_trait]
impl AvailabilityNotifier for NoOpNotifier {
    async fn set_available(&self, _volumes: &[VolumeId]) -> IngestResult<()> {
        Ok(())
    }

    async fn set_unavailable(&self, _volumes: &[VolumeId]) -> IngestResult<()> {
        Ok(())
    }
}
