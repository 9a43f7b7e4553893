use std::sync::Arc;

use folio_store::VolumeStore;
use folio_types::VolumeId;
use tracing::{error, info, warn};

use crate::error::IngestError;
use crate::notify::{AvailabilityNotifier, NoOpNotifier};

/// What a removal batch did.
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub removed: Vec<VolumeId>,
    /// Ids with nothing stored.
    pub absent: Vec<VolumeId>,
    pub failed: Vec<(VolumeId, IngestError)>,
}

/// Deletes volumes from the store and withdraws their availability.
pub struct VolumeRemover {
    store: Arc<dyn VolumeStore>,
    notifier: Arc<dyn AvailabilityNotifier>,
}

impl VolumeRemover {
    pub fn new(store: Arc<dyn VolumeStore>) -> Self {
        Self {
            store,
            notifier: Arc::new(NoOpNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn AvailabilityNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub async fn remove_batch(&self, volumes: &[VolumeId]) -> RemovalReport {
        let mut report = RemovalReport::default();
        for volume in volumes {
            match self.store.delete_volume(volume).await {
                Ok(true) => {
                    info!(volume = %volume, "removed volume");
                    report.removed.push(volume.clone());
                }
                Ok(false) => {
                    warn!(volume = %volume, "volume not stored; nothing to remove");
                    report.absent.push(volume.clone());
                }
                Err(err) => {
                    error!(volume = %volume, error = %err, "failed to remove volume");
                    report.failed.push((volume.clone(), err.into()));
                }
            }
        }

        if !report.removed.is_empty() {
            if let Err(err) = self.notifier.set_unavailable(&report.removed).await {
                error!(volumes = report.removed.len(), error = %err, "availability update failed");
            }
        }
        report
    }
}
