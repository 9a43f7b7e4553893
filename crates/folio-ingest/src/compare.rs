use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use folio_locate::VolumeLocator;
use folio_reconcile::{reconcile, Drift, Reconciliation};
use folio_store::VolumeStore;
use folio_types::{SequenceKey, VolumeId};
use tracing::{error, info};

use crate::config::IngestConfig;
use crate::error::{IngestError, IngestResult};
use crate::prepare::VolumePreparer;

/// Per-volume comparison results, in input order.
#[derive(Debug, Default)]
pub struct ComparisonReport {
    pub results: Vec<(VolumeId, IngestResult<Reconciliation>)>,
}

impl ComparisonReport {
    /// Compared volumes grouped by drift class.
    pub fn by_drift(&self) -> BTreeMap<Drift, Vec<&VolumeId>> {
        let mut groups: BTreeMap<Drift, Vec<&VolumeId>> = BTreeMap::new();
        for (id, result) in &self.results {
            if let Ok(reconciliation) = result {
                groups.entry(reconciliation.drift).or_default().push(id);
            }
        }
        groups
    }

    pub fn failures(&self) -> impl Iterator<Item = (&VolumeId, &IngestError)> {
        self.results
            .iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|err| (id, err)))
    }
}

fn range(bounds: Option<(&SequenceKey, &SequenceKey)>) -> String {
    bounds
        .map(|(first, last)| format!("{first}..{last}"))
        .unwrap_or_default()
}

/// Compares deliveries against stored volumes without writing anything.
#[derive(Clone)]
pub struct ComparisonRunner {
    store: Arc<dyn VolumeStore>,
    preparer: VolumePreparer,
}

impl ComparisonRunner {
    pub fn new(store: Arc<dyn VolumeStore>, locator: Arc<dyn VolumeLocator>, config: &IngestConfig) -> Self {
        Self {
            store,
            preparer: VolumePreparer::new(locator, config),
        }
    }

    /// Compare one volume. Stored keys are read first; when nothing is
    /// stored the delivery is not opened.
    pub async fn compare_one(&self, volume: &VolumeId) -> IngestResult<Reconciliation> {
        let prior = self.store.sequence_keys(volume).await?;
        if prior.is_empty() {
            info!(volume = %volume, "volume not stored; nothing to compare");
            return Ok(reconcile(prior, BTreeSet::new()));
        }

        let prepared = self.preparer.prepare_blocking(volume).await?;
        let reconciliation = reconcile(prior, prepared.validated.sequence_keys());
        info!(
            volume = %volume,
            drift = %reconciliation.drift,
            stored = reconciliation.prior.len(),
            stored_range = %range(reconciliation.prior_bounds()),
            delivered = reconciliation.new.len(),
            delivered_range = %range(reconciliation.new_bounds()),
            removed = reconciliation.to_remove.len(),
            added = reconciliation.to_add.len(),
            "compared volume"
        );
        Ok(reconciliation)
    }

    /// Compare each volume in turn; a failure is recorded and the batch
    /// continues.
    pub async fn compare_batch(&self, volumes: &[VolumeId]) -> ComparisonReport {
        let mut report = ComparisonReport::default();
        for volume in volumes {
            let result = self.compare_one(volume).await;
            if let Err(err) = &result {
                error!(volume = %volume, reason = %err.reason(), error = %err, "comparison failed");
            }
            report.results.push((volume.clone(), result));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use folio_store::InMemoryVolumeStore;

    use super::*;
    use crate::coordinator::IngestionCoordinator;
    use crate::error::FailureReason;
    use crate::testkit::{FixtureVolume, Pairtree};

    fn config() -> IngestConfig {
        IngestConfig {
            retry_delay_ms: 0,
            ..IngestConfig::default()
        }
    }

    fn volume(id: &str, pages: u32) -> FixtureVolume {
        (1..=pages).fold(FixtureVolume::new(id), |v, n| {
            v.page(&format!("{n:08}.txt"), n, &format!("page {n}"))
        })
    }

    /// Ingest `stored` pages, then swap the pairtree to a delivery with
    /// `delivered` pages and compare.
    async fn drift_between(stored: u32, delivered: u32) -> Reconciliation {
        let store: Arc<dyn VolumeStore> = Arc::new(InMemoryVolumeStore::with_target());
        let before = Pairtree::new();
        let id = before.add(&volume("mdp.1", stored));
        let outcome = IngestionCoordinator::new(store.clone(), before.locator(), config())
            .ingest_one(&id)
            .await;
        assert!(outcome.is_success());

        let after = Pairtree::new();
        after.add(&volume("mdp.1", delivered));
        ComparisonRunner::new(store, after.locator(), &config())
            .compare_one(&id)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn same_delivery_is_unchanged() {
        let r = drift_between(3, 3).await;
        assert_eq!(r.drift, Drift::Unchanged);
    }

    #[tokio::test]
    async fn shorter_delivery_has_fewer_pages() {
        let r = drift_between(3, 2).await;
        assert_eq!(r.drift, Drift::FewerPages);
        assert_eq!(r.to_remove.iter().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["00000003"]);
    }

    #[tokio::test]
    async fn longer_delivery_has_more_pages() {
        let r = drift_between(1, 2).await;
        assert_eq!(r.drift, Drift::MorePages);
        assert_eq!(r.to_add.iter().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["00000002"]);
    }

    #[tokio::test]
    async fn unstored_volume_is_not_opened() {
        // The locator has nothing, so opening the delivery would fail.
        let store: Arc<dyn VolumeStore> = Arc::new(InMemoryVolumeStore::with_target());
        let tree = Pairtree::new();
        let runner = ComparisonRunner::new(store, tree.locator(), &config());
        let r = runner.compare_one(&VolumeId::parse("mdp.new").unwrap()).await.unwrap();
        assert_eq!(r.drift, Drift::NoPriorRecord);
    }

    #[tokio::test]
    async fn batch_groups_by_drift_and_keeps_failures() {
        let store: Arc<dyn VolumeStore> = Arc::new(InMemoryVolumeStore::with_target());
        let tree = Pairtree::new();
        let stored = tree.add(&volume("mdp.stored", 2));
        IngestionCoordinator::new(store.clone(), tree.locator(), config())
            .ingest_one(&stored)
            .await
            .result
            .unwrap();

        // Stored but no longer delivered: comparison fails on missing input.
        let gone = Pairtree::new();
        let gone_id = gone.add(&volume("mdp.gone", 1));
        IngestionCoordinator::new(store.clone(), gone.locator(), config())
            .ingest_one(&gone_id)
            .await
            .result
            .unwrap();

        let fresh = VolumeId::parse("mdp.fresh").unwrap();
        let report = ComparisonRunner::new(store, tree.locator(), &config())
            .compare_batch(&[stored.clone(), fresh.clone(), gone_id.clone()])
            .await;

        let groups = report.by_drift();
        assert_eq!(groups[&Drift::Unchanged], vec![&stored]);
        assert_eq!(groups[&Drift::NoPriorRecord], vec![&fresh]);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, &gone_id);
        assert_eq!(failures[0].1.reason(), FailureReason::MissingInput);
    }
}
