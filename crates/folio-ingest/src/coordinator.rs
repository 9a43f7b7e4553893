use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use folio_locate::VolumeLocator;
use folio_store::{StoreResult, VolumeStore, WriteUnit};
use folio_types::VolumeId;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::IngestConfig;
use crate::error::{FailureReason, IngestError, IngestResult};
use crate::notify::{AvailabilityNotifier, NoOpNotifier};
use crate::prepare::VolumePreparer;

/// Totals for a volume that was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IngestedVolume {
    pub pages: usize,
    pub byte_count: u64,
    pub character_count: u64,
}

/// Result of processing one volume.
#[derive(Debug)]
pub struct VolumeOutcome {
    pub volume_id: VolumeId,
    /// Attempts made, counting the first.
    pub attempts: u32,
    pub result: IngestResult<IngestedVolume>,
}

impl VolumeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Failure classification; `None` on success.
    pub fn reason(&self) -> Option<FailureReason> {
        self.result.as_ref().err().map(IngestError::reason)
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<VolumeOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &VolumeOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &VolumeOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Returns `true` if every volume was ingested.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(VolumeOutcome::is_success)
    }
}

/// Drives volumes through locate, parse, validate, and write.
///
/// Cloning is cheap; clones share the store, locator, and notifier.
#[derive(Clone)]
pub struct IngestionCoordinator {
    store: Arc<dyn VolumeStore>,
    preparer: VolumePreparer,
    notifier: Arc<dyn AvailabilityNotifier>,
    config: IngestConfig,
}

impl IngestionCoordinator {
    pub fn new(store: Arc<dyn VolumeStore>, locator: Arc<dyn VolumeLocator>, config: IngestConfig) -> Self {
        Self {
            store,
            preparer: VolumePreparer::new(locator, &config),
            notifier: Arc::new(NoOpNotifier),
            config,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn AvailabilityNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Check the store's ingestion target once, creating it if missing.
    pub async fn ensure_target(&self) -> StoreResult<()> {
        if self.store.target_exists().await? {
            debug!("ingestion target present");
            return Ok(());
        }
        info!("ingestion target missing; creating it");
        self.store.create_target().await
    }

    /// Ingest one volume. Never panics on volume-level failures; they are
    /// returned in the outcome.
    pub async fn ingest_one(&self, volume: &VolumeId) -> VolumeOutcome {
        info!(volume = %volume, "ingesting volume");
        let prepared = match self.preparer.prepare_blocking(volume).await {
            Ok(prepared) => prepared,
            Err(err) => {
                error!(volume = %volume, reason = %err.reason(), error = %err, "volume failed before write");
                return VolumeOutcome {
                    volume_id: volume.clone(),
                    attempts: 1,
                    result: Err(err),
                };
            }
        };

        let unit = prepared.write_unit(Utc::now());
        let (attempts, result) = self.write_with_retry(&unit).await;
        let result = result.map(|()| IngestedVolume {
            pages: prepared.validated.page_count(),
            byte_count: prepared.validated.byte_count,
            character_count: prepared.validated.character_count,
        });
        match &result {
            Ok(summary) => info!(
                volume = %volume,
                attempts,
                pages = summary.pages,
                bytes = summary.byte_count,
                "volume ingested"
            ),
            Err(err) => error!(volume = %volume, attempts, reason = %err.reason(), error = %err, "volume write failed"),
        }
        VolumeOutcome {
            volume_id: volume.clone(),
            attempts,
            result,
        }
    }

    /// Execute `unit`, retrying only transient failures, for at most
    /// `max_attempts` attempts in total.
    async fn write_with_retry(&self, unit: &WriteUnit) -> (u32, IngestResult<()>) {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let err = match self.store.execute(unit).await {
                Ok(()) => return (attempt, Ok(())),
                Err(err) => IngestError::from(err),
            };
            if !err.is_retryable() || attempt >= max_attempts {
                return (attempt, Err(err));
            }
            warn!(
                volume = %unit.volume_id,
                attempt,
                max_attempts,
                error = %err,
                "transient write failure; retrying"
            );
            tokio::time::sleep(self.config.retry_delay()).await;
            attempt += 1;
        }
    }

    /// Ingest a batch of volumes with at most `workers` in flight.
    ///
    /// Duplicate ids are processed once. Volumes that succeed are passed to
    /// the availability notifier afterwards.
    pub async fn ingest_batch(&self, volumes: &[VolumeId]) -> BatchReport {
        let mut seen = HashSet::new();
        let unique: Vec<VolumeId> = volumes
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();
        if unique.len() < volumes.len() {
            warn!(duplicates = volumes.len() - unique.len(), "ignoring duplicate volume ids");
        }

        let workers = self.config.workers.max(1);
        info!(volumes = unique.len(), workers, "starting ingestion batch");
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        for id in unique.iter().cloned() {
            let this = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                this.ingest_one(&id).await
            });
        }

        let mut finished: HashMap<VolumeId, VolumeOutcome> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    finished.insert(outcome.volume_id.clone(), outcome);
                }
                Err(err) => error!(error = %err, "ingestion worker failed"),
            }
        }

        let outcomes: Vec<VolumeOutcome> = unique
            .into_iter()
            .map(|id| {
                finished.remove(&id).unwrap_or_else(|| VolumeOutcome {
                    attempts: 0,
                    result: Err(IngestError::Internal(format!("worker for {id} did not finish"))),
                    volume_id: id,
                })
            })
            .collect();
        let report = BatchReport { outcomes };

        let available: Vec<VolumeId> = report.succeeded().map(|o| o.volume_id.clone()).collect();
        if !available.is_empty() {
            if let Err(err) = self.notifier.set_available(&available).await {
                error!(volumes = available.len(), error = %err, "availability update failed");
            }
        }
        info!(
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "ingestion batch finished"
        );
        report
    }
}
