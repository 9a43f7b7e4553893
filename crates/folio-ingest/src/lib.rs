//! Volume ingestion for folio.
//!
//! This crate sequences the other components into the jobs an operator
//! runs over a list of volume ids:
//!
//! - [`IngestionCoordinator`] -- locate, parse, validate, and write each
//!   volume atomically, retrying transient write failures
//! - [`ComparisonRunner`] -- report how a delivery drifts from what is
//!   already stored, without writing
//! - [`VolumeRemover`] -- delete stored volumes
//!
//! Every per-volume failure is caught at the volume boundary and reported
//! as a [`FailureReason`]; it never stops the rest of a batch.

pub mod compare;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod ids;
pub mod notify;
pub mod prepare;
pub mod remove;
#[cfg(test)]
mod testkit;

pub use compare::{ComparisonReport, ComparisonRunner};
pub use config::{FolioConfig, IngestConfig, LocatorConfig, StoreConfig};
pub use coordinator::{BatchReport, IngestedVolume, IngestionCoordinator, VolumeOutcome};
pub use error::{ConfigError, FailureReason, IngestError, IngestResult};
pub use ids::read_volume_ids;
pub use notify::{AvailabilityNotifier, NoOpNotifier};
pub use prepare::{PreparedVolume, VolumePreparer};
pub use remove::{RemovalReport, VolumeRemover};
