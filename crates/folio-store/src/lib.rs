//! Volume persistence for folio.
//!
//! A volume is stored as a set of page rows keyed by sequence key, plus one
//! set of volume-level aggregates. Every ingestion attempt submits a single
//! [`WriteUnit`] that a backend applies atomically: either all rows and the
//! aggregates land, or nothing does.
//!
//! # Storage Backends
//!
//! All backends implement the [`VolumeStore`] trait:
//!
//! - [`InMemoryVolumeStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsVolumeStore`] -- one JSON document per volume under a root directory
//!
//! # Failure classes
//!
//! Backends report [`StoreError::Transient`] only for conditions a later
//! attempt may clear (timeouts, interrupted calls). Everything else is
//! permanent from the caller's point of view.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;
pub mod unit;

pub use error::{StoreError, StoreResult};
pub use fs::FsVolumeStore;
pub use memory::InMemoryVolumeStore;
pub use traits::VolumeStore;
pub use unit::{PageRow, StoredVolume, VolumeAggregates, WriteUnit, STRUCTURAL_METADATA_TYPE};
