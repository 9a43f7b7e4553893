//! Archive integrity validation for folio.
//!
//! Matches the entries of a volume's page archive against the
//! [`VolumeRecord`](folio_types::VolumeRecord) built from its structural
//! metadata, verifies declared checksums and sizes, assigns sequence keys,
//! and aggregates volume totals. The archive is consumed once, forward only.
//!
//! # Architecture
//!
//! - [`checksum`] -- digest algorithms named by the structural metadata
//! - [`archive`] -- the [`ArchiveReader`] trait with zip-stream and in-memory
//!   implementations
//! - [`validator`] -- the per-entry matching loop and the final set gate

pub mod archive;
pub mod checksum;
pub mod error;
pub mod validator;

pub use archive::{entry_filename, ArchiveEntry, ArchiveReader, MemoryArchive, ZipStreamReader};
pub use checksum::ChecksumAlgorithm;
pub use error::{VerifyError, VerifyResult};
pub use validator::{text_length, ArchiveValidator, ValidatedPage, ValidatedVolume, ValidatorOptions};
