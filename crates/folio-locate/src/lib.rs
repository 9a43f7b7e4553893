//! Volume file location for folio.
//!
//! Given a volume id, find its page archive and its METS document. The
//! [`PairtreeLocator`] searches one or more pairtree roots, which is how
//! volumes are sharded across mounts in practice.

pub mod error;
pub mod pairtree;

pub use error::{LocateError, LocateResult};
pub use pairtree::{PairtreeLocator, VolumeFiles, VolumeLocator};
