//! Foundation types for folio.
//!
//! Every other folio crate depends on `folio-types`. It holds the identity
//! types used as persistence keys and the in-memory structural record model
//! that the METS parser populates and the archive validator completes.
//!
//! # Key Types
//!
//! - [`VolumeId`] -- globally unique volume identifier (`<namespace>.<id>`)
//! - [`SequenceKey`] -- fixed-width page ordering key, the per-volume sort key
//! - [`VolumeRecord`] -- one volume's pages, indexed by filename and by file ID
//! - [`PageRecord`] -- one page's declared and measured attributes

pub mod error;
pub mod identity;
pub mod pairtree;
pub mod record;
pub mod sequence;

pub use error::TypeError;
pub use identity::VolumeId;
pub use record::{PageRecord, VolumeRecord};
pub use sequence::{SequenceKey, SEQUENCE_WIDTH};
