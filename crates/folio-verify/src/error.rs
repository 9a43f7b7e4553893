use std::collections::BTreeSet;

use folio_types::VolumeId;
use thiserror::Error;

/// Reasons a volume's archive fails validation.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("checksum mismatch in {volume} for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        volume: VolumeId,
        filename: String,
        expected: String,
        actual: String,
    },

    /// No archive entry matched a page. `consistent_with_metadata` is true
    /// when the structural metadata declared no pages either.
    #[error("empty archive for {volume} (consistent with metadata: {consistent_with_metadata})")]
    EmptyArchive {
        volume: VolumeId,
        consistent_with_metadata: bool,
    },

    #[error(
        "archive and metadata disagree for {volume}: {} missing, {} unexpected",
        missing.len(),
        unexpected.len()
    )]
    MetadataMismatch {
        volume: VolumeId,
        missing: BTreeSet<String>,
        unexpected: BTreeSet<String>,
    },

    /// A zip entry this reader cannot decode without seeking.
    #[error("unsupported archive entry {entry}: {reason}")]
    UnsupportedEntry { entry: String, reason: &'static str },

    /// A zip entry whose data does not match its data descriptor.
    #[error("corrupt archive entry {entry}: {reason}")]
    CorruptEntry { entry: String, reason: String },

    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive format error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience alias for validation results.
pub type VerifyResult<T> = Result<T, VerifyError>;
