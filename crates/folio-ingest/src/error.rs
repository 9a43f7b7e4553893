use std::fmt;
use std::path::PathBuf;

use folio_locate::LocateError;
use folio_mets::MetsError;
use folio_store::StoreError;
use folio_verify::VerifyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a volume failed, as reported to the caller of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum FailureReason {
    /// The METS document could not be decoded or tokenized.
    ParseAbort,
    /// The archive or the METS document is absent.
    MissingInput,
    ChecksumMismatch,
    EmptyArchive { consistent_with_metadata: bool },
    MetadataArchiveMismatch,
    /// The archive could not be read as a page container.
    ArchiveRead,
    /// Transient write failures exhausted the attempt budget.
    TransientWriteFailure,
    PermanentWriteFailure,
    /// A worker failed outside the normal pipeline.
    Internal,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseAbort => "parse_abort",
            Self::MissingInput => "missing_input",
            Self::ChecksumMismatch => "checksum_mismatch",
            Self::EmptyArchive {
                consistent_with_metadata: true,
            } => "empty_archive",
            Self::EmptyArchive {
                consistent_with_metadata: false,
            } => "empty_archive_inconsistent",
            Self::MetadataArchiveMismatch => "metadata_archive_mismatch",
            Self::ArchiveRead => "archive_read",
            Self::TransientWriteFailure => "transient_write_failure",
            Self::PermanentWriteFailure => "permanent_write_failure",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end processing of one volume.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("METS parse failed: {0}")]
    Parse(#[from] MetsError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker failed: {0}")]
    Internal(String),
}

impl IngestError {
    /// Classify this error for reporting.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Locate(_) => FailureReason::MissingInput,
            Self::Parse(MetsError::Io { .. }) => FailureReason::MissingInput,
            Self::Parse(_) => FailureReason::ParseAbort,
            Self::Verify(err) => match err {
                VerifyError::ChecksumMismatch { .. } => FailureReason::ChecksumMismatch,
                VerifyError::EmptyArchive {
                    consistent_with_metadata,
                    ..
                } => FailureReason::EmptyArchive {
                    consistent_with_metadata: *consistent_with_metadata,
                },
                VerifyError::MetadataMismatch { .. } => FailureReason::MetadataArchiveMismatch,
                VerifyError::UnsupportedEntry { .. }
                | VerifyError::CorruptEntry { .. }
                | VerifyError::Io(_)
                | VerifyError::Zip(_) => FailureReason::ArchiveRead,
            },
            Self::Store(err) if err.is_transient() => FailureReason::TransientWriteFailure,
            Self::Store(_) => FailureReason::PermanentWriteFailure,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                FailureReason::MissingInput
            }
            Self::Io { .. } => FailureReason::ArchiveRead,
            Self::Internal(_) => FailureReason::Internal,
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_transient())
    }
}

/// Result alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors loading configuration or id lists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
