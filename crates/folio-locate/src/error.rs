use std::path::PathBuf;

use folio_types::VolumeId;
use thiserror::Error;

/// Errors from locating a volume's files.
#[derive(Debug, Error)]
pub enum LocateError {
    /// A required file is missing from every root.
    #[error("{kind} for {volume} not found under any root (looked for {filename})")]
    NotFound {
        volume: VolumeId,
        kind: &'static str,
        filename: String,
    },

    #[error("no pairtree roots configured")]
    NoRoots,

    #[error("cannot inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for locator results.
pub type LocateResult<T> = Result<T, LocateError>;
