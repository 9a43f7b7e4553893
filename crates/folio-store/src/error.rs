use std::io;

use folio_types::VolumeId;

/// Errors from volume store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A failure a later attempt may not see (timeout, temporary
    /// unavailability).
    #[error("transient store failure: {0}")]
    Transient(String),

    /// The store rejected the operation outright.
    #[error("store rejected operation: {0}")]
    Permanent(String),

    /// A stored volume document cannot be decoded.
    #[error("corrupt volume {volume}: {reason}")]
    Corrupt { volume: VolumeId, reason: String },

    #[error("I/O error: {0}")]
    Io(io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => {
                Self::Transient(err.to_string())
            }
            _ => Self::Io(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
