use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid volume id {0:?}: {1}")]
    InvalidVolumeId(String, &'static str),

    #[error("invalid sequence key {0:?}: expected {expected} decimal digits", expected = crate::SEQUENCE_WIDTH)]
    InvalidSequenceKey(String),
}
