use std::path::PathBuf;

use thiserror::Error;

/// Fatal parse failures. Everything else is logged and tolerated.
#[derive(Debug, Error)]
pub enum MetsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("structural metadata is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("document ended with {open_elements} unclosed element(s)")]
    Truncated { open_elements: usize },
}

pub type MetsResult<T> = Result<T, MetsError>;
