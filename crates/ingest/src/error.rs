use thiserror::Error;

/// Errors produced while loading source files.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("invalid ingest config: {0}")]
    InvalidConfig(String),

    #[error("source is {bytes} bytes, exceeding the {limit} byte cap")]
    SourceTooLarge { bytes: usize, limit: usize },

    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("i/o failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for IngestError {
    fn from(e: std::io::Error) -> Self {
        IngestError::Io(e.to_string())
    }
}
