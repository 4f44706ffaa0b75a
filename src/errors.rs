use thiserror::Error;

/// Error type for the crate's I/O edges, such as ledger snapshot files.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TutorError>;
