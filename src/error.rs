use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("sample link disconnected")]
    Disconnected,
    #[error("no record within {0} ms")]
    Timeout(u64),
    #[error("record is missing its newline terminator")]
    Unterminated,
    #[error("malformed record: token {position} ({token:?}) is not numeric")]
    Malformed { position: usize, token: String },
    #[error("sample link lock poisoned")]
    Poisoned,
    #[error("sample link read failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("sample source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    #[error("feature width mismatch: scaler expects {expected}, record has {actual}")]
    Preprocess { expected: usize, actual: usize },
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
}
