use thiserror::Error;

/// Failures while reading or writing the store file.
///
/// These never reach resolver callers; the store logs them and degrades to a
/// memory-only cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("store document must be a json object")]
    NotAnObject,
}

pub type StoreResult<T> = Result<T, StoreError>;
