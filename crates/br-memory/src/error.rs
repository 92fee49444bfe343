use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("snapshot contains memory {0:?} with no registered codec")]
    UnknownKey(String),

    #[error("failed to encode or decode memory {key:?}: {source}")]
    Codec {
        key:    String,
        #[source]
        source: serde_json::Error,
    },
}

pub type MemoryResult<T> = Result<T, MemoryError>;
