use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("malformed energy table: {0}")]
    MalformedTable(String),
    #[error("cannot fit {clusters} clusters to {samples} samples")]
    InsufficientSamples { samples: usize, clusters: usize },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    pub fn malformed<T: Into<String>>(message: T) -> Self {
        Self::MalformedTable(message.into())
    }
}
