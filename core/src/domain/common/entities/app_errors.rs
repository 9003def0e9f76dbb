use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Vector store error: {0}")]
    VectorStoreError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error")]
    InternalServerError,
}
