use curtail_core::StoreError;
use curtail_generator::GeneratorError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short code already taken: {0}")]
    DuplicateCode(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<GeneratorError> for LinkError {
    fn from(value: GeneratorError) -> Self {
        match value {
            GeneratorError::InvalidUrl(message) => Self::InvalidUrl(message),
            GeneratorError::Probe(e) => Self::Store(e),
        }
    }
}
