use curtail_core::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("store error while probing for a free code: {0}")]
    Probe(#[from] StoreError),
}
