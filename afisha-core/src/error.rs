use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum AfishaError {
    /// Missing or rejected credentials for an upstream provider.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AfishaError>;

impl From<ProviderError> for AfishaError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingApiKey(_) | ProviderError::InvalidApiKey => {
                AfishaError::Configuration(err.to_string())
            }
            ProviderError::NotFound => {
                AfishaError::NotFound("upstream resource".to_string())
            }
            other => AfishaError::UpstreamUnavailable(other.to_string()),
        }
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for AfishaError {
    fn from(err: sqlx::Error) -> Self {
        AfishaError::Persistence(err.to_string())
    }
}
