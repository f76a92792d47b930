use crate::boundary::BoundaryError;
use lmtools_extract::SelectorError;
use lmtools_llm::{ApiError, LlmError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LmToolsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No messages found in the current channel")]
    NoMessages,

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not determine the current channel")]
    NoChannel,

    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Invalid selector configuration: {0}")]
    Selector(#[from] SelectorError),
}

impl From<LlmError> for LmToolsError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => {
                LmToolsError::Configuration("API key is not configured".to_string())
            }
            LlmError::InvalidApiKey => {
                LmToolsError::Configuration("Invalid API key format".to_string())
            }
            LlmError::Client(e) => LmToolsError::Configuration(format!("HTTP client setup failed: {}", e)),
            LlmError::Api(e) => LmToolsError::Api(e),
        }
    }
}

impl From<serde_json::Error> for LmToolsError {
    fn from(err: serde_json::Error) -> Self {
        LmToolsError::Settings(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmToolsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lmtools_llm::ProviderType;

    #[test]
    fn test_api_error_passes_through_display() {
        let err: LmToolsError = LlmError::Api(ApiError::new(ProviderType::OpenAI, Some(401), "bad key")).into();
        assert!(matches!(err, LmToolsError::Api(_)));
        assert_eq!(err.to_string(), "OpenAI API error (401): bad key");
    }

    #[test]
    fn test_missing_key_is_configuration() {
        let err: LmToolsError = LlmError::MissingApiKey.into();
        assert!(matches!(err, LmToolsError::Configuration(_)));
    }

    #[test]
    fn test_boundary_display() {
        let err: LmToolsError = BoundaryError::NoContent.into();
        assert_eq!(err.to_string(), "No unread messages to translate");
    }
}
