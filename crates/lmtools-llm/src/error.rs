use crate::config::ProviderType;
use thiserror::Error;

/// Failure reported by (or while talking to) a provider.
///
/// `status` is the HTTP status when the provider answered with a non-2xx
/// response; it is `None` for transport failures and malformed bodies.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} API error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
pub struct ApiError {
    pub provider: ProviderType,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(provider: ProviderType, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            provider,
            status,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Invalid API key format")]
    InvalidApiKey,

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Turn a non-2xx response into an [`ApiError`].
///
/// Prefers the provider's `{"error": {"message": ...}}` body and falls back to
/// the HTTP reason phrase.
pub(crate) async fn error_from_response(
    provider: ProviderType,
    response: reqwest::Response,
) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    ApiError::new(provider, Some(status.as_u16()), message)
}

pub(crate) fn transport_error(provider: ProviderType, err: reqwest::Error) -> ApiError {
    ApiError::new(provider, None, format!("Failed to send request: {}", err))
}
