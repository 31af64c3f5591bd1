//! Provider error types

use thiserror::Error;

/// Errors that can occur while generating a response
///
/// These never cross the `LlmProvider` boundary: `generate_response`
/// renders them with [`ProviderError::diagnostic`].
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Missing or placeholder API key
    #[error("API key is not configured for {provider}")]
    MissingApiKey { provider: String },

    /// API request failed with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The call did not finish in time
    #[error("{provider} request timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },

    /// Reply had no usable text
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Create an API error
    pub fn api_error(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a missing API key error
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            provider: provider.into(),
            secs,
        }
    }

    /// Render as the text returned to the user in place of an answer
    pub fn diagnostic(&self) -> String {
        match self {
            Self::MissingApiKey { provider } => format!(
                "⚠️ {} API key is not configured. Set it in the environment or config and restart.",
                provider
            ),
            Self::InvalidResponse { provider, .. } => {
                format!("⚠️ {} returned an empty response.", provider)
            }
            other => format!("⚠️ Error: {}", other),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_are_marked() {
        let missing = ProviderError::missing_api_key("Gemini").diagnostic();
        assert!(missing.starts_with("⚠️"));
        assert!(missing.contains("Gemini API key"));

        let api = ProviderError::api_error("Gemini", 429, "quota").diagnostic();
        assert!(api.contains("429"));
        assert!(api.contains("quota"));

        let empty = ProviderError::invalid_response("Claude", "no text").diagnostic();
        assert!(empty.contains("empty response"));
    }
}
