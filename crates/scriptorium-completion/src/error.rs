//! Error types for completion providers

use crate::provider::ProviderKind;

/// Completion failure
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{provider} api error ({status}): {message}")]
    Api {
        /// Provider that failed
        provider: ProviderKind,
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response carried no usable content
    #[error("{0} returned no content")]
    EmptyResponse(ProviderKind),

    /// Model declined to answer
    #[error("{provider} refused: {message}")]
    Refusal {
        /// Provider that refused
        provider: ProviderKind,
        /// Refusal text
        message: String,
    },

    /// Structured output requested but the text is not JSON
    #[error("structured output is not valid json: {0}")]
    InvalidStructuredOutput(String),

    /// Requested output schema does not compile
    #[error("invalid output schema: {0}")]
    InvalidSchema(String),

    /// Structured output does not conform to the requested schema
    #[error("structured output violates schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    /// API key environment variable is not set
    #[error("missing api key for {provider}: environment variable {env} is not set")]
    MissingApiKey {
        /// Provider needing the key
        provider: ProviderKind,
        /// Environment variable name
        env: String,
    },

    /// No provider registered under that name
    #[error("provider not registered: {0}")]
    UnknownProvider(String),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompletionError {
    /// Check if a manual retry could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::EmptyResponse(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = CompletionError::Api {
            provider: ProviderKind::Gemini,
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "gemini api error (503): overloaded");
    }

    #[test]
    fn retryable_classification() {
        let api = |status| CompletionError::Api {
            provider: ProviderKind::OpenAi,
            status,
            message: String::new(),
        };
        assert!(api(429).is_retryable());
        assert!(api(502).is_retryable());
        assert!(!api(400).is_retryable());
        assert!(CompletionError::EmptyResponse(ProviderKind::OpenAi).is_retryable());
        assert!(!CompletionError::SchemaViolation(vec!["x".into()]).is_retryable());
    }

    #[test]
    fn schema_violation_joins_messages() {
        let err = CompletionError::SchemaViolation(vec!["a".into(), "b".into()]);
        assert!(err.to_string().ends_with("a; b"));
    }
}
