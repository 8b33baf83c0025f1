//! Error types for study sessions
//!
//! - [`StudyError`]: generation and session failures
//! - [`StoreError`]: commentary persistence failures
//! - [`ConfigError`]: configuration loading failures

use scriptorium_completion::CompletionError;
use std::path::PathBuf;

/// Main study error type
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// Completion provider failed
    #[error("generation failed: {0}")]
    Generation(#[from] CompletionError),

    /// Generator failed for a reason other than the provider
    #[error("generator failed: {0}")]
    Generator(String),

    /// Commentary for this verse is already being generated
    #[error("commentary for {0} is already being generated")]
    AlreadyGenerating(String),

    /// Verse is not part of the study passage
    #[error("verse {0} is not part of the passage")]
    UnknownVerse(String),

    /// Persisting the commentary book failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl StudyError {
    /// Check if a manual retry could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Generation(e) => e.is_retryable(),
            Self::AlreadyGenerating(_) | Self::Store(_) => true,
            Self::Generator(_) | Self::UnknownVerse(_) => false,
        }
    }
}

/// Commentary persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored document is not a commentary list
    #[error("invalid commentary document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_completion::ProviderKind;

    #[test]
    fn already_generating_display() {
        let err = StudyError::AlreadyGenerating("John 3:16".into());
        assert_eq!(
            err.to_string(),
            "commentary for John 3:16 is already being generated"
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn generation_retryable_follows_provider() {
        let retryable: StudyError = CompletionError::EmptyResponse(ProviderKind::Gemini).into();
        assert!(retryable.is_retryable());

        let fatal: StudyError = CompletionError::MissingApiKey {
            provider: ProviderKind::OpenAi,
            env: "OPENAI_API_KEY".into(),
        }
        .into();
        assert!(!fatal.is_retryable());
    }

    #[test]
    fn config_invalid_display() {
        let err = ConfigError::Invalid {
            field: "timeline.radius",
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value timeline.radius: must be positive"
        );
    }
}
