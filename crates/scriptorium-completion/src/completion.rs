//! Response side of a completion: payload, usage and grounding

use crate::error::CompletionError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Completion content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Payload {
    /// Plain text / markdown
    Text(String),
    /// JSON already validated against the requested schema
    Structured(Value),
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Output tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// Web source backing a grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Source URI
    pub uri: Option<String>,
    /// Source title
    pub title: Option<String>,
}

/// Span of the answer supported by one or more sources
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundingSupport {
    /// Supported answer text
    pub text: String,
    /// Indices into [`GroundingMetadata::sources`]
    pub source_indices: Vec<usize>,
    /// Confidence per source index
    pub confidence: Vec<f32>,
}

/// Which sources back which claims
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundingMetadata {
    /// Search queries the provider issued
    pub queries: Vec<String>,
    /// Sources consulted
    pub sources: Vec<GroundingSource>,
    /// Claim-to-source mapping
    pub supports: Vec<GroundingSupport>,
}

impl GroundingMetadata {
    /// Check if the provider reported nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && self.sources.is_empty() && self.supports.is_empty()
    }

    /// Sources referenced by a support entry
    pub fn sources_for<'a>(
        &'a self,
        support: &'a GroundingSupport,
    ) -> impl Iterator<Item = &'a GroundingSource> + 'a {
        support
            .source_indices
            .iter()
            .filter_map(|&i| self.sources.get(i))
    }
}

/// Result of a completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Content
    pub payload: Payload,
    /// Model that produced it
    pub model: String,
    /// Token usage, if reported
    pub usage: Option<TokenUsage>,
    /// Grounding metadata, if any
    pub grounding: Option<GroundingMetadata>,
}

impl Completion {
    /// Text completion without usage or grounding
    #[inline]
    #[must_use]
    pub fn text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
            model: model.into(),
            usage: None,
            grounding: None,
        }
    }

    /// Structured completion without usage or grounding
    #[inline]
    #[must_use]
    pub fn structured(model: impl Into<String>, value: Value) -> Self {
        Self {
            payload: Payload::Structured(value),
            model: model.into(),
            usage: None,
            grounding: None,
        }
    }

    /// Text payload, if this is a text completion
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            Payload::Structured(_) => None,
        }
    }

    /// Deserialize the structured payload into `T`
    ///
    /// # Errors
    /// - [`CompletionError::InvalidStructuredOutput`] if the payload is text
    /// - [`CompletionError::Serialization`] if it does not fit `T`
    pub fn parse_structured<T: DeserializeOwned>(&self) -> Result<T, CompletionError> {
        match &self.payload {
            Payload::Structured(value) => Ok(serde_json::from_value(value.clone())?),
            Payload::Text(_) => Err(CompletionError::InvalidStructuredOutput(
                "completion is plain text".to_string(),
            )),
        }
    }
}
