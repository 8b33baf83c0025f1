//! Provider seam
//!
//! [`CompletionProvider`] is the one capability every backend shares. Each
//! backend owns its own wire types; [`ProviderKind`] tags which one is in use.

use crate::completion::{Completion, Payload};
use crate::error::CompletionError;
use crate::message::{CompletionOptions, Message, OutputFormat};
use crate::schema::{strip_code_fence, validate_structured};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Supported completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions
    #[serde(rename = "openai")]
    OpenAi,
    /// Google Gemini `generateContent`
    #[default]
    Gemini,
}

impl ProviderKind {
    /// Lowercase name used in configuration
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(CompletionError::UnknownProvider(other.to_string())),
        }
    }
}

/// A completion backend
///
/// # Contract
/// - Returns [`Payload::Structured`] iff `options.output` requested a schema,
///   and the value has been validated against it
/// - Never retries; failures surface to the caller as-is
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> ProviderKind;

    /// Run one completion
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, CompletionError>;
}

/// Turn raw model text into a payload honoring the requested output format
///
/// # Errors
/// - [`CompletionError::InvalidStructuredOutput`] if JSON was requested and the text is not JSON
/// - [`CompletionError::SchemaViolation`] if it does not match the schema
pub fn finish_payload(text: String, output: &OutputFormat) -> Result<Payload, CompletionError> {
    match output {
        OutputFormat::Text => Ok(Payload::Text(text)),
        OutputFormat::JsonSchema { schema, .. } => {
            let value: serde_json::Value = serde_json::from_str(strip_code_fence(&text))
                .map_err(|e| CompletionError::InvalidStructuredOutput(e.to_string()))?;
            validate_structured(schema, &value)?;
            Ok(Payload::Structured(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_kind_round_trip() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!(matches!(
            "claude".parse::<ProviderKind>(),
            Err(CompletionError::UnknownProvider(_))
        ));
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
    }

    #[test]
    fn finish_text_passthrough() {
        let payload = finish_payload("# Heading".to_string(), &OutputFormat::Text).unwrap();
        assert_eq!(payload, Payload::Text("# Heading".to_string()));
    }

    #[test]
    fn finish_structured_validates() {
        let output = OutputFormat::JsonSchema {
            name: "t".into(),
            schema: json!({
                "type": "object",
                "required": ["a"],
                "properties": { "a": { "type": "integer" } }
            }),
        };

        let ok = finish_payload("```json\n{\"a\": 1}\n```".to_string(), &output).unwrap();
        assert_eq!(ok, Payload::Structured(json!({ "a": 1 })));

        assert!(matches!(
            finish_payload("not json".to_string(), &output),
            Err(CompletionError::InvalidStructuredOutput(_))
        ));
        assert!(matches!(
            finish_payload("{\"b\": 1}".to_string(), &output),
            Err(CompletionError::SchemaViolation(_))
        ));
    }
}
