//! Request side of a completion: messages and options

use crate::error::CompletionError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    System,
    /// End-user turn
    User,
    /// Prior model turn
    Assistant,
}

/// Role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author
    pub role: Role,
    /// Text content
    pub content: String,
}

impl Message {
    /// Create message
    #[inline]
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// System message
    #[inline]
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// User message
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Assistant message
    #[inline]
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Shape of the expected output
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputFormat {
    /// Free text (markdown)
    #[default]
    Text,
    /// JSON conforming to `schema`
    JsonSchema {
        /// Schema name (some providers require one)
        name: String,
        /// JSON Schema document
        schema: Value,
    },
}

impl OutputFormat {
    /// JSON output constrained to the schema of `T`
    ///
    /// # Errors
    /// Returns error if the generated schema cannot be serialized
    pub fn json_schema_for<T: JsonSchema>(name: impl Into<String>) -> Result<Self, CompletionError> {
        let root = schemars::schema_for!(T);
        Ok(Self::JsonSchema {
            name: name.into(),
            schema: serde_json::to_value(root)?,
        })
    }

    /// Schema, if structured output was requested
    #[inline]
    #[must_use]
    pub fn schema(&self) -> Option<&Value> {
        match self {
            Self::Text => None,
            Self::JsonSchema { schema, .. } => Some(schema),
        }
    }

    /// Check if structured output was requested
    #[inline]
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::JsonSchema { .. })
    }
}

/// Options for a single completion
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionOptions {
    /// Model override (provider default if `None`)
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token cap
    pub max_output_tokens: Option<u32>,
    /// Expected output shape
    pub output: OutputFormat,
    /// Ask the provider to ground the answer in search results
    pub grounded: bool,
}

impl CompletionOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With model override
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// With temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// With output token cap
    #[inline]
    #[must_use]
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    /// With output format
    #[inline]
    #[must_use]
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// With search grounding
    #[inline]
    #[must_use]
    pub fn grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }
}
