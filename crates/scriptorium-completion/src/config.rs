//! Provider configuration
//!
//! Loaded as the `[providers]` table of the study configuration. API keys are
//! never stored in configuration; only the name of the environment variable
//! holding them.

use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};

/// Settings for one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Default model for requests that do not name one
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Override the API root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderSettings {
    /// Create settings
    #[must_use]
    pub fn new(model: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key_env: api_key_env.into(),
            base_url: None,
        }
    }

    /// With a different API root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Built-in settings for a backend
    #[must_use]
    pub fn default_for(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::OpenAi => Self::new("gpt-4o-mini", "OPENAI_API_KEY"),
            ProviderKind::Gemini => Self::new("gemini-2.0-flash", "GEMINI_API_KEY"),
        }
    }
}

/// All backend settings plus the default selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Backend used when none is requested
    pub default: ProviderKind,
    /// OpenAI settings
    pub openai: Option<ProviderSettings>,
    /// Gemini settings
    pub gemini: Option<ProviderSettings>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default: ProviderKind::default(),
            openai: Some(ProviderSettings::default_for(ProviderKind::OpenAi)),
            gemini: Some(ProviderSettings::default_for(ProviderKind::Gemini)),
        }
    }
}

impl ProvidersConfig {
    /// Settings for a backend, if configured
    #[inline]
    #[must_use]
    pub fn settings(&self, kind: ProviderKind) -> Option<&ProviderSettings> {
        match kind {
            ProviderKind::OpenAi => self.openai.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
        }
    }

    /// Configured backends, default first
    #[must_use]
    pub fn configured(&self) -> Vec<(ProviderKind, &ProviderSettings)> {
        let mut kinds = vec![self.default];
        kinds.extend(
            [ProviderKind::Gemini, ProviderKind::OpenAi]
                .into_iter()
                .filter(|k| *k != self.default),
        );
        kinds
            .into_iter()
            .filter_map(|kind| self.settings(kind).map(|s| (kind, s)))
            .collect()
    }
}
