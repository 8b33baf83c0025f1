//! Study configuration
//!
//! TOML with three tables, all optional:
//!
//! ```toml
//! [providers]
//! default = "gemini"
//!
//! [providers.gemini]
//! model = "gemini-2.0-flash"
//! api_key_env = "GEMINI_API_KEY"
//!
//! [generation]
//! temperature = 0.7
//! structured = false
//! grounded = false
//!
//! [timeline]
//! radius = 150.0
//! center_x = 200.0
//! center_y = 200.0
//! ```

use crate::error::ConfigError;
use scriptorium_completion::ProvidersConfig;
use scriptorium_timeline::{Circle, Point};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How commentary is requested from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Sampling temperature
    pub temperature: f32,
    /// Request JSON sections instead of markdown
    pub structured: bool,
    /// Ask the provider for search grounding
    pub grounded: bool,
    /// Model override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Output token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            structured: false,
            grounded: false,
            model: None,
            max_output_tokens: None,
        }
    }
}

impl GenerationSettings {
    /// With sampling temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// With structured output on or off
    #[inline]
    #[must_use]
    pub fn with_structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }

    /// With search grounding on or off
    #[inline]
    #[must_use]
    pub fn with_grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }

    /// With model override
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Timeline circle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Circle radius
    pub radius: f64,
    /// Center x
    pub center_x: f64,
    /// Center y
    pub center_y: f64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        let circle = Circle::default();
        Self {
            radius: circle.radius,
            center_x: circle.center.x,
            center_y: circle.center.y,
        }
    }
}

impl TimelineSettings {
    /// Circle described by these settings
    #[inline]
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(Point::new(self.center_x, self.center_y), self.radius)
    }
}

/// Complete study configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Completion backends
    pub providers: ProvidersConfig,
    /// Generation settings
    pub generation: GenerationSettings,
    /// Timeline geometry
    pub timeline: TimelineSettings,
}

impl StudyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - [`ConfigError::Io`] if the file cannot be read
    /// - [`ConfigError::Parse`] / [`ConfigError::Invalid`] as for [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] if the text does not match the schema
    /// - [`ConfigError::Invalid`] if a value is out of range
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// With provider settings
    #[inline]
    #[must_use]
    pub fn with_providers(mut self, providers: ProvidersConfig) -> Self {
        self.providers = providers;
        self
    }

    /// With generation settings
    #[inline]
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    /// With timeline settings
    #[inline]
    #[must_use]
    pub fn with_timeline(mut self, timeline: TimelineSettings) -> Self {
        self.timeline = timeline;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// - [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::Invalid {
                field: "generation.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.generation.temperature),
            });
        }
        if !(self.timeline.radius.is_finite() && self.timeline.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "timeline.radius",
                reason: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }
}
