//! Provider registry
//!
//! Provides [`ProviderRegistry`] for holding configured backends and picking
//! one by [`ProviderKind`].

use crate::config::{ProviderSettings, ProvidersConfig};
use crate::error::CompletionError;
use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;
use crate::provider::{CompletionProvider, ProviderKind};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Registered backends plus a default selection
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: IndexMap<ProviderKind, Arc<dyn CompletionProvider>>,
    default: Option<ProviderKind>,
}

impl ProviderRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured backend whose API key is present in the environment
    ///
    /// # Errors
    /// - [`CompletionError::MissingApiKey`] if the default backend has no key
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, CompletionError> {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_config`] with an explicit key lookup
    ///
    /// # Errors
    /// - [`CompletionError::MissingApiKey`] if the default backend has no key
    pub fn from_config_with<F>(config: &ProvidersConfig, lookup: F) -> Result<Self, CompletionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut registry = Self::new();

        for (kind, settings) in config.configured() {
            let Some(key) = lookup(&settings.api_key_env).filter(|k| !k.is_empty()) else {
                if kind == config.default {
                    return Err(CompletionError::MissingApiKey {
                        provider: kind,
                        env: settings.api_key_env.clone(),
                    });
                }
                tracing::warn!(
                    "skipping provider {}: {} is not set",
                    kind,
                    settings.api_key_env
                );
                continue;
            };
            registry.register(build_provider(kind, settings, key));
        }

        if !registry.contains(config.default) {
            return Err(CompletionError::UnknownProvider(config.default.to_string()));
        }
        registry.default = Some(config.default);
        tracing::info!(
            "provider registry ready: default={} available={}",
            config.default,
            registry.len()
        );
        Ok(registry)
    }

    /// Register a backend, replacing any previous one of the same kind
    ///
    /// The first registered backend becomes the default.
    pub fn register(&mut self, provider: Arc<dyn CompletionProvider>) {
        let kind = provider.kind();
        self.default.get_or_insert(kind);
        self.providers.insert(kind, provider);
    }

    /// With a different default backend
    #[inline]
    #[must_use]
    pub fn with_default(mut self, kind: ProviderKind) -> Self {
        self.default = Some(kind);
        self
    }

    /// Backend for `kind`
    ///
    /// # Errors
    /// - [`CompletionError::UnknownProvider`] if it is not registered
    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn CompletionProvider>, CompletionError> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| CompletionError::UnknownProvider(kind.to_string()))
    }

    /// The default backend
    ///
    /// # Errors
    /// - [`CompletionError::UnknownProvider`] if the registry is empty or the
    ///   default is not registered
    pub fn default_provider(&self) -> Result<Arc<dyn CompletionProvider>, CompletionError> {
        let kind = self
            .default
            .ok_or_else(|| CompletionError::UnknownProvider("<none>".to_string()))?;
        self.get(kind)
    }

    /// Default backend kind
    #[inline]
    #[must_use]
    pub fn default_kind(&self) -> Option<ProviderKind> {
        self.default
    }

    /// Registered kinds in registration order
    #[inline]
    #[must_use]
    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    /// Check if a backend is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Number of registered backends
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.kinds())
            .field("default", &self.default)
            .finish()
    }
}

fn build_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
    api_key: String,
) -> Arc<dyn CompletionProvider> {
    match kind {
        ProviderKind::OpenAi => {
            let mut provider = OpenAiProvider::new(api_key, settings.model.clone());
            if let Some(url) = &settings.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Arc::new(provider)
        }
        ProviderKind::Gemini => {
            let mut provider = GeminiProvider::new(api_key, settings.model.clone());
            if let Some(url) = &settings.base_url {
                provider = provider.with_base_url(url.clone());
            }
            Arc::new(provider)
        }
    }
}
