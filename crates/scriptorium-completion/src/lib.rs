//! Scriptorium Completion
//!
//! One async seam over hosted language models:
//! - [`CompletionProvider`]: the capability every backend implements
//! - [`OpenAiProvider`] / [`GeminiProvider`]: HTTP backends
//! - [`OutputFormat`]: plain text or JSON validated against a schema
//! - [`GroundingMetadata`]: which web sources back a grounded answer
//! - [`ProviderRegistry`]: configured backends keyed by [`ProviderKind`]
//!
//! Providers never retry. [`CompletionError::is_retryable`] tells callers
//! whether a manual retry could help.
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptorium_completion::{CompletionOptions, Message, ProviderRegistry, ProvidersConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::from_config(&ProvidersConfig::default())?;
//! let provider = registry.default_provider()?;
//!
//! let completion = provider
//!     .complete(&[Message::user("Summarize Psalm 23")], &CompletionOptions::new())
//!     .await?;
//! println!("{}", completion.as_text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod completion;
mod config;
mod error;
mod gemini;
mod message;
mod openai;
mod provider;
mod registry;
pub mod schema;

pub use completion::{
    Completion, GroundingMetadata, GroundingSource, GroundingSupport, Payload, TokenUsage,
};
pub use config::{ProviderSettings, ProvidersConfig};
pub use error::CompletionError;
pub use gemini::{GeminiProvider, GEMINI_BASE_URL};
pub use message::{CompletionOptions, Message, OutputFormat, Role};
pub use openai::{OpenAiProvider, OPENAI_BASE_URL};
pub use provider::{finish_payload, CompletionProvider, ProviderKind};
pub use registry::ProviderRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
