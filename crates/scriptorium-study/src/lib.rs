//! Scriptorium Study
//!
//! Commentary generation for an ordered passage, where each verse's
//! commentary builds on the commentaries already written for earlier verses:
//! - [`CommentaryAccumulator`]: selects prior commentaries and calls the generator
//! - [`CommentaryBook`]: at most one [`Commentary`] per verse, upsert semantics
//! - [`PromptedGenerator`]: prompt templates over a completion provider
//! - [`StudySession`]: passage, book, soft lock and optional [`CommentaryStore`]
//! - [`StudyConfig`]: TOML configuration for providers, generation and timeline
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptorium_completion::ProviderRegistry;
//! use scriptorium_study::{StudyConfig, StudyPassage, StudySession, Verse};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudyConfig::load("scriptorium.toml")?;
//! let registry = ProviderRegistry::from_config(&config.providers)?;
//!
//! let passage = StudyPassage::new(vec![
//!     Verse::new("Psalm 23:1", "The LORD is my shepherd; I shall not want."),
//!     Verse::new("Psalm 23:2", "He maketh me to lie down in green pastures."),
//! ]);
//! let session =
//!     StudySession::with_provider(passage, registry.default_provider()?, config.generation);
//!
//! session.commentary_for("Psalm 23:1").await?;
//! let second = session.commentary_for("Psalm 23:2").await?;
//! println!("{}", second.commentary.to_markdown());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod accumulator;
mod commentary;
mod config;
mod error;
mod generator;
mod passage;
pub mod prompts;
mod session;
mod store;

pub use accumulator::{select_context, Clock, CommentaryAccumulator, InFlight, SystemClock};
pub use commentary::{
    Commentary, CommentaryBook, CommentaryId, CommentaryPayload, CommentarySection,
    StructuredCommentary,
};
pub use config::{GenerationSettings, StudyConfig, TimelineSettings};
pub use error::{ConfigError, StoreError, StudyError};
pub use generator::{CommentaryGenerator, PromptedGenerator};
pub use passage::{StudyPassage, Verse};
pub use session::StudySession;
pub use store::{CommentaryStore, JsonFileStore, MemoryStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
