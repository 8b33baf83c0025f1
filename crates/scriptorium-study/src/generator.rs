//! Commentary generators
//!
//! [`CommentaryGenerator`] is the per-verse generation seam used by the
//! accumulator. [`PromptedGenerator`] implements it over a completion provider.

use crate::commentary::{Commentary, CommentaryPayload, StructuredCommentary};
use crate::config::GenerationSettings;
use crate::error::StudyError;
use crate::passage::StudyPassage;
use crate::prompts::{user_prompt, MARKDOWN_INSTRUCTIONS, STRUCTURED_INSTRUCTIONS, SYSTEM_PROMPT};
use async_trait::async_trait;
use scriptorium_completion::{
    CompletionError, CompletionOptions, CompletionProvider, Message, OutputFormat,
};
use std::fmt;
use std::sync::Arc;

/// Produces commentary for one verse given earlier commentaries
#[async_trait]
pub trait CommentaryGenerator: Send + Sync {
    /// Generate commentary for `verse_ref`
    ///
    /// `previous` holds commentaries for earlier verses, oldest first.
    async fn generate(
        &self,
        verse_ref: &str,
        previous: &[Commentary],
    ) -> Result<CommentaryPayload, StudyError>;
}

/// Generator backed by a completion provider
pub struct PromptedGenerator {
    provider: Arc<dyn CompletionProvider>,
    passage: StudyPassage,
    settings: GenerationSettings,
}

impl PromptedGenerator {
    /// Create generator for a passage
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, passage: StudyPassage) -> Self {
        Self {
            provider,
            passage,
            settings: GenerationSettings::default(),
        }
    }

    /// With generation settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Passage this generator reads verse text from
    #[inline]
    #[must_use]
    pub fn passage(&self) -> &StudyPassage {
        &self.passage
    }

    fn options(&self) -> Result<CompletionOptions, CompletionError> {
        let mut options = CompletionOptions::new()
            .with_temperature(self.settings.temperature)
            .grounded(self.settings.grounded);
        if let Some(model) = &self.settings.model {
            options = options.with_model(model.clone());
        }
        if let Some(max) = self.settings.max_output_tokens {
            options = options.with_max_output_tokens(max);
        }
        if self.settings.structured {
            options = options.with_output(OutputFormat::json_schema_for::<StructuredCommentary>(
                "commentary",
            )?);
        }
        Ok(options)
    }
}

impl fmt::Debug for PromptedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptedGenerator")
            .field("provider", &self.provider.kind())
            .field("verses", &self.passage.len())
            .field("settings", &self.settings)
            .finish()
    }
}

#[async_trait]
impl CommentaryGenerator for PromptedGenerator {
    async fn generate(
        &self,
        verse_ref: &str,
        previous: &[Commentary],
    ) -> Result<CommentaryPayload, StudyError> {
        let verse = self
            .passage
            .verse(verse_ref)
            .ok_or_else(|| StudyError::UnknownVerse(verse_ref.to_string()))?;

        let format_instructions = if self.settings.structured {
            STRUCTURED_INSTRUCTIONS
        } else {
            MARKDOWN_INSTRUCTIONS
        };
        let messages = [
            Message::system(format!("{SYSTEM_PROMPT}\n\n{format_instructions}")),
            Message::user(user_prompt(verse, &self.passage, previous)),
        ];
        let options = self.options()?;

        tracing::debug!(
            "requesting commentary for {} from {} (structured={})",
            verse_ref,
            self.provider.kind(),
            self.settings.structured
        );
        let completion = self.provider.complete(&messages, &options).await?;

        if let Some(grounding) = &completion.grounding {
            tracing::debug!(
                "commentary for {} grounded in {} sources",
                verse_ref,
                grounding.sources.len()
            );
        }

        if self.settings.structured {
            Ok(CommentaryPayload::Structured(completion.parse_structured()?))
        } else {
            completion
                .as_text()
                .map(|text| CommentaryPayload::Markdown(text.to_string()))
                .ok_or_else(|| {
                    StudyError::Generator("provider returned json for a markdown request".into())
                })
        }
    }
}
