//! Study session
//!
//! [`StudySession`] ties a passage, its commentary book, the accumulator and a
//! generator together. The book is only written after a generation succeeds,
//! so a failed request leaves it unchanged. Saves are serialized and each one
//! snapshots the book under the save lock, so the last save holds every entry.

use crate::accumulator::CommentaryAccumulator;
use crate::commentary::{Commentary, CommentaryBook};
use crate::config::GenerationSettings;
use crate::error::StudyError;
use crate::generator::{CommentaryGenerator, PromptedGenerator};
use crate::passage::StudyPassage;
use crate::store::CommentaryStore;
use parking_lot::RwLock;
use scriptorium_completion::CompletionProvider;
use std::fmt;
use std::sync::Arc;

/// One user's study of one passage
pub struct StudySession {
    passage: StudyPassage,
    book: RwLock<CommentaryBook>,
    accumulator: CommentaryAccumulator,
    generator: Arc<dyn CommentaryGenerator>,
    store: Option<Arc<dyn CommentaryStore>>,
    persist_lock: tokio::sync::Mutex<()>,
}

impl StudySession {
    /// Create session with an empty book
    #[must_use]
    pub fn new(passage: StudyPassage, generator: Arc<dyn CommentaryGenerator>) -> Self {
        Self {
            passage,
            book: RwLock::new(CommentaryBook::new()),
            accumulator: CommentaryAccumulator::new(),
            generator,
            store: None,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Create session generating through a completion provider
    #[must_use]
    pub fn with_provider(
        passage: StudyPassage,
        provider: Arc<dyn CompletionProvider>,
        settings: GenerationSettings,
    ) -> Self {
        let generator = PromptedGenerator::new(provider, passage.clone()).with_settings(settings);
        Self::new(passage, Arc::new(generator))
    }

    /// With an existing book
    #[inline]
    #[must_use]
    pub fn with_book(self, book: CommentaryBook) -> Self {
        *self.book.write() = book;
        self
    }

    /// With a different accumulator (e.g. another clock)
    #[inline]
    #[must_use]
    pub fn with_accumulator(mut self, accumulator: CommentaryAccumulator) -> Self {
        self.accumulator = accumulator;
        self
    }

    /// With a store; every successful generation saves the whole book
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CommentaryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Load the book from the configured store
    ///
    /// # Errors
    /// - [`StudyError::Store`] if loading fails
    pub async fn restore(&self) -> Result<usize, StudyError> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let loaded = store.load().await?;
        let count = loaded.len();
        *self.book.write() = loaded;
        tracing::info!("restored {} commentaries", count);
        Ok(count)
    }

    /// Passage under study
    #[inline]
    #[must_use]
    pub fn passage(&self) -> &StudyPassage {
        &self.passage
    }

    /// Snapshot of the commentary book
    #[must_use]
    pub fn book(&self) -> CommentaryBook {
        self.book.read().clone()
    }

    /// Existing commentary for a verse
    #[must_use]
    pub fn commentary(&self, verse_ref: &str) -> Option<Commentary> {
        self.book.read().get(verse_ref).cloned()
    }

    /// Check if a verse is generating right now
    #[inline]
    #[must_use]
    pub fn is_generating(&self, verse_ref: &str) -> bool {
        self.accumulator.is_generating(verse_ref)
    }

    /// Commentary for a verse, generating it if there is none yet
    ///
    /// # Errors
    /// - [`StudyError::UnknownVerse`] if the verse is not in the passage
    /// - [`StudyError::AlreadyGenerating`] if a request for it is in flight
    /// - the generator's error if generation fails
    /// - [`StudyError::Store`] if saving fails (the book keeps the new entry)
    pub async fn commentary_for(&self, verse_ref: &str) -> Result<Commentary, StudyError> {
        self.ensure_in_passage(verse_ref)?;
        let existing = self.commentary(verse_ref);
        if let Some(existing) = existing {
            return Ok(existing);
        }
        self.generate(verse_ref).await
    }

    /// Generate a fresh commentary for a verse, replacing any existing one
    ///
    /// The old commentary stays in place until the new one is ready.
    ///
    /// # Errors
    /// Same as [`Self::commentary_for`]
    pub async fn regenerate(&self, verse_ref: &str) -> Result<Commentary, StudyError> {
        self.ensure_in_passage(verse_ref)?;
        self.generate(verse_ref).await
    }

    /// Drop the commentary for a verse
    ///
    /// # Errors
    /// - [`StudyError::Store`] if saving fails
    pub async fn discard(&self, verse_ref: &str) -> Result<Option<Commentary>, StudyError> {
        let removed = self.book.write().remove(verse_ref);
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed)
    }

    fn ensure_in_passage(&self, verse_ref: &str) -> Result<(), StudyError> {
        if self.passage.verse(verse_ref).is_none() {
            return Err(StudyError::UnknownVerse(verse_ref.to_string()));
        }
        Ok(())
    }

    async fn generate(&self, verse_ref: &str) -> Result<Commentary, StudyError> {
        let _guard = self.accumulator.begin(verse_ref)?;

        let snapshot = self.book();
        let order = self.passage.references();
        let commentary = self
            .accumulator
            .generate_for(verse_ref, &order, &snapshot, self.generator.as_ref())
            .await?;

        let replaced = self.book.write().upsert(commentary.clone());
        if let Some(old) = replaced {
            tracing::debug!("replaced commentary {} for {}", old.id, verse_ref);
        }
        self.persist().await?;
        Ok(commentary)
    }

    async fn persist(&self) -> Result<(), StudyError> {
        if let Some(store) = &self.store {
            let _persisting = self.persist_lock.lock().await;
            let snapshot = self.book();
            store.save(&snapshot).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("verses", &self.passage.len())
            .field("commentaries", &self.book.read().len())
            .field("accumulator", &self.accumulator)
            .field("has_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Clock;
    use crate::commentary::CommentaryPayload;
    use crate::passage::Verse;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    struct TickClock(AtomicI64);

    impl Clock for TickClock {
        fn now_millis(&self) -> i64 {
            self.0.fetch_add(100, Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        contexts: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl CommentaryGenerator for Counting {
        async fn generate(
            &self,
            verse_ref: &str,
            previous: &[Commentary],
        ) -> Result<CommentaryPayload, StudyError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.contexts
                .lock()
                .push(previous.iter().map(|c| c.verse_ref.clone()).collect());
            if self.fail {
                return Err(StudyError::Generator("down".into()));
            }
            Ok(CommentaryPayload::Markdown(format!("{verse_ref} #{n}")))
        }
    }

    fn passage() -> StudyPassage {
        StudyPassage::new(vec![
            Verse::new("Gen 1:1", "In the beginning God created the heaven and the earth."),
            Verse::new("Gen 1:2", "And the earth was without form, and void."),
            Verse::new("Gen 1:3", "And God said, Let there be light: and there was light."),
        ])
    }

    fn session(generator: Arc<Counting>) -> StudySession {
        StudySession::new(passage(), generator)
            .with_accumulator(CommentaryAccumulator::new().with_clock(TickClock(AtomicI64::new(100))))
    }

    #[tokio::test]
    async fn generates_once_then_reuses() {
        let generator = Arc::new(Counting::default());
        let session = session(Arc::clone(&generator));

        let first = session.commentary_for("Gen 1:1").await.unwrap();
        let second = session.commentary_for("Gen 1:1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.book().len(), 1);
    }

    #[tokio::test]
    async fn later_verses_see_earlier_commentary() {
        let generator = Arc::new(Counting::default());
        let session = session(Arc::clone(&generator));

        session.commentary_for("Gen 1:2").await.unwrap();
        session.commentary_for("Gen 1:1").await.unwrap();
        session.commentary_for("Gen 1:3").await.unwrap();

        let contexts = generator.contexts.lock().clone();
        assert_eq!(contexts[0], Vec::<String>::new());
        assert_eq!(contexts[1], Vec::<String>::new());
        assert_eq!(contexts[2], vec!["Gen 1:2".to_string(), "Gen 1:1".to_string()]);
    }

    #[tokio::test]
    async fn regenerate_replaces_with_later_timestamp() {
        let generator = Arc::new(Counting::default());
        let session = session(Arc::clone(&generator));

        let first = session.commentary_for("Gen 1:1").await.unwrap();
        let second = session.regenerate("Gen 1:1").await.unwrap();

        let book = session.book();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("Gen 1:1").unwrap().id, second.id);
        assert!(second.timestamp > first.timestamp);
    }

    #[tokio::test]
    async fn failure_leaves_book_unchanged() {
        let existing = Commentary::new("Gen 1:1", CommentaryPayload::Markdown("kept".into()), 1);
        let generator = Arc::new(Counting {
            fail: true,
            ..Counting::default()
        });
        let session = session(generator).with_book(vec![existing.clone()].into());

        let err = session.regenerate("Gen 1:1").await.unwrap_err();
        assert!(matches!(err, StudyError::Generator(_)));
        assert_eq!(session.commentary("Gen 1:1"), Some(existing));
        assert!(!session.is_generating("Gen 1:1"));
    }

    #[tokio::test]
    async fn unknown_verse_rejected() {
        let generator = Arc::new(Counting::default());
        let session = session(Arc::clone(&generator));

        let err = session.commentary_for("Gen 50:26").await.unwrap_err();
        assert!(matches!(err, StudyError::UnknownVerse(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_receives_book_and_restores() {
        let store = Arc::new(MemoryStore::new());
        let generator = Arc::new(Counting::default());
        let session = session(Arc::clone(&generator)).with_store(store.clone());

        session.commentary_for("Gen 1:1").await.unwrap();
        assert_eq!(store.snapshot().len(), 1);

        session.discard("Gen 1:1").await.unwrap();
        assert!(store.snapshot().is_empty());

        session.commentary_for("Gen 1:2").await.unwrap();
        let reopened = StudySession::new(passage(), generator).with_store(store);
        assert_eq!(reopened.restore().await.unwrap(), 1);
        assert!(reopened.commentary("Gen 1:2").is_some());
    }
}
