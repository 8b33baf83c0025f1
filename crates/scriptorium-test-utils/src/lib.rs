//! Testing utilities for Scriptorium workspace
//!
//! Scripted providers, recording generators, a stepping clock and passage
//! fixtures shared by integration tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scriptorium_completion::{
    Completion, CompletionError, CompletionOptions, CompletionProvider, Message, ProviderKind,
};
use scriptorium_study::{
    Clock, Commentary, CommentaryGenerator, CommentaryPayload, StudyError, StudyPassage, Verse,
};
use scriptorium_timeline::CrossReference;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};

/// One request seen by [`ScriptedProvider`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

/// Provider that answers from a queue and records every request
///
/// An empty queue answers with [`CompletionError::EmptyResponse`].
#[derive(Debug)]
pub struct ScriptedProvider {
    kind: ProviderKind,
    responses: Mutex<VecDeque<Result<Completion, CompletionError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn then_text(self, text: &str) -> Self {
        self.responses
            .lock()
            .push_back(Ok(Completion::text("scripted", text)));
        self
    }

    #[must_use]
    pub fn then_completion(self, completion: Completion) -> Self {
        self.responses.lock().push_back(Ok(completion));
        self
    }

    #[must_use]
    pub fn then_error(self, error: CompletionError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<Completion, CompletionError> {
        self.requests.lock().push(RecordedRequest {
            messages: messages.to_vec(),
            options: options.clone(),
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyResponse(self.kind)))
    }
}

/// One call seen by [`RecordingGenerator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCall {
    pub verse_ref: String,
    pub previous: Vec<Commentary>,
}

impl GeneratorCall {
    pub fn previous_refs(&self) -> Vec<&str> {
        self.previous.iter().map(|c| c.verse_ref.as_str()).collect()
    }
}

/// Generator that answers `"commentary on <verse>"` and records its context
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    calls: Mutex<Vec<GeneratorCall>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<GeneratorCall> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl CommentaryGenerator for RecordingGenerator {
    async fn generate(
        &self,
        verse_ref: &str,
        previous: &[Commentary],
    ) -> Result<CommentaryPayload, StudyError> {
        self.calls.lock().push(GeneratorCall {
            verse_ref: verse_ref.to_string(),
            previous: previous.to_vec(),
        });
        Ok(CommentaryPayload::Markdown(format!("commentary on {verse_ref}")))
    }
}

/// Generator that always fails
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CommentaryGenerator for FailingGenerator {
    async fn generate(&self, _: &str, _: &[Commentary]) -> Result<CommentaryPayload, StudyError> {
        Err(StudyError::Generator(self.message.clone()))
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug)]
pub struct StepClock {
    next: AtomicI64,
    step: i64,
}

impl StepClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// Markdown commentary fixture
pub fn commentary(verse_ref: &str, timestamp: i64) -> Commentary {
    Commentary::new(
        verse_ref,
        CommentaryPayload::Markdown(format!("notes on {verse_ref}")),
        timestamp,
    )
}

/// `Gen 1:1` .. `Gen 1:3`, abbreviated references as a study might use
pub fn genesis_passage() -> StudyPassage {
    StudyPassage::new(vec![
        Verse::new("Gen 1:1", "In the beginning God created the heaven and the earth."),
        Verse::new(
            "Gen 1:2",
            "And the earth was without form, and void; and darkness was upon the face of the deep.",
        ),
        Verse::new("Gen 1:3", "And God said, Let there be light: and there was light."),
    ])
    .with_title("Genesis 1")
}

/// Psalm 23:1-3 with the singular spelling used for passage text
pub fn psalm_passage() -> StudyPassage {
    StudyPassage::new(vec![
        Verse::new("Psalm 23:1", "The LORD is my shepherd; I shall not want."),
        Verse::new(
            "Psalm 23:2",
            "He maketh me to lie down in green pastures: he leadeth me beside the still waters.",
        ),
        Verse::new("Psalm 23:3", "He restoreth my soul."),
    ])
    .with_title("Psalm 23")
}

/// Cross-references for John 3:16
pub fn john_cross_references() -> Vec<CrossReference> {
    vec![
        CrossReference::new("Genesis 22:8").with_connection("provision of the lamb"),
        CrossReference::new("Numbers 21:9").with_connection("lifted up"),
        CrossReference::new("Isaiah 53:5").with_text("he was wounded for our transgressions"),
        CrossReference::new("Romans 5:8"),
        CrossReference::new("1 John 4:9"),
        CrossReference::new("NotABook 1:1"),
    ]
}
