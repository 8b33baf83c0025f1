//! Commentary model
//!
//! [`CommentaryBook`] holds at most one [`Commentary`] per verse reference.
//! Inserting for a reference that already has one replaces it and moves it to
//! the end, so iteration order is the order commentaries were last written.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ulid::Ulid;

/// Unique commentary identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentaryId(pub Ulid);

impl CommentaryId {
    /// Generate new commentary ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for CommentaryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommentaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One titled section of a structured commentary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CommentarySection {
    /// Section heading
    pub title: String,
    /// Section body (markdown)
    pub body: String,
}

/// Commentary requested as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StructuredCommentary {
    /// One-paragraph overview
    pub summary: String,
    /// Ordered sections
    pub sections: Vec<CommentarySection>,
    /// Recurring themes
    pub key_themes: Vec<String>,
    /// Practical application
    pub application: String,
}

/// Commentary content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "content", rename_all = "lowercase")]
pub enum CommentaryPayload {
    /// Free markdown
    Markdown(String),
    /// Sectioned commentary
    Structured(StructuredCommentary),
}

impl CommentaryPayload {
    /// Render as markdown
    #[must_use]
    pub fn to_markdown(&self) -> String {
        match self {
            Self::Markdown(text) => text.clone(),
            Self::Structured(structured) => {
                let mut out = structured.summary.clone();
                for section in &structured.sections {
                    let _ = write!(out, "\n\n### {}\n\n{}", section.title, section.body);
                }
                if !structured.key_themes.is_empty() {
                    let _ = write!(out, "\n\n**Key themes:** {}", structured.key_themes.join(", "));
                }
                if !structured.application.is_empty() {
                    let _ = write!(out, "\n\n**Application:** {}", structured.application);
                }
                out
            }
        }
    }
}

/// Generated commentary for one verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commentary {
    /// Identifier
    pub id: CommentaryId,
    /// Verse this commentary explains
    pub verse_ref: String,
    /// Content
    pub commentary: CommentaryPayload,
    /// Generation time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Commentary {
    /// Create commentary with a fresh ID
    #[must_use]
    pub fn new(verse_ref: impl Into<String>, commentary: CommentaryPayload, timestamp: i64) -> Self {
        Self {
            id: CommentaryId::new(),
            verse_ref: verse_ref.into(),
            commentary,
            timestamp,
        }
    }
}

/// Commentaries keyed by verse reference
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Commentary>", into = "Vec<Commentary>")]
pub struct CommentaryBook {
    entries: IndexMap<String, Commentary>,
}

impl CommentaryBook {
    /// Create empty book
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any commentary for the same verse
    ///
    /// Returns the replaced commentary.
    pub fn upsert(&mut self, commentary: Commentary) -> Option<Commentary> {
        let previous = self.entries.shift_remove(&commentary.verse_ref);
        self.entries.insert(commentary.verse_ref.clone(), commentary);
        previous
    }

    /// Remove commentary for a verse
    pub fn remove(&mut self, verse_ref: &str) -> Option<Commentary> {
        self.entries.shift_remove(verse_ref)
    }

    /// Commentary for a verse
    #[inline]
    #[must_use]
    pub fn get(&self, verse_ref: &str) -> Option<&Commentary> {
        self.entries.get(verse_ref)
    }

    /// Check if a verse has commentary
    #[inline]
    #[must_use]
    pub fn contains(&self, verse_ref: &str) -> bool {
        self.entries.contains_key(verse_ref)
    }

    /// Commentaries in write order
    pub fn iter(&self) -> impl Iterator<Item = &Commentary> {
        self.entries.values()
    }

    /// Number of commentaries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if book is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Commentary>> for CommentaryBook {
    fn from(commentaries: Vec<Commentary>) -> Self {
        let mut book = Self::new();
        for commentary in commentaries {
            book.upsert(commentary);
        }
        book
    }
}

impl From<CommentaryBook> for Vec<Commentary> {
    fn from(book: CommentaryBook) -> Self {
        book.entries.into_values().collect()
    }
}

impl FromIterator<Commentary> for CommentaryBook {
    fn from_iter<I: IntoIterator<Item = Commentary>>(iter: I) -> Self {
        let mut book = Self::new();
        for commentary in iter {
            book.upsert(commentary);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn markdown(verse: &str, text: &str, timestamp: i64) -> Commentary {
        Commentary::new(verse, CommentaryPayload::Markdown(text.into()), timestamp)
    }

    #[test]
    fn upsert_replaces_and_moves_to_end() {
        let mut book = CommentaryBook::new();
        book.upsert(markdown("Gen 1:1", "first", 100));
        book.upsert(markdown("Gen 1:2", "second", 200));

        let replaced = book.upsert(markdown("Gen 1:1", "again", 300)).unwrap();
        assert_eq!(replaced.timestamp, 100);
        assert_eq!(book.len(), 2);

        let order: Vec<_> = book.iter().map(|c| c.verse_ref.as_str()).collect();
        assert_eq!(order, vec!["Gen 1:2", "Gen 1:1"]);
        assert_eq!(book.get("Gen 1:1").unwrap().timestamp, 300);
    }

    #[test]
    fn remove_entry() {
        let mut book: CommentaryBook = vec![markdown("Gen 1:1", "a", 1)].into();
        assert!(book.remove("Gen 1:1").is_some());
        assert!(book.remove("Gen 1:1").is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn from_list_keeps_last_duplicate() {
        let book: CommentaryBook = vec![
            markdown("Gen 1:1", "old", 1),
            markdown("Gen 1:1", "new", 2),
        ]
        .into();
        assert_eq!(book.len(), 1);
        assert_eq!(
            book.get("Gen 1:1").unwrap().commentary,
            CommentaryPayload::Markdown("new".into())
        );
    }

    #[test]
    fn serializes_as_list() {
        let book: CommentaryBook = vec![markdown("Gen 1:1", "text", 100)].into();
        let value = serde_json::to_value(&book).unwrap();

        assert!(value.is_array());
        assert_eq!(value[0]["verseRef"], "Gen 1:1");
        assert_eq!(value[0]["timestamp"], 100);
        assert_eq!(
            value[0]["commentary"],
            json!({ "format": "markdown", "content": "text" })
        );

        let back: CommentaryBook = serde_json::from_value(value).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn structured_renders_markdown() {
        let payload = CommentaryPayload::Structured(StructuredCommentary {
            summary: "God creates.".into(),
            sections: vec![CommentarySection {
                title: "Context".into(),
                body: "Opening of Genesis.".into(),
            }],
            key_themes: vec!["creation".into(), "order".into()],
            application: "Rest in the Creator.".into(),
        });

        assert_eq!(
            payload.to_markdown(),
            "God creates.\n\n### Context\n\nOpening of Genesis.\n\n**Key themes:** creation, order\n\n**Application:** Rest in the Creator."
        );
    }

    #[test]
    fn structured_schema_is_closed() {
        let schema = serde_json::to_value(schemars::schema_for!(StructuredCommentary)).unwrap();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["required"],
            json!(["application", "key_themes", "sections", "summary"])
        );
    }
}
