//! Ordered verses under study

use scriptorium_canon::Canon;
use serde::{Deserialize, Serialize};

/// One verse with its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Reference string, e.g. `"Psalm 23:1"`
    pub reference: String,
    /// Verse text in the chosen translation
    pub text: String,
}

impl Verse {
    /// Create verse
    #[inline]
    #[must_use]
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
        }
    }
}

/// Verses in study order
///
/// Order is the sequence chosen for the study, not canonical order. Context
/// for a verse is drawn from the verses before it in this list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudyPassage {
    /// Optional heading, e.g. `"Psalm 23"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Verses in study order
    pub verses: Vec<Verse>,
}

impl StudyPassage {
    /// Create passage from verses
    #[must_use]
    pub fn new(verses: Vec<Verse>) -> Self {
        Self {
            title: None,
            verses,
        }
    }

    /// With a heading
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// References in study order
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        self.verses.iter().map(|v| v.reference.as_str()).collect()
    }

    /// Verse by reference
    #[must_use]
    pub fn verse(&self, reference: &str) -> Option<&Verse> {
        self.verses.iter().find(|v| v.reference == reference)
    }

    /// Index of a reference in study order
    #[must_use]
    pub fn position(&self, reference: &str) -> Option<usize> {
        self.verses.iter().position(|v| v.reference == reference)
    }

    /// References the canon cannot resolve
    ///
    /// Passage text comes from an external source, so use a
    /// [`Canon::passage_lookup`] canon here.
    #[must_use]
    pub fn unresolved<'a>(&'a self, canon: &Canon) -> Vec<&'a str> {
        self.verses
            .iter()
            .map(|v| v.reference.as_str())
            .filter(|r| canon.resolve(r).is_none())
            .collect()
    }

    /// Number of verses
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Check if passage is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn psalm() -> StudyPassage {
        StudyPassage::new(vec![
            Verse::new("Psalm 23:1", "The LORD is my shepherd; I shall not want."),
            Verse::new("Psalm 23:2", "He maketh me to lie down in green pastures."),
        ])
        .with_title("Psalm 23")
    }

    #[test]
    fn lookup_and_order() {
        let passage = psalm();
        assert_eq!(passage.references(), vec!["Psalm 23:1", "Psalm 23:2"]);
        assert_eq!(passage.position("Psalm 23:2"), Some(1));
        assert!(passage.verse("Psalm 23:3").is_none());
        assert_eq!(passage.len(), 2);
    }

    #[test]
    fn unresolved_depends_on_spelling() {
        let passage = psalm();
        assert!(passage.unresolved(&Canon::passage_lookup()).is_empty());
        assert_eq!(passage.unresolved(&Canon::timeline()).len(), 2);
    }

    #[test]
    fn deserialize_without_title() {
        let passage: StudyPassage = serde_json::from_str(
            r#"{ "verses": [{ "reference": "John 1:1", "text": "In the beginning was the Word" }] }"#,
        )
        .unwrap();
        assert!(passage.title.is_none());
        assert_eq!(passage.verses[0].reference, "John 1:1");
    }
}
