//! Scripture references and canon positions
//!
//! Provides [`ScriptureReference`] (`Book Chapter:Verse`) and the book-quantized
//! [`CanonPosition`] scalar used for timeline placement.

use crate::canon::Canon;
use crate::error::CanonError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// `<optional "<digit> "><book words> <chapter>:<verse>`
///
/// Anchored at the start only. Anything after the verse number (a range,
/// a suffix like `"16abc"`) is ignored.
static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d)\s+)?([A-Za-z]+(?:\s+[A-Za-z]+)*)\s+(\d+):(\d+)")
        .unwrap_or_else(|e| unreachable!("reference pattern is a literal: {e}"))
});

/// A resolved `Book Chapter:Verse` reference
///
/// `book` is always a name from the canon table the reference was resolved
/// against (including that canon's Psalms spelling).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptureReference {
    /// Canonical book name
    pub book: String,
    /// Chapter number
    pub chapter: u16,
    /// Verse number
    pub verse: u32,
}

impl ScriptureReference {
    /// Create reference from parts without validation
    #[inline]
    #[must_use]
    pub fn new(book: impl Into<String>, chapter: u16, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

impl Display for ScriptureReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for ScriptureReference {
    type Err = CanonError;

    /// Parse against the timeline canon ("Psalms" spelling)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Canon::timeline().parse(s)
    }
}

/// Reference split into parts, before the book is checked against a canon
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawReference {
    pub(crate) book: String,
    pub(crate) chapter: u16,
    pub(crate) verse: u32,
}

/// Drop any verse-range suffix (`John 3:16-18` → `John 3:16`)
#[inline]
pub(crate) fn strip_range(reference: &str) -> &str {
    reference.split('-').next().unwrap_or(reference).trim()
}

/// Split a reference string into book words, chapter and verse
pub(crate) fn split_reference(reference: &str) -> Result<RawReference, CanonError> {
    let trimmed = strip_range(reference);
    let malformed = || CanonError::Malformed(reference.to_string());

    let caps = REFERENCE_PATTERN.captures(trimmed).ok_or_else(malformed)?;

    let words = caps
        .get(2)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .ok_or_else(malformed)?;
    let book = match caps.get(1) {
        Some(digit) => format!("{} {words}", digit.as_str()),
        None => words,
    };

    let chapter = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(malformed)?;
    let verse = caps
        .get(4)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(malformed)?;

    Ok(RawReference {
        book,
        chapter,
        verse,
    })
}

/// Normalized position of a book within the canon, in `[0, 1)`
///
/// Quantized at the book level: every reference within one book shares a
/// position. Unknown books sit at [`CanonPosition::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonPosition(f64);

impl CanonPosition {
    /// Start of the canon (also the fallback for unknown books)
    pub const ZERO: Self = Self(0.0);

    /// Position of the book at 1-based canonical `order`
    #[inline]
    #[must_use]
    pub fn from_order(order: u8) -> Self {
        Self(f64::from(order.saturating_sub(1)) / crate::book::CANON_SIZE as f64)
    }

    /// Raw scalar value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering for sorting
    #[inline]
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Display for CanonPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        let raw = split_reference("John 3:16").unwrap();
        assert_eq!(raw.book, "John");
        assert_eq!(raw.chapter, 3);
        assert_eq!(raw.verse, 16);
    }

    #[test]
    fn split_numbered_book() {
        let raw = split_reference("1 Corinthians 13:4").unwrap();
        assert_eq!(raw.book, "1 Corinthians");
        assert_eq!(raw.chapter, 13);
        assert_eq!(raw.verse, 4);
    }

    #[test]
    fn split_multi_word_book() {
        let raw = split_reference("Song of  Solomon 2:1").unwrap();
        assert_eq!(raw.book, "Song of Solomon");
    }

    #[test]
    fn split_strips_range() {
        let raw = split_reference("Romans 8:28-30").unwrap();
        assert_eq!(raw.book, "Romans");
        assert_eq!(raw.verse, 28);
        assert_eq!(strip_range("  Jude 1:3 "), "Jude 1:3");
    }

    #[test]
    fn split_rejects_malformed() {
        assert!(matches!(
            split_reference("John 3"),
            Err(CanonError::Malformed(_))
        ));
        assert!(split_reference("").is_err());
        assert!(split_reference("3:16").is_err());
        assert!(split_reference("John three:16").is_err());
    }

    #[test]
    fn split_rejects_overflowing_chapter() {
        assert!(split_reference("John 99999999:1").is_err());
    }

    #[test]
    fn position_from_order() {
        assert_eq!(CanonPosition::from_order(1), CanonPosition::ZERO);
        assert!((CanonPosition::from_order(66).value() - 65.0 / 66.0).abs() < f64::EPSILON);
        assert!(CanonPosition::from_order(66).value() < 1.0);
    }

    #[test]
    fn reference_display() {
        let r = ScriptureReference::new("1 John", 4, 8);
        assert_eq!(r.to_string(), "1 John 4:8");
    }
}
