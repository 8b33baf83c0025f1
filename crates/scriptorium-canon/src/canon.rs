//! Canon lookup and reference resolution
//!
//! [`Canon`] is the table-driven resolver. It is cheap to copy; the only state
//! it carries is the Psalms spelling of its call site.

use crate::book::{Book, PsalmsSpelling, Testament, BOOKS};
use crate::error::CanonError;
use crate::reference::{split_reference, CanonPosition, ScriptureReference};

/// Resolver over the fixed 66-book canon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Canon {
    psalms: PsalmsSpelling,
}

impl Canon {
    /// Create canon with the given Psalms spelling
    #[inline]
    #[must_use]
    pub const fn new(psalms: PsalmsSpelling) -> Self {
        Self { psalms }
    }

    /// Canon used for timeline positions and clustering ("Psalms")
    #[inline]
    #[must_use]
    pub const fn timeline() -> Self {
        Self::new(PsalmsSpelling::Plural)
    }

    /// Canon used when looking up passage text ("Psalm")
    #[inline]
    #[must_use]
    pub const fn passage_lookup() -> Self {
        Self::new(PsalmsSpelling::Singular)
    }

    /// Psalms spelling of this canon
    #[inline]
    #[must_use]
    pub fn psalms_spelling(&self) -> PsalmsSpelling {
        self.psalms
    }

    /// Book entry by exact name under this canon's spelling
    #[must_use]
    pub fn book(&self, name: &str) -> Option<&'static Book> {
        BOOKS.iter().find(|b| b.name_with(self.psalms) == name)
    }

    /// All books in canonical order
    #[inline]
    pub fn books(&self) -> impl Iterator<Item = &'static Book> {
        BOOKS.iter()
    }

    /// Name of `book` as this canon spells it
    #[inline]
    #[must_use]
    pub fn name_of(&self, book: &Book) -> &'static str {
        book.name_with(self.psalms)
    }

    /// Resolve a reference string
    ///
    /// Returns `None` for malformed input or a book outside the canon. This is
    /// the expected outcome for bad data, never a partial guess.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<ScriptureReference> {
        match self.parse(reference) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                tracing::debug!("reference did not resolve: {}", e);
                None
            }
        }
    }

    /// Resolve a reference string, reporting why it failed
    ///
    /// # Errors
    /// - [`CanonError::Malformed`] if the string is not `Book Chapter:Verse`
    /// - [`CanonError::UnknownBook`] if the book is not in this canon
    pub fn parse(&self, reference: &str) -> Result<ScriptureReference, CanonError> {
        let raw = split_reference(reference)?;
        let book = self
            .book(&raw.book)
            .ok_or_else(|| CanonError::UnknownBook(raw.book.clone()))?;

        Ok(ScriptureReference::new(
            self.name_of(book),
            raw.chapter,
            raw.verse,
        ))
    }

    /// Testament of a book, `None` if the name is in neither list
    #[inline]
    #[must_use]
    pub fn testament(&self, book: &str) -> Option<Testament> {
        self.book(book).map(|b| b.testament)
    }

    /// Normalized position of a book: `(order - 1) / 66`
    ///
    /// Unknown books resolve to [`CanonPosition::ZERO`]. This coarse fallback
    /// is intended behavior.
    #[inline]
    #[must_use]
    pub fn canon_position(&self, book: &str) -> CanonPosition {
        self.book(book)
            .map_or(CanonPosition::ZERO, |b| CanonPosition::from_order(b.order))
    }

    /// Position of a resolved reference (chapter and verse do not refine it)
    #[inline]
    #[must_use]
    pub fn position_of(&self, reference: &ScriptureReference) -> CanonPosition {
        self.canon_position(&reference.book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_basic() {
        let canon = Canon::timeline();
        assert_eq!(
            canon.resolve("Genesis 1:1"),
            Some(ScriptureReference::new("Genesis", 1, 1))
        );
        assert_eq!(
            canon.resolve("Revelation 22:21"),
            Some(ScriptureReference::new("Revelation", 22, 21))
        );
    }

    #[test]
    fn resolve_unknown_book_is_none() {
        let canon = Canon::timeline();
        assert_eq!(canon.resolve("NotABook 1:1"), None);
        assert_eq!(canon.resolve("Gen 1:1"), None);
        assert_eq!(
            canon.parse("NotABook 1:1"),
            Err(CanonError::UnknownBook("NotABook".to_string()))
        );
    }

    #[test]
    fn resolve_malformed_is_none() {
        let canon = Canon::timeline();
        assert_eq!(canon.resolve("John"), None);
        assert_eq!(canon.resolve("John 3:"), None);
    }

    #[test]
    fn resolve_range_suffix() {
        let canon = Canon::timeline();
        assert_eq!(
            canon.resolve("Isaiah 53:4-6"),
            Some(ScriptureReference::new("Isaiah", 53, 4))
        );
    }

    #[test]
    fn resolve_ignores_trailing_text() {
        let canon = Canon::timeline();
        assert_eq!(
            canon.resolve("John 3:16abc"),
            Some(ScriptureReference::new("John", 3, 16))
        );
    }

    #[test]
    fn timeline_canon_uses_plural_psalms() {
        let canon = Canon::timeline();
        assert_eq!(
            canon.resolve("Psalms 23:1"),
            Some(ScriptureReference::new("Psalms", 23, 1))
        );
        assert_eq!(canon.resolve("Psalm 23:1"), None);
        assert_eq!(canon.canon_position("Psalms"), CanonPosition::from_order(19));
        assert_eq!(canon.canon_position("Psalm"), CanonPosition::ZERO);
    }

    #[test]
    fn passage_canon_uses_singular_psalm() {
        let canon = Canon::passage_lookup();
        assert_eq!(
            canon.resolve("Psalm 23:1"),
            Some(ScriptureReference::new("Psalm", 23, 1))
        );
        assert_eq!(canon.resolve("Psalms 23:1"), None);
        assert_eq!(canon.testament("Psalm"), Some(Testament::Old));
    }

    #[test]
    fn testament_lookup() {
        let canon = Canon::timeline();
        assert_eq!(canon.testament("Genesis"), Some(Testament::Old));
        assert_eq!(canon.testament("Malachi"), Some(Testament::Old));
        assert_eq!(canon.testament("Matthew"), Some(Testament::New));
        assert_eq!(canon.testament("NotABook"), None);
    }

    #[test]
    fn position_quantized_by_book() {
        let canon = Canon::timeline();
        let a = canon.resolve("Genesis 1:1").unwrap();
        let b = canon.resolve("Genesis 50:26").unwrap();
        assert_eq!(canon.position_of(&a), canon.position_of(&b));
        assert_eq!(canon.canon_position("Genesis").value(), 0.0);
        assert!(canon.canon_position("Exodus") > canon.canon_position("Genesis"));
    }

    #[test]
    fn unknown_book_position_is_zero() {
        assert_eq!(
            Canon::timeline().canon_position("NotABook"),
            CanonPosition::ZERO
        );
    }

    #[test]
    fn from_str_uses_timeline_canon() {
        let r: ScriptureReference = "Psalms 119:105".parse().unwrap();
        assert_eq!(r.book, "Psalms");
        assert!("Psalm 119:105".parse::<ScriptureReference>().is_err());
    }
}
