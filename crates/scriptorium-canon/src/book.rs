//! The fixed 66-book canon table
//!
//! Provides [`Book`] entries in canonical order with their chapter counts and
//! [`Testament`] membership.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Number of books in the canon
pub const CANON_SIZE: usize = 66;

/// Number of Old Testament books
pub const OLD_TESTAMENT_SIZE: usize = 39;

/// Testament a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    /// Genesis through Malachi
    Old,
    /// Matthew through Revelation
    New,
}

impl Testament {
    /// Lowercase label (`old` / `new`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Testament::Old => "old",
            Testament::New => "new",
        }
    }
}

impl Display for Testament {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spelling of the Psalms book name used at a particular call site
///
/// The position table and the passage-text lookup disagree on this name, so
/// each [`Canon`](crate::Canon) carries its own spelling rather than sharing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PsalmsSpelling {
    /// "Psalms"
    #[default]
    Plural,
    /// "Psalm"
    Singular,
}

impl PsalmsSpelling {
    /// Book name under this spelling
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PsalmsSpelling::Plural => "Psalms",
            PsalmsSpelling::Singular => "Psalm",
        }
    }
}

/// One book of the canon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Book {
    /// Canonical name (Psalms in its plural form)
    pub name: &'static str,
    /// 1-based position in canonical order
    pub order: u8,
    /// Number of chapters
    pub chapters: u16,
    /// Testament membership
    pub testament: Testament,
}

impl Book {
    const fn ot(name: &'static str, order: u8, chapters: u16) -> Self {
        Self {
            name,
            order,
            chapters,
            testament: Testament::Old,
        }
    }

    const fn nt(name: &'static str, order: u8, chapters: u16) -> Self {
        Self {
            name,
            order,
            chapters,
            testament: Testament::New,
        }
    }

    /// Whether this entry is the Psalms book
    #[inline]
    #[must_use]
    pub fn is_psalms(&self) -> bool {
        self.order == 19
    }

    /// Name of this book under the given Psalms spelling
    #[inline]
    #[must_use]
    pub fn name_with(&self, spelling: PsalmsSpelling) -> &'static str {
        if self.is_psalms() {
            spelling.name()
        } else {
            self.name
        }
    }

    /// Check if a chapter number exists in this book
    #[inline]
    #[must_use]
    pub fn has_chapter(&self, chapter: u16) -> bool {
        (1..=self.chapters).contains(&chapter)
    }
}

/// All books in canonical order
pub static BOOKS: [Book; CANON_SIZE] = [
    Book::ot("Genesis", 1, 50),
    Book::ot("Exodus", 2, 40),
    Book::ot("Leviticus", 3, 27),
    Book::ot("Numbers", 4, 36),
    Book::ot("Deuteronomy", 5, 34),
    Book::ot("Joshua", 6, 24),
    Book::ot("Judges", 7, 21),
    Book::ot("Ruth", 8, 4),
    Book::ot("1 Samuel", 9, 31),
    Book::ot("2 Samuel", 10, 24),
    Book::ot("1 Kings", 11, 22),
    Book::ot("2 Kings", 12, 25),
    Book::ot("1 Chronicles", 13, 29),
    Book::ot("2 Chronicles", 14, 36),
    Book::ot("Ezra", 15, 10),
    Book::ot("Nehemiah", 16, 13),
    Book::ot("Esther", 17, 10),
    Book::ot("Job", 18, 42),
    Book::ot("Psalms", 19, 150),
    Book::ot("Proverbs", 20, 31),
    Book::ot("Ecclesiastes", 21, 12),
    Book::ot("Song of Solomon", 22, 8),
    Book::ot("Isaiah", 23, 66),
    Book::ot("Jeremiah", 24, 52),
    Book::ot("Lamentations", 25, 5),
    Book::ot("Ezekiel", 26, 48),
    Book::ot("Daniel", 27, 12),
    Book::ot("Hosea", 28, 14),
    Book::ot("Joel", 29, 3),
    Book::ot("Amos", 30, 9),
    Book::ot("Obadiah", 31, 1),
    Book::ot("Jonah", 32, 4),
    Book::ot("Micah", 33, 7),
    Book::ot("Nahum", 34, 3),
    Book::ot("Habakkuk", 35, 3),
    Book::ot("Zephaniah", 36, 3),
    Book::ot("Haggai", 37, 2),
    Book::ot("Zechariah", 38, 14),
    Book::ot("Malachi", 39, 4),
    Book::nt("Matthew", 40, 28),
    Book::nt("Mark", 41, 16),
    Book::nt("Luke", 42, 24),
    Book::nt("John", 43, 21),
    Book::nt("Acts", 44, 28),
    Book::nt("Romans", 45, 16),
    Book::nt("1 Corinthians", 46, 16),
    Book::nt("2 Corinthians", 47, 13),
    Book::nt("Galatians", 48, 6),
    Book::nt("Ephesians", 49, 6),
    Book::nt("Philippians", 50, 4),
    Book::nt("Colossians", 51, 4),
    Book::nt("1 Thessalonians", 52, 5),
    Book::nt("2 Thessalonians", 53, 3),
    Book::nt("1 Timothy", 54, 6),
    Book::nt("2 Timothy", 55, 4),
    Book::nt("Titus", 56, 3),
    Book::nt("Philemon", 57, 1),
    Book::nt("Hebrews", 58, 13),
    Book::nt("James", 59, 5),
    Book::nt("1 Peter", 60, 5),
    Book::nt("2 Peter", 61, 3),
    Book::nt("1 John", 62, 5),
    Book::nt("2 John", 63, 1),
    Book::nt("3 John", 64, 1),
    Book::nt("Jude", 65, 1),
    Book::nt("Revelation", 66, 22),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_in_order() {
        for (i, book) in BOOKS.iter().enumerate() {
            assert_eq!(usize::from(book.order), i + 1, "{} out of order", book.name);
        }
    }

    #[test]
    fn testament_split() {
        let old = BOOKS.iter().filter(|b| b.testament == Testament::Old).count();
        let new = BOOKS.iter().filter(|b| b.testament == Testament::New).count();
        assert_eq!(old, OLD_TESTAMENT_SIZE);
        assert_eq!(new, CANON_SIZE - OLD_TESTAMENT_SIZE);
        assert!(BOOKS[..OLD_TESTAMENT_SIZE]
            .iter()
            .all(|b| b.testament == Testament::Old));
    }

    #[test]
    fn psalms_spelling() {
        let psalms = &BOOKS[18];
        assert!(psalms.is_psalms());
        assert_eq!(psalms.name_with(PsalmsSpelling::Plural), "Psalms");
        assert_eq!(psalms.name_with(PsalmsSpelling::Singular), "Psalm");
        assert_eq!(BOOKS[0].name_with(PsalmsSpelling::Singular), "Genesis");
    }

    #[test]
    fn chapter_bounds() {
        let obadiah = &BOOKS[30];
        assert!(obadiah.has_chapter(1));
        assert!(!obadiah.has_chapter(2));
        assert!(!obadiah.has_chapter(0));
    }
}
