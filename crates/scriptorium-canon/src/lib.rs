//! Scriptorium Canon
//!
//! The fixed 66-book canon and everything derived from it:
//! - Parsing `Book Chapter:Verse` strings into [`ScriptureReference`]
//! - Old/New [`Testament`] classification
//! - Book-quantized [`CanonPosition`] in `[0, 1)`
//!
//! # Example
//!
//! ```rust
//! use scriptorium_canon::{Canon, Testament};
//!
//! let canon = Canon::timeline();
//! let reference = canon.resolve("John 3:16-18").unwrap();
//! assert_eq!(reference.book, "John");
//! assert_eq!(canon.testament("John"), Some(Testament::New));
//! assert_eq!(canon.canon_position("Genesis").value(), 0.0);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod book;
mod canon;
mod error;
mod reference;

pub use book::{Book, PsalmsSpelling, Testament, BOOKS, CANON_SIZE, OLD_TESTAMENT_SIZE};
pub use canon::Canon;
pub use error::CanonError;
pub use reference::{CanonPosition, ScriptureReference};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
