//! Error types for reference resolution

/// Reasons a reference string does not resolve
///
/// Resolution failure is an expected outcome; [`Canon::resolve`](crate::Canon::resolve)
/// folds these into `None`. The error form exists for callers that report why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    /// Input does not match `Book Chapter:Verse`
    #[error("malformed reference: '{0}'")]
    Malformed(String),

    /// Book name is not in the canon table
    #[error("unknown book: '{0}'")]
    UnknownBook(String),
}
