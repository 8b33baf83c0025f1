//! Context-accumulating commentary generation
//!
//! [`CommentaryAccumulator::generate_for`] produces commentary for one verse,
//! handing the generator every existing commentary for verses earlier in the
//! study order, oldest first.
//!
//! # Concurrency
//! - The accumulator reads the snapshot it is given. Two generations for
//!   different verses running at once are not causally ordered: neither is
//!   guaranteed to see the other's result.
//! - [`CommentaryAccumulator::begin`] is a soft lock against duplicate
//!   requests for the same verse. It does not order different verses.

use crate::commentary::{Commentary, CommentaryBook};
use crate::error::StudyError;
use crate::generator::CommentaryGenerator;
use dashmap::DashSet;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Source of commentary timestamps
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Commentaries for verses strictly before `verse_ref` in `all_verses`,
/// ascending by timestamp
///
/// A verse absent from `all_verses` gets no context.
#[must_use]
pub fn select_context<S: AsRef<str>>(
    verse_ref: &str,
    all_verses: &[S],
    existing: &CommentaryBook,
) -> Vec<Commentary> {
    let Some(index) = all_verses.iter().position(|v| v.as_ref() == verse_ref) else {
        tracing::warn!("verse {} is not in the study order; generating without context", verse_ref);
        return Vec::new();
    };

    let previous: HashSet<&str> = all_verses[..index].iter().map(AsRef::as_ref).collect();
    let mut context: Vec<Commentary> = existing
        .iter()
        .filter(|c| previous.contains(c.verse_ref.as_str()))
        .cloned()
        .collect();
    context.sort_by_key(|c| c.timestamp);

    tracing::debug!(
        "context for {}: {} of {} previous verses have commentary",
        verse_ref,
        context.len(),
        index
    );
    context
}

/// Orchestrates per-verse generation with accumulated context
#[derive(Clone)]
pub struct CommentaryAccumulator {
    clock: Arc<dyn Clock>,
    in_flight: Arc<DashSet<String>>,
}

impl CommentaryAccumulator {
    /// Create accumulator on the wall clock
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            in_flight: Arc::new(DashSet::new()),
        }
    }

    /// With a different clock
    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Mark `verse_ref` as generating until the guard drops
    ///
    /// # Errors
    /// - [`StudyError::AlreadyGenerating`] if a guard for it is alive
    pub fn begin(&self, verse_ref: &str) -> Result<InFlight, StudyError> {
        if !self.in_flight.insert(verse_ref.to_string()) {
            tracing::warn!("duplicate generation request for {}", verse_ref);
            return Err(StudyError::AlreadyGenerating(verse_ref.to_string()));
        }
        Ok(InFlight {
            verse_ref: verse_ref.to_string(),
            set: Arc::clone(&self.in_flight),
        })
    }

    /// Check if `verse_ref` is generating
    #[inline]
    #[must_use]
    pub fn is_generating(&self, verse_ref: &str) -> bool {
        self.in_flight.contains(verse_ref)
    }

    /// Generate commentary for `verse_ref`
    ///
    /// The caller upserts the result into its book. On failure nothing is
    /// produced and no retry is attempted.
    ///
    /// # Errors
    /// Whatever the generator returns
    pub async fn generate_for<S, G>(
        &self,
        verse_ref: &str,
        all_verses: &[S],
        existing: &CommentaryBook,
        generator: &G,
    ) -> Result<Commentary, StudyError>
    where
        S: AsRef<str> + Sync,
        G: CommentaryGenerator + ?Sized,
    {
        let context = select_context(verse_ref, all_verses, existing);
        tracing::info!(
            "generating commentary for {} with {} prior commentaries",
            verse_ref,
            context.len()
        );

        let payload = match generator.generate(verse_ref, &context).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("commentary generation for {} failed: {}", verse_ref, e);
                return Err(e);
            }
        };

        let commentary = Commentary::new(verse_ref, payload, self.clock.now_millis());
        tracing::info!("commentary {} generated for {}", commentary.id, verse_ref);
        Ok(commentary)
    }
}

impl Default for CommentaryAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommentaryAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentaryAccumulator")
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

/// Generation-in-progress marker for one verse
#[derive(Debug)]
#[must_use = "the verse is only marked while the guard is alive"]
pub struct InFlight {
    verse_ref: String,
    set: Arc<DashSet<String>>,
}

impl InFlight {
    /// Verse being generated
    #[inline]
    #[must_use]
    pub fn verse_ref(&self) -> &str {
        &self.verse_ref
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.set.remove(&self.verse_ref);
    }
}
