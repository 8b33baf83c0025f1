//! Cross-reference clustering
//!
//! Groups resolved cross-references into contiguous same-book runs after
//! sorting them by canon position.

use scriptorium_canon::{Canon, CanonPosition, ScriptureReference};
use serde::{Deserialize, Serialize};

/// Annotation fields carried alongside a cross-reference
///
/// Passed through clustering unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Verse text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// How this verse connects to the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    /// Historical period label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Text in the original language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

/// Unresolved cross-reference as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossReference {
    /// Reference string (`Book Chapter:Verse`)
    pub reference: String,
    /// Pass-through annotations
    #[serde(flatten)]
    pub annotation: Annotation,
}

impl CrossReference {
    /// Create cross-reference without annotations
    #[inline]
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            annotation: Annotation::default(),
        }
    }

    /// With verse text
    #[inline]
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.annotation.text = Some(text.into());
        self
    }

    /// With connection note
    #[inline]
    #[must_use]
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.annotation.connection = Some(connection.into());
        self
    }
}

/// Resolved member of a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMember {
    /// Structured reference
    pub reference: ScriptureReference,
    /// Annotations from the input, unchanged
    #[serde(flatten)]
    pub annotation: Annotation,
}

/// Same-book run of cross-references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossReferenceCluster {
    /// Position of the book all members share
    pub position: CanonPosition,
    /// Members in sorted order
    pub references: Vec<ClusterMember>,
}

impl CrossReferenceCluster {
    /// Book shared by the members
    #[inline]
    #[must_use]
    pub fn book(&self) -> &str {
        self.references
            .first()
            .map_or("", |m| m.reference.book.as_str())
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Check if cluster has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Clusters for one source reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSet {
    /// Resolved source reference
    pub source: ScriptureReference,
    /// Position of the source
    pub source_position: CanonPosition,
    /// Clusters in ascending position order
    pub clusters: Vec<CrossReferenceCluster>,
}

impl ClusterSet {
    /// Total members across all clusters
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.clusters.iter().map(CrossReferenceCluster::len).sum()
    }
}

/// Cluster cross-references of `source`
///
/// Returns `None` if the source itself does not resolve. Cross-references that
/// do not resolve are dropped silently. The rest are stably sorted by canon
/// position and split into a new cluster whenever the book changes.
#[must_use]
pub fn cluster_cross_references(
    canon: &Canon,
    source: &str,
    cross_references: &[CrossReference],
) -> Option<ClusterSet> {
    let resolved_source = canon.resolve(source)?;
    let source_position = canon.position_of(&resolved_source);

    let mut resolved: Vec<(CanonPosition, ClusterMember)> = cross_references
        .iter()
        .filter_map(|cross| {
            let Some(reference) = canon.resolve(&cross.reference) else {
                tracing::debug!("dropping unresolved cross-reference '{}'", cross.reference);
                return None;
            };
            Some((
                canon.position_of(&reference),
                ClusterMember {
                    reference,
                    annotation: cross.annotation.clone(),
                },
            ))
        })
        .collect();

    resolved.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    let mut clusters: Vec<CrossReferenceCluster> = Vec::new();
    for (position, member) in resolved {
        match clusters.last_mut() {
            Some(current) if current.book() == member.reference.book => {
                current.references.push(member);
            }
            _ => clusters.push(CrossReferenceCluster {
                position,
                references: vec![member],
            }),
        }
    }

    tracing::debug!(
        "clustered cross-references of {}: {} clusters",
        resolved_source,
        clusters.len()
    );

    Some(ClusterSet {
        source: resolved_source,
        source_position,
        clusters,
    })
}
