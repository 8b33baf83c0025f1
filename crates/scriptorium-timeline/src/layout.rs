//! Timeline layout: clusters placed on the circle with source connections

use crate::cluster::{cluster_cross_references, ClusterSet, CrossReference, CrossReferenceCluster};
use crate::geometry::{Circle, Connection, Point};
use scriptorium_canon::{Canon, CanonPosition, ScriptureReference, Testament};
use serde::{Deserialize, Serialize};

/// A cluster and where it sits on the circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode {
    /// Point on the circle
    pub point: Point,
    /// The cluster
    pub cluster: CrossReferenceCluster,
}

/// Tick for one book around the ring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookMarker {
    /// Book name
    pub name: &'static str,
    /// 1-based canonical order
    pub order: u8,
    /// Testament
    pub testament: Testament,
    /// Position on the canon
    pub position: CanonPosition,
    /// Point on the circle
    pub point: Point,
}

/// Everything needed to draw a cross-reference timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    /// Circle used for placement
    pub circle: Circle,
    /// Resolved source reference
    pub source: ScriptureReference,
    /// Source point on the circle
    pub source_point: Point,
    /// Cluster nodes in position order
    pub nodes: Vec<ClusterNode>,
    /// One connection per node, same order
    pub connections: Vec<Connection>,
}

impl TimelineLayout {
    /// Cluster and place cross-references of `source`
    ///
    /// Returns `None` when the source does not resolve; nothing is partially
    /// laid out in that case.
    #[must_use]
    pub fn build(
        canon: &Canon,
        source: &str,
        cross_references: &[CrossReference],
        circle: Circle,
    ) -> Option<Self> {
        cluster_cross_references(canon, source, cross_references)
            .map(|set| Self::from_clusters(set, circle))
    }

    /// Place an existing cluster set
    #[must_use]
    pub fn from_clusters(set: ClusterSet, circle: Circle) -> Self {
        let source_point = circle.point_at(set.source_position);

        let nodes: Vec<ClusterNode> = set
            .clusters
            .into_iter()
            .map(|cluster| ClusterNode {
                point: circle.point_at(cluster.position),
                cluster,
            })
            .collect();

        let connections = nodes
            .iter()
            .map(|node| Connection::between(&circle, source_point, node.point, node.cluster.len()))
            .collect();

        Self {
            circle,
            source: set.source,
            source_point,
            nodes,
            connections,
        }
    }

    /// Ring markers for all 66 books
    #[must_use]
    pub fn book_markers(canon: &Canon, circle: Circle) -> Vec<BookMarker> {
        canon
            .books()
            .map(|book| {
                let position = CanonPosition::from_order(book.order);
                BookMarker {
                    name: canon.name_of(book),
                    order: book.order,
                    testament: book.testament,
                    position,
                    point: circle.point_at(position),
                }
            })
            .collect()
    }
}
