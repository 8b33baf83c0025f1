//! Scriptorium Timeline
//!
//! Cross-reference visualization on a circular canon:
//! - [`cluster_cross_references`]: resolve, sort and group cross-references by book
//! - [`Circle`] / [`Connection`]: map positions to points and draw bowed connections
//! - [`TimelineLayout`]: both steps together, ready for rendering
//!
//! Everything here is pure and deterministic. Unresolvable cross-references are
//! dropped; an unresolvable source yields no layout at all.
//!
//! # Example
//!
//! ```rust
//! use scriptorium_canon::Canon;
//! use scriptorium_timeline::{Circle, CrossReference, TimelineLayout};
//!
//! let layout = TimelineLayout::build(
//!     &Canon::timeline(),
//!     "John 3:16",
//!     &[CrossReference::new("Genesis 22:8"), CrossReference::new("Isaiah 53:5")],
//!     Circle::default(),
//! )
//! .unwrap();
//! assert_eq!(layout.nodes.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cluster;
mod geometry;
mod layout;

pub use cluster::{
    cluster_cross_references, Annotation, ClusterMember, ClusterSet, CrossReference,
    CrossReferenceCluster,
};
pub use geometry::{
    thickness_for, Circle, Connection, Point, BASE_THICKNESS, CONTROL_PULL, MAX_THICKNESS,
    THICKNESS_PER_MEMBER,
};
pub use layout::{BookMarker, ClusterNode, TimelineLayout};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
