//! Circular timeline geometry
//!
//! Positions on the canon map to angles starting at twelve o'clock and running
//! clockwise (in SVG's y-down coordinates).

use scriptorium_canon::CanonPosition;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Fraction of the midpoint-to-center distance a connection bows inward
pub const CONTROL_PULL: f64 = 0.2;

/// Base stroke width of a connection
pub const BASE_THICKNESS: f64 = 1.5;

/// Stroke width added per cluster member
pub const THICKNESS_PER_MEMBER: f64 = 0.3;

/// Upper bound on stroke width
pub const MAX_THICKNESS: f64 = 4.0;

/// 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create point
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Move `fraction` of the way toward `target`
    #[inline]
    #[must_use]
    pub fn toward(self, target: Self, fraction: f64) -> Self {
        Self::new(
            self.x + (target.x - self.x) * fraction,
            self.y + (target.y - self.y) * fraction,
        )
    }

    /// Euclidean distance
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Circle the canon is laid out on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center
    pub center: Point,
    /// Radius
    pub radius: f64,
}

impl Circle {
    /// Create circle
    #[inline]
    #[must_use]
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Angle of a position: `position · 2π − π/2`
    #[inline]
    #[must_use]
    pub fn angle_of(position: CanonPosition) -> f64 {
        position.value() * TAU - FRAC_PI_2
    }

    /// Point on the circle for a position
    #[must_use]
    pub fn point_at(&self, position: CanonPosition) -> Point {
        let angle = Self::angle_of(position);
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(Point::new(200.0, 200.0), 150.0)
    }
}

/// Stroke width for a cluster of `member_count` references
#[inline]
#[must_use]
pub fn thickness_for(member_count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let members = member_count as f64;
    (BASE_THICKNESS + THICKNESS_PER_MEMBER * members).min(MAX_THICKNESS)
}

/// Quadratic Bezier from the source to a cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Start (source) point
    pub from: Point,
    /// Control point
    pub control: Point,
    /// End (cluster) point
    pub to: Point,
    /// Stroke width
    pub thickness: f64,
}

impl Connection {
    /// Build connection on `circle`, bowed toward its center
    #[must_use]
    pub fn between(circle: &Circle, from: Point, to: Point, member_count: usize) -> Self {
        let control = from.midpoint(to).toward(circle.center, CONTROL_PULL);
        Self {
            from,
            control,
            to,
            thickness: thickness_for(member_count),
        }
    }

    /// SVG path data (`M x y Q cx cy x y`)
    #[must_use]
    pub fn svg_path(&self) -> String {
        format!(
            "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
            self.from.x, self.from.y, self.control.x, self.control.y, self.to.x, self.to.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < EPS
    }

    #[test]
    fn position_zero_is_top() {
        let circle = Circle::new(Point::new(0.0, 0.0), 10.0);
        assert!(close(circle.point_at(CanonPosition::ZERO), Point::new(0.0, -10.0)));
    }

    #[test]
    fn points_lie_on_circle() {
        let circle = Circle::default();
        for order in 1..=66u8 {
            let p = circle.point_at(CanonPosition::from_order(order));
            assert!((p.distance(circle.center) - circle.radius).abs() < 1e-6);
        }
    }

    #[test]
    fn thickness_scales_and_caps() {
        assert!((thickness_for(1) - 1.8).abs() < EPS);
        assert!((thickness_for(3) - 2.4).abs() < EPS);
        assert!((thickness_for(5) - 3.0).abs() < EPS);
        assert!((thickness_for(9) - 4.0).abs() < EPS);
        assert!((thickness_for(50) - MAX_THICKNESS).abs() < EPS);
    }

    #[test]
    fn control_point_pulled_toward_center() {
        let circle = Circle::new(Point::new(0.0, 0.0), 10.0);
        let from = Point::new(0.0, -10.0);
        let to = Point::new(10.0, 0.0);
        let conn = Connection::between(&circle, from, to, 1);

        let mid = Point::new(5.0, -5.0);
        assert!(close(conn.control, Point::new(4.0, -4.0)));
        assert!(conn.control.distance(circle.center) < mid.distance(circle.center));
    }

    #[test]
    fn svg_path_format() {
        let conn = Connection {
            from: Point::new(1.0, 2.0),
            control: Point::new(3.0, 4.0),
            to: Point::new(5.0, 6.0),
            thickness: 1.8,
        };
        assert_eq!(conn.svg_path(), "M 1.00 2.00 Q 3.00 4.00 5.00 6.00");
    }
}
