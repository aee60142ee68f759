use crate::math::vec2::{Vec2, NEAR_ZERO};

/// A directed edge between two points, as found on a polygon boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub a: Vec2,
    pub b: Vec2,
}

impl LineSegment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction().length_squared() <= NEAR_ZERO
    }

    /// Closest point on the segment to `point`. A zero-length segment
    /// collapses to its start point.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let edge = self.direction();
        let length_sq = edge.length_squared();
        if length_sq <= NEAR_ZERO {
            return self.a;
        }
        let t = ((point - self.a).dot(edge) / length_sq).clamp(0.0, 1.0);
        self.a + edge * t
    }

    /// Outward normal for an edge of a counter-clockwise loop (right-hand side).
    pub fn outward_normal(&self) -> Vec2 {
        let edge = self.direction();
        Vec2::new(edge.y, -edge.x).normalize()
    }
}
