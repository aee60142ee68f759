// World-space axis-aligned bounds used by the broad phase

use crate::math::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Corners may be given in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Aabb {
            min: a.component_min(b),
            max: a.component_max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Aabb::new(center - half_extents, center + half_extents)
    }

    /// Tight bounds around `points`. `None` when empty.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.component_min(*p), hi.component_max(*p)));
        Some(Aabb { min, max })
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}
