use crate::math::vec2::Vec2;

/// One potential contact between two colliders for the current step.
///
/// The normal points from the second collider toward the first, so moving
/// the first collider along `normal` by `penetration` separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold2 {
    /// Start of the representative contact edge (world space).
    pub contact_start: Vec2,
    /// End of the contact edge; equal to `contact_start` for a point contact.
    pub contact_end: Vec2,
    /// Unit collision normal.
    pub normal: Vec2,
    /// Overlap depth along `normal`; positive means penetrating.
    pub penetration: f64,
}

impl Manifold2 {
    pub fn from_point(point: Vec2, normal: Vec2, penetration: f64) -> Self {
        Self {
            contact_start: point,
            contact_end: point,
            normal,
            penetration,
        }
    }

    pub fn from_edge(start: Vec2, end: Vec2, normal: Vec2, penetration: f64) -> Self {
        Self {
            contact_start: start,
            contact_end: end,
            normal,
            penetration,
        }
    }

    /// Point at which impulses are applied: the middle of the contact edge.
    pub fn contact_point(&self) -> Vec2 {
        (self.contact_start + self.contact_end) * 0.5
    }

    pub fn is_point_contact(&self) -> bool {
        (self.contact_end - self.contact_start).is_near_zero()
    }

    /// Same contact seen from the other collider.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }
}
