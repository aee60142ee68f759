use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;

/// Local disc geometry: a radius around an offset from the owning body's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub local_position: Vec2,
    pub radius: f64,
}

impl Disc {
    pub fn new(local_position: Vec2, radius: f64) -> Result<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "disc radius must be positive, got {radius}"
            )));
        }
        Ok(Self {
            local_position,
            radius,
        })
    }

    /// Moment of inertia about the body origin for a solid disc of `mass`
    /// (parallel axis term included for the offset).
    pub fn moment(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius + mass * self.local_position.length_squared()
    }
}
