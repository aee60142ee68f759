//! Surface properties of a collider.

use serde::{Deserialize, Serialize};

/// Bounciness and friction of a collider surface, both kept in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMaterial")]
pub struct PhysicsMaterial {
    /// Coefficient of restitution. 0 = no bounce, 1 = perfectly elastic.
    bounciness: f64,
    /// Coulomb friction coefficient. 0 = frictionless.
    friction: f64,
}

// Deserialized values pass through `PhysicsMaterial::new` for clamping
#[derive(Deserialize)]
struct RawMaterial {
    bounciness: f64,
    friction: f64,
}

impl From<RawMaterial> for PhysicsMaterial {
    fn from(raw: RawMaterial) -> Self {
        Self::new(raw.bounciness, raw.friction)
    }
}

impl PhysicsMaterial {
    /// Creates a material, clamping both coefficients into `[0, 1]`.
    pub fn new(bounciness: f64, friction: f64) -> Self {
        Self {
            bounciness: saturate(bounciness),
            friction: saturate(friction),
        }
    }

    pub fn bounciness(&self) -> f64 {
        self.bounciness
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Adds `delta` to the bounciness, saturating at the ends of `[0, 1]`.
    pub fn add_bounciness(&mut self, delta: f64) {
        self.bounciness = saturate(self.bounciness + delta);
    }

    /// Adds `delta` to the friction, saturating at the ends of `[0, 1]`.
    pub fn add_friction(&mut self, delta: f64) {
        self.friction = saturate(self.friction + delta);
    }

    /// Restitution used when this surface touches `other`.
    pub fn bounciness_with(&self, other: &PhysicsMaterial) -> f64 {
        self.bounciness * other.bounciness
    }

    /// Friction coefficient used when this surface touches `other`.
    pub fn friction_with(&self, other: &PhysicsMaterial) -> f64 {
        self.friction * other.friction
    }
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            bounciness: 0.2,
            friction: 0.5,
        }
    }
}

fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
