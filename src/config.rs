//! Physics world configuration

use crate::common::material::PhysicsMaterial;
use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration applied to dynamic bodies
    pub gravity: Vec2,

    /// Length of one simulation step in scaled seconds
    pub fixed_delta_seconds: f64,

    /// Upper bound on steps run by a single `update`; the remaining backlog
    /// is dropped. `None` runs every elapsed step.
    pub max_steps_per_update: Option<u32>,

    /// Material given to newly created colliders
    pub default_material: PhysicsMaterial,

    /// Drag coefficient given to newly created bodies
    pub default_drag: f64,

    /// Layer given to newly created colliders
    pub default_layer: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            fixed_delta_seconds: 1.0 / 120.0,
            max_steps_per_update: None,
            default_material: PhysicsMaterial::default(),
            default_drag: 0.0,
            default_layer: 0,
        }
    }
}

impl PhysicsConfig {
    /// Zero gravity, otherwise default
    pub fn zero_gravity() -> Self {
        Self {
            gravity: Vec2::ZERO,
            ..Default::default()
        }
    }

    pub fn with_gravity(mut self, x: f64, y: f64) -> Self {
        self.gravity = Vec2::new(x, y);
        self
    }

    pub fn with_fixed_delta(mut self, seconds: f64) -> Self {
        self.fixed_delta_seconds = seconds;
        self
    }

    pub fn with_max_steps_per_update(mut self, steps: u32) -> Self {
        self.max_steps_per_update = Some(steps);
        self
    }

    pub fn with_default_material(mut self, material: PhysicsMaterial) -> Self {
        self.default_material = material;
        self
    }

    pub fn with_default_drag(mut self, drag: f64) -> Self {
        self.default_drag = drag;
        self
    }

    /// Checks values the world cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_delta_seconds > 0.0) || !self.fixed_delta_seconds.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "fixed_delta_seconds must be positive, got {}",
                self.fixed_delta_seconds
            )));
        }
        if self.default_layer >= crate::world::layers::LAYER_COUNT {
            return Err(PhysicsError::InvalidLayer(self.default_layer));
        }
        if self.default_drag < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "default_drag must not be negative, got {}",
                self.default_drag
            )));
        }
        if self.max_steps_per_update == Some(0) {
            return Err(PhysicsError::InvalidConfig(
                "max_steps_per_update must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
