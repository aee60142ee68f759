//! Error types for the physics core

use crate::world::{ColliderHandle, RigidbodyHandle};
use thiserror::Error;

/// Recoverable misuse of the physics API.
///
/// Broken invariants (such as destroying a body that still owns a live
/// collider) are not represented here; they panic at the point of detection.
#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    /// Handle is stale or was never issued by this world
    #[error("Rigidbody not found: {0:?}")]
    BodyNotFound(RigidbodyHandle),

    /// Handle is stale or was never issued by this world
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(ColliderHandle),

    /// Layer index outside the 32-layer matrix
    #[error("Invalid interaction layer: {0} (expected 0..32)")]
    InvalidLayer(u32),

    /// Mass must be strictly positive and finite
    #[error("Invalid mass: {0}")]
    InvalidMass(f64),

    /// Shape parameters that cannot describe a collider
    #[error("Invalid collider shape: {0}")]
    InvalidShape(String),

    /// Configuration values that cannot drive the simulation
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
