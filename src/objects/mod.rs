pub mod collider;
pub mod rigid_body;

pub use collider::{Collider2D, ColliderShape, ShapeKind};
pub use rigid_body::{clamp_friction_impulse, Rigidbody2D, SimulationMode};
