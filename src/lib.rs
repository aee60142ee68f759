//! Deterministic fixed-step 2D rigid-body physics.
//!
//! A [`Physics2D`] world owns rigidbodies and their disc or convex polygon
//! colliders, advances them in fixed steps driven by a shared [`Clock`],
//! resolves contacts with sequential impulses and reports enter / stay /
//! leave events to per-collider [`CollisionListener`]s.
//!
//! ```
//! use physics2d::{Clock, Physics2D, PhysicsConfig, Vec2};
//! use std::rc::Rc;
//!
//! let clock = Rc::new(Clock::new());
//! let config = PhysicsConfig::default().with_fixed_delta(0.125);
//! let mut world = Physics2D::new(config, clock.clone()).unwrap();
//! let body = world.create_rigidbody(Vec2::new(0.0, 5.0), 1.0).unwrap();
//! let disc = world.create_disc_collider(Vec2::ZERO, 0.5).unwrap();
//! world.attach_collider(body, disc).unwrap();
//!
//! clock.advance(0.5);
//! let steps = world.update();
//! assert_eq!(steps, 4);
//! assert!(world.body(body).unwrap().position().y < 5.0);
//! world.end_frame();
//! ```

pub mod collision;
pub mod common;
pub mod config;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{Aabb, Collision2D, Manifold2, PairId};
pub use common::{Clock, PhysicsMaterial};
pub use config::PhysicsConfig;
pub use error::{PhysicsError, Result};
pub use math::{Transform, Vec2};
pub use objects::{Collider2D, ColliderShape, Rigidbody2D, SimulationMode};
pub use shapes::{Disc, LineSegment, Polygon};
pub use world::{
    ColliderHandle, CollisionKind, CollisionListener, ContactPhase, Physics2D, RigidbodyHandle,
};
