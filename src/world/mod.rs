pub mod arena;
pub mod events;
pub mod layers;
pub mod physics_world;

use crate::objects::{Collider2D, Rigidbody2D};

pub use arena::{Arena, Handle};
pub use events::{CollisionKind, CollisionListener, ContactPhase};
pub use layers::{LayerMatrix, LAYER_COUNT};
pub use physics_world::Physics2D;

pub type RigidbodyHandle = Handle<Rigidbody2D>;
pub type ColliderHandle = Handle<Collider2D>;
