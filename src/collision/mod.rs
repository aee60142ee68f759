pub mod aabb;
pub mod collision;
pub mod detection;
pub mod manifold;

// Re-export key types
pub use aabb::Aabb;
pub use collision::{Collision2D, PairId};
pub use manifold::Manifold2;
