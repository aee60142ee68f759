pub mod transform;
pub mod vec2;

pub use transform::{normalize_angle, Transform};
pub use vec2::Vec2;
