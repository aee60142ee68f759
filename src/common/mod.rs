pub mod clock;
pub mod material;

pub use clock::Clock;
pub use material::PhysicsMaterial;
