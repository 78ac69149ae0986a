//! Simulation module
//!
//! All gameplay logic lives here:
//! - Integer pixel positions, one fixed step per tick
//! - Entities only change inside `Scene::tick`
//! - Randomness comes from the scene's seeded RNG
//! - No platform dependencies beyond the input sample and drawing traits

pub mod ball;
pub mod collision;
pub mod paddle;
pub mod scene;

pub use ball::Ball;
pub use collision::Rect;
pub use paddle::Paddle;
pub use scene::Scene;

/// Which half of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}
