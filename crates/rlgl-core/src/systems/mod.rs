//! Systems - logic that operates on components

mod movement;
mod projectile;
mod stamina;

pub use movement::*;
pub use projectile::*;
pub use stamina::*;
