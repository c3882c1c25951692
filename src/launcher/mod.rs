//! Launcher module - projectile launch, instant fire, and the guided beam

mod beam;
mod instant;
mod projectile;

pub use beam::*;
pub use instant::*;
pub use projectile::*;
