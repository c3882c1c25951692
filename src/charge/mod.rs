//! Charge module - the gesture-driven charge-and-release state machine

mod action;
mod systems;
mod variant;

pub use action::*;
pub use systems::*;
pub use variant::*;
