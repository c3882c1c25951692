//! Hand input module - per-tick gesture samples and the classifier

mod classifier;
mod sample;

pub use classifier::*;
pub use sample::*;
