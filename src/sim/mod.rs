//! Headless simulation - scripted gesture streams and a fixed-dt runner

mod runner;
mod script;

pub use runner::*;
pub use script::*;
