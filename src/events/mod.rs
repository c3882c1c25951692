//! Action event logging system
//!
//! Provides a compact text format for logging every action event the
//! engine emits. The EventBus enables decoupled cross-module
//! communication: the charge machine, launcher, and beam systems emit,
//! and the host (or the sim runner) consumes.

mod bus;
mod format;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use format::{parse_event, serialize_event};
pub use logger::{EventBuffer, EventLogger};
pub use types::{ActionConfig, ActionEvent, EndReason};
