//! Event Bus - central hub for cross-module communication
//!
//! Action systems emit events to the bus and the host consumes them.
//! The bus is an optional observability hook: state-machine correctness
//! never depends on anyone draining it.

use bevy::prelude::*;

use super::types::ActionEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Time in milliseconds since session start
    pub time_ms: u32,
    /// The event data
    pub event: ActionEvent,
}

/// Central event bus for cross-module communication
#[derive(Resource, Default)]
pub struct EventBus {
    /// Events emitted this frame, waiting to be consumed
    pending: Vec<BusEvent>,

    /// Current elapsed time in milliseconds (for timestamping)
    elapsed_ms: u32,

    /// Whether the bus is enabled (disabled = events are dropped)
    enabled: bool,
}

impl EventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Create a disabled event bus (events are dropped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Update the elapsed time (called each frame)
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: ActionEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Get pending events without consuming them
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Drain pending events
    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}

/// System to update the event bus time each frame
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time>) {
    bus.update_time(time.elapsed_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandSide;

    #[test]
    fn test_emit_and_drain() {
        let mut bus = EventBus::new();
        bus.update_time(1.5);

        bus.emit(ActionEvent::ChargeStart {
            hand: HandSide::Right,
            pos: (0.0, 1.0, 0.2),
        });

        assert_eq!(bus.pending_count(), 1);
        assert!(bus.has_pending());

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_ms, 1500);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_disabled_bus_drops_events() {
        let mut bus = EventBus::disabled();
        bus.emit(ActionEvent::InstantFire { hand: HandSide::Left });
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_launch_event_payload() {
        let mut bus = EventBus::new();
        bus.emit(ActionEvent::Launch {
            hand: HandSide::Right,
            dir: (0.0, 0.0, 1.0),
            speed: 15.0,
        });

        let events = bus.drain();
        if let ActionEvent::Launch { hand, dir, speed } = &events[0].event {
            assert_eq!(*hand, HandSide::Right);
            assert_eq!(*dir, (0.0, 0.0, 1.0));
            assert_eq!(*speed, 15.0);
        } else {
            panic!("Wrong event type");
        }
    }
}
