//! Instant fire - the gun-pose variant
//!
//! A degenerate action with no charge phase at all: the launch fires on
//! the rising edge of (gun pose AND index pinch), same tick. Modeled
//! outside the charge machine so no Charging state is ever observable.

use bevy::prelude::*;

use crate::events::{ActionEvent, EventBus};
use crate::hand::{HandPredicates, HandInputs, HandSide, rising};
use crate::launcher::{LaunchQueue, LaunchRequest};
use crate::tuning::Tuning;

/// Fire-and-forget gun-pose trigger for one hand
#[derive(Component)]
pub struct InstantFireAction {
    pub hand: HandSide,
    /// Trigger state last tick, for edge detection
    was_triggered: bool,
}

impl InstantFireAction {
    pub fn new(hand: HandSide) -> Self {
        Self {
            hand,
            was_triggered: false,
        }
    }

    /// Edge-detect the trigger. Returns true on the tick the combined
    /// gesture first becomes true; held triggers do not refire.
    pub fn check_trigger(&mut self, gun_pose: bool, pinching: bool) -> bool {
        let triggered = gun_pose && pinching;
        let fire = rising(self.was_triggered, triggered);
        self.was_triggered = triggered;
        fire
    }
}

/// Queue a launch on each rising edge of the gun-pose trigger
pub fn fire_instant_actions(
    tuning: Res<Tuning>,
    mut inputs: ResMut<HandInputs>,
    predicates: Res<HandPredicates>,
    mut queue: ResMut<LaunchQueue>,
    mut bus: ResMut<EventBus>,
    mut actions: Query<&mut InstantFireAction>,
) {
    for mut action in &mut actions {
        let hand = action.hand;
        if inputs.check_source(hand) {
            continue;
        }

        let Some(current) = predicates.current(hand) else {
            // Untracked tick: trigger reads as false, edge state decays
            action.check_trigger(false, false);
            continue;
        };

        if action.check_trigger(current.gun_pose, current.pinching) {
            // Sample is present whenever predicates are
            if let Some(sample) = inputs.get(hand) {
                queue.push(
                    hand,
                    LaunchRequest {
                        position: sample.point_ahead(tuning.launch_offset),
                        direction: sample.forward,
                        speed: tuning.launch_speed,
                        scale: tuning.max_charge_scale,
                    },
                    None,
                );
                bus.emit(ActionEvent::InstantFire { hand });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_rising_edge_only() {
        let mut action = InstantFireAction::new(HandSide::Right);

        // Gun pose alone does nothing
        assert!(!action.check_trigger(true, false));
        // Pinch added: fire once
        assert!(action.check_trigger(true, true));
        // Held: no refire
        assert!(!action.check_trigger(true, true));
        // Release and retrigger: fires again
        assert!(!action.check_trigger(true, false));
        assert!(action.check_trigger(true, true));
    }

    #[test]
    fn test_pinch_without_gun_pose_never_fires() {
        let mut action = InstantFireAction::new(HandSide::Left);
        assert!(!action.check_trigger(false, true));
        assert!(!action.check_trigger(false, true));
    }

    #[test]
    fn test_simultaneous_edge_fires_same_tick() {
        let mut action = InstantFireAction::new(HandSide::Right);
        // Both predicates appear on the same tick
        assert!(action.check_trigger(true, true));
    }
}
