//! Gesture classification - raw samples to discrete predicates
//!
//! `classify` is a pure function of one sample and the configured
//! thresholds; it carries no state across ticks. Edge detection keeps
//! the previous tick's predicates in one place (`HandPredicates`) so the
//! state machine derives rising/falling edges instead of scattering
//! "was X true last tick" flags.

use bevy::prelude::*;

use crate::hand::sample::{Finger, GestureSample, HandInputs, HandSide};
use crate::tuning::{GestureThresholds, Tuning};

/// Discrete gesture signals derived from one sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GesturePredicates {
    /// Binary index-pinch signal from the tracking layer
    pub pinching: bool,
    /// All four finger strengths below the open-hand threshold
    pub open_hand: bool,
    /// Index extended, middle/ring/pinky curled
    pub gun_pose: bool,
    /// -up.y; positive when the palm faces up
    pub palm_orientation: f32,
    pub palm_up: bool,
    pub palm_down: bool,
}

/// Derive predicates from a sample. Pure, no side effects; a missing
/// sample is the caller's problem (tracking availability is checked
/// before classification, not here).
pub fn classify(sample: &GestureSample, thresholds: &GestureThresholds) -> GesturePredicates {
    let open_hand = sample
        .pinch_strength
        .iter()
        .all(|&s| s < thresholds.open_hand);

    let index_extended = sample.strength(Finger::Index) < thresholds.extended;
    let middle_closed = sample.strength(Finger::Middle) > thresholds.closed;
    let ring_closed = sample.strength(Finger::Ring) > thresholds.closed;
    let pinky_closed = sample.strength(Finger::Pinky) > thresholds.closed;
    let gun_pose = index_extended && middle_closed && ring_closed && pinky_closed;

    // sample.up points toward the back of the hand, so -up.y > 0 = palm up
    let palm_orientation = -sample.up.y;

    GesturePredicates {
        pinching: sample.index_pinching,
        open_hand,
        gun_pose,
        palm_orientation,
        palm_up: palm_orientation > thresholds.palm_up,
        palm_down: palm_orientation < thresholds.palm_down,
    }
}

/// Rising edge between two consecutive ticks
pub fn rising(prev: bool, curr: bool) -> bool {
    curr && !prev
}

/// Falling edge between two consecutive ticks
pub fn falling(prev: bool, curr: bool) -> bool {
    prev && !curr
}

/// Current and previous tick predicates per hand.
///
/// `None` means the hand was untracked that tick; an untracked tick
/// contributes "all predicates false" to edge detection, so a gesture
/// held across a tracking gap re-registers as a fresh rising edge when
/// tracking returns.
#[derive(Resource, Default)]
pub struct HandPredicates {
    current: [Option<GesturePredicates>; 2],
    previous: [Option<GesturePredicates>; 2],
}

impl HandPredicates {
    pub fn current(&self, hand: HandSide) -> Option<&GesturePredicates> {
        self.current[hand.index()].as_ref()
    }

    /// Previous tick's predicates, defaulted when the hand was untracked
    pub fn previous_or_default(&self, hand: HandSide) -> GesturePredicates {
        self.previous[hand.index()].unwrap_or_default()
    }

    /// Shift current to previous and install this tick's classification
    pub fn advance(&mut self, hand: HandSide, predicates: Option<GesturePredicates>) {
        let i = hand.index();
        self.previous[i] = self.current[i];
        self.current[i] = predicates;
    }
}

/// Classify both hands' samples once per tick.
/// Runs before any action system; everything downstream reads the
/// resulting predicate pairs.
pub fn classify_hands(
    inputs: Res<HandInputs>,
    tuning: Res<Tuning>,
    mut predicates: ResMut<HandPredicates>,
) {
    for hand in HandSide::ALL {
        let classified = inputs.get(hand).map(|s| classify(s, &tuning.thresholds));
        predicates.advance(hand, classified);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(strengths: [f32; 4], pinching: bool, up: Vec3) -> GestureSample {
        GestureSample {
            pinch_strength: strengths,
            index_pinching: pinching,
            position: Vec3::ZERO,
            forward: Vec3::Z,
            up,
        }
    }

    fn thresholds() -> GestureThresholds {
        GestureThresholds::default()
    }

    #[test]
    fn test_pinching_is_binary_signal() {
        // High index strength without the binary flag is not a pinch
        let p = classify(&sample([0.9, 0.0, 0.0, 0.0], false, Vec3::Y), &thresholds());
        assert!(!p.pinching);
        let p = classify(&sample([0.9, 0.0, 0.0, 0.0], true, Vec3::Y), &thresholds());
        assert!(p.pinching);
    }

    #[test]
    fn test_open_hand_requires_all_fingers() {
        let p = classify(&sample([0.05, 0.02, 0.03, 0.01], false, Vec3::Y), &thresholds());
        assert!(p.open_hand);
        // One finger above threshold breaks it
        let p = classify(&sample([0.05, 0.2, 0.03, 0.01], false, Vec3::Y), &thresholds());
        assert!(!p.open_hand);
    }

    #[test]
    fn test_gun_pose() {
        let p = classify(&sample([0.1, 0.8, 0.7, 0.9], false, Vec3::Y), &thresholds());
        assert!(p.gun_pose);
        // Index curled too far
        let p = classify(&sample([0.5, 0.8, 0.7, 0.9], false, Vec3::Y), &thresholds());
        assert!(!p.gun_pose);
        // Pinky not curled enough
        let p = classify(&sample([0.1, 0.8, 0.7, 0.3], false, Vec3::Y), &thresholds());
        assert!(!p.gun_pose);
    }

    #[test]
    fn test_palm_orientation() {
        // up toward the back of the hand pointing down = palm up
        let p = classify(&sample([0.0; 4], false, Vec3::new(0.0, -1.0, 0.0)), &thresholds());
        assert!(p.palm_up);
        assert!(!p.palm_down);
        assert!((p.palm_orientation - 1.0).abs() < f32::EPSILON);

        let p = classify(&sample([0.0; 4], false, Vec3::new(0.0, 1.0, 0.0)), &thresholds());
        assert!(p.palm_down);
        assert!(!p.palm_up);

        // Sideways palm is neither
        let p = classify(&sample([0.0; 4], false, Vec3::new(1.0, 0.0, 0.0)), &thresholds());
        assert!(!p.palm_up && !p.palm_down);
    }

    #[test]
    fn test_edges() {
        assert!(rising(false, true));
        assert!(!rising(true, true));
        assert!(falling(true, false));
        assert!(!falling(false, false));
    }

    #[test]
    fn test_predicate_history_advance() {
        let mut history = HandPredicates::default();
        let pinch = GesturePredicates { pinching: true, ..Default::default() };

        history.advance(HandSide::Right, Some(pinch));
        assert!(history.current(HandSide::Right).unwrap().pinching);
        assert!(!history.previous_or_default(HandSide::Right).pinching);

        // Tracking gap: current becomes None, previous keeps the pinch
        history.advance(HandSide::Right, None);
        assert!(history.current(HandSide::Right).is_none());
        assert!(history.previous_or_default(HandSide::Right).pinching);
    }
}
