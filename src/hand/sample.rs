//! Per-tick hand tracking snapshots supplied by the host

use bevy::prelude::*;

/// Which hand an action listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    pub fn index(self) -> usize {
        match self {
            HandSide::Left => 0,
            HandSide::Right => 1,
        }
    }
}

impl Default for HandSide {
    fn default() -> Self {
        HandSide::Right
    }
}

impl std::fmt::Display for HandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandSide::Left => write!(f, "L"),
            HandSide::Right => write!(f, "R"),
        }
    }
}

/// Finger roles with a pinch strength signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index = 0,
    Middle = 1,
    Ring = 2,
    Pinky = 3,
}

/// Immutable per-tick snapshot of one tracked hand.
///
/// Produced by the external tracking collaborator once per tick and
/// consumed read-only; nothing in the engine retains it past the tick.
#[derive(Debug, Clone, Copy)]
pub struct GestureSample {
    /// Continuous pinch strength per finger role (0-1), indexed by `Finger`
    pub pinch_strength: [f32; 4],
    /// Binary index-pinch signal straight from the tracking layer
    pub index_pinching: bool,
    /// Hand position in world space
    pub position: Vec3,
    /// Unit vector along the hand forward axis
    pub forward: Vec3,
    /// Unit vector toward the back of the hand (so -up.y > 0 = palm up)
    pub up: Vec3,
}

impl GestureSample {
    pub fn strength(&self, finger: Finger) -> f32 {
        self.pinch_strength[finger as usize]
    }

    /// Point offset along the hand forward axis (anchor/launch position)
    pub fn point_ahead(&self, offset: f32) -> Vec3 {
        self.position + self.forward * offset
    }
}

/// Per-hand sample slots filled by the host each tick.
///
/// `None` models a tracking gap. A hand that has never produced a sample
/// is a configuration error and is reported once, not every tick.
#[derive(Resource, Default)]
pub struct HandInputs {
    samples: [Option<GestureSample>; 2],
    ever_tracked: [bool; 2],
    warned_missing: [bool; 2],
}

impl HandInputs {
    /// Install this tick's sample for a hand
    pub fn set(&mut self, hand: HandSide, sample: GestureSample) {
        self.samples[hand.index()] = Some(sample);
        self.ever_tracked[hand.index()] = true;
    }

    /// Mark a hand as untracked this tick
    pub fn clear(&mut self, hand: HandSide) {
        self.samples[hand.index()] = None;
    }

    pub fn get(&self, hand: HandSide) -> Option<&GestureSample> {
        self.samples[hand.index()].as_ref()
    }

    pub fn is_tracked(&self, hand: HandSide) -> bool {
        self.samples[hand.index()].is_some()
    }

    /// Surface a missing tracking source exactly once per hand.
    /// Returns true when the hand has never delivered a sample.
    pub fn check_source(&mut self, hand: HandSide) -> bool {
        let i = hand.index();
        if self.ever_tracked[i] {
            return false;
        }
        if !self.warned_missing[i] {
            warn!("No hand tracking source for {} hand, actions stay idle", hand);
            self.warned_missing[i] = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_at(pos: Vec3) -> GestureSample {
        GestureSample {
            pinch_strength: [0.0; 4],
            index_pinching: false,
            position: pos,
            forward: Vec3::Z,
            up: Vec3::Y,
        }
    }

    #[test]
    fn test_set_get_clear() {
        let mut inputs = HandInputs::default();
        assert!(inputs.get(HandSide::Right).is_none());

        inputs.set(HandSide::Right, sample_at(Vec3::ONE));
        assert!(inputs.is_tracked(HandSide::Right));
        assert!(!inputs.is_tracked(HandSide::Left));

        inputs.clear(HandSide::Right);
        assert!(!inputs.is_tracked(HandSide::Right));
    }

    #[test]
    fn test_missing_source_reported_once() {
        let mut inputs = HandInputs::default();
        // Never-tracked hand is a configuration error every tick...
        assert!(inputs.check_source(HandSide::Left));
        assert!(inputs.check_source(HandSide::Left));

        // ...until it delivers a sample, after which gaps are transient
        inputs.set(HandSide::Left, sample_at(Vec3::ZERO));
        inputs.clear(HandSide::Left);
        assert!(!inputs.check_source(HandSide::Left));
    }

    #[test]
    fn test_point_ahead() {
        let sample = sample_at(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sample.point_ahead(0.2), Vec3::new(0.0, 1.0, 0.2));
    }
}
