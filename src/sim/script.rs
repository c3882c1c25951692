//! Scripted gesture input for tests and the demo binary
//!
//! A `GestureScript` is a sequence of (frame count, pose) segments fed
//! to `HandInputs` one frame at a time. Scenarios can also be written
//! as TOML files naming canned poses per segment.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::hand::{GestureSample, HandInputs, HandSide};

/// Canned hand poses for scripts and scenarios
pub mod poses {
    use super::*;

    const HAND_POS: Vec3 = Vec3::new(0.0, 1.2, 0.0);
    /// Horizontal "up" so the palm reads neither up nor down
    const NEUTRAL_UP: Vec3 = Vec3::X;

    fn base(strengths: [f32; 4], pinching: bool, up: Vec3) -> GestureSample {
        GestureSample {
            pinch_strength: strengths,
            index_pinching: pinching,
            position: HAND_POS,
            forward: Vec3::Z,
            up,
        }
    }

    /// Relaxed hand: no pinch, not open, not a gun pose
    pub fn rest() -> GestureSample {
        base([0.3, 0.3, 0.3, 0.3], false, NEUTRAL_UP)
    }

    /// Index pinch held
    pub fn pinch() -> GestureSample {
        base([0.9, 0.3, 0.3, 0.3], true, NEUTRAL_UP)
    }

    /// All fingers extended, palm facing up
    pub fn open_palm_up() -> GestureSample {
        base([0.02, 0.02, 0.02, 0.02], false, Vec3::NEG_Y)
    }

    /// All fingers extended, palm flipped down
    pub fn open_palm_down() -> GestureSample {
        base([0.02, 0.02, 0.02, 0.02], false, Vec3::Y)
    }

    /// All fingers extended, palm sideways
    pub fn open_neutral() -> GestureSample {
        base([0.02, 0.02, 0.02, 0.02], false, NEUTRAL_UP)
    }

    /// Fist, palm neutral
    pub fn fist() -> GestureSample {
        base([0.8, 0.8, 0.8, 0.8], false, NEUTRAL_UP)
    }

    /// Index extended, other fingers curled
    pub fn gun() -> GestureSample {
        base([0.1, 0.8, 0.8, 0.8], false, NEUTRAL_UP)
    }

    /// Gun pose with the index pinch trigger pulled
    pub fn gun_pinch() -> GestureSample {
        base([0.1, 0.8, 0.8, 0.8], true, NEUTRAL_UP)
    }

    /// Look up a pose by scenario name
    pub fn by_name(name: &str) -> Option<GestureSample> {
        match name {
            "rest" => Some(rest()),
            "pinch" => Some(pinch()),
            "open_palm_up" => Some(open_palm_up()),
            "open_palm_down" => Some(open_palm_down()),
            "open_neutral" => Some(open_neutral()),
            "fist" => Some(fist()),
            "gun" => Some(gun()),
            "gun_pinch" => Some(gun_pinch()),
            "lost" => None, // tracking gap
            _ => None,
        }
    }
}

/// Per-hand scripted sample stream
#[derive(Debug, Clone, Default)]
pub struct GestureScript {
    hand: HandSide,
    /// (frame count, pose); None = tracking gap
    segments: Vec<(u32, Option<GestureSample>)>,
}

impl GestureScript {
    pub fn new(hand: HandSide) -> Self {
        Self {
            hand,
            segments: Vec::new(),
        }
    }

    /// Hold a pose for `frames` ticks
    pub fn hold(mut self, frames: u32, pose: GestureSample) -> Self {
        self.segments.push((frames, Some(pose)));
        self
    }

    /// Tracking gap for `frames` ticks
    pub fn gap(mut self, frames: u32) -> Self {
        self.segments.push((frames, None));
        self
    }

    pub fn hand(&self) -> HandSide {
        self.hand
    }

    /// Total scripted frames
    pub fn len(&self) -> u32 {
        self.segments.iter().map(|(n, _)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pose at a frame; past-the-end reads as a tracking gap
    pub fn sample_at(&self, frame: u32) -> Option<GestureSample> {
        let mut offset = 0;
        for (count, pose) in &self.segments {
            if frame < offset + count {
                return *pose;
            }
            offset += count;
        }
        None
    }
}

/// Resource feeding the script into `HandInputs`, one frame per tick
#[derive(Resource, Default)]
pub struct ScriptState {
    pub script: GestureScript,
    pub frame: u32,
    pub running: bool,
}

impl ScriptState {
    pub fn new(script: GestureScript) -> Self {
        Self {
            script,
            frame: 0,
            running: true,
        }
    }
}

/// Inject this tick's scripted sample. Runs in PreUpdate so the whole
/// engine chain sees it the same tick.
pub fn inject_scripted_samples(mut state: ResMut<ScriptState>, mut inputs: ResMut<HandInputs>) {
    if !state.running {
        return;
    }
    let hand = state.script.hand();
    match state.script.sample_at(state.frame) {
        Some(sample) => inputs.set(hand, sample),
        None => inputs.clear(hand),
    }
    state.frame += 1;
}

// === TOML scenarios (scripted test files) ===

/// Scenario file: a named script plus an expected event-code sequence.
/// TOML layout note: scalar keys (`name`, `variant`, `hand`, `expect`)
/// must come before the `[[input]]` tables, or TOML assigns them to the
/// last segment.
#[derive(Debug, Deserialize)]
pub struct ScenarioDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Which charge variant to run: "pinch", "palm_flip", "open_hand",
    /// "instant", or "beam"
    pub variant: String,
    #[serde(default = "default_hand")]
    pub hand: String,
    #[serde(default)]
    pub input: Vec<ScriptSegment>,
    #[serde(default)]
    pub expect: Vec<String>,
}

fn default_hand() -> String {
    "R".to_string()
}

/// One script segment: hold `pose` for `frames` ticks.
/// Unknown keys are rejected so a top-level key accidentally written
/// below the `[[input]]` tables fails loudly instead of being swallowed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptSegment {
    pub frames: u32,
    pub pose: String,
}

impl ScenarioDefinition {
    /// Parse a scenario file
    pub fn parse_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn hand_side(&self) -> HandSide {
        match self.hand.as_str() {
            "L" => HandSide::Left,
            _ => HandSide::Right,
        }
    }

    /// Build the gesture script, rejecting unknown pose names
    pub fn script(&self) -> Result<GestureScript, String> {
        let mut script = GestureScript::new(self.hand_side());
        for segment in &self.input {
            if segment.pose == "lost" {
                script = script.gap(segment.frames);
            } else {
                let pose = poses::by_name(&segment.pose)
                    .ok_or_else(|| format!("Unknown pose '{}'", segment.pose))?;
                script = script.hold(segment.frames, pose);
            }
        }
        Ok(script)
    }
}
