//! Event type definitions for the logging system

use serde::{Deserialize, Serialize};

use crate::hand::HandSide;

/// Tuning snapshot logged at session start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub charge_time: f32,
    pub launch_speed: f32,
    pub max_charge_scale: f32,
    pub projectile_ttl: f32,
    pub open_hand_threshold: f32,
    pub extended_threshold: f32,
    pub closed_threshold: f32,
    pub palm_up_threshold: f32,
    pub palm_down_threshold: f32,
    pub visual_feedback: bool,
}

/// Why a beam was torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Trigger condition dropped
    Released,
    /// Body reached the sensing ray's far point
    Arrived,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::Released => write!(f, "released"),
            EndReason::Arrived => write!(f, "arrived"),
        }
    }
}

/// All action events that can be logged
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEvent {
    // === Session events ===
    /// Session started (generated once per launch)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // ISO 8601
    },
    /// Tuning snapshot (logged after session start)
    Config(ActionConfig),

    // === Tracking events ===
    /// Tracking dropped for a hand that was previously tracked
    TrackingLost { hand: HandSide },
    /// Tracking returned
    TrackingRecovered { hand: HandSide },

    // === Charge events ===
    /// Charge began
    ChargeStart { hand: HandSide, pos: (f32, f32, f32) },
    /// Periodic charge progress (tick-modulo gated)
    ChargeProgress { hand: HandSide, percent: f32 },
    /// Charge threshold crossed (once per cycle)
    FullyCharged { hand: HandSide, elapsed: f32 },
    /// Fully charged action released
    Launch {
        hand: HandSide,
        dir: (f32, f32, f32),
        speed: f32,
    },
    /// Charge released or aborted before completion
    Cancel { hand: HandSide, elapsed: f32 },

    // === Instant / beam events ===
    /// Gun-pose trigger fired (no charge phase)
    InstantFire { hand: HandSide },
    /// Beam body spawned
    BeamStart { hand: HandSide },
    /// Beam torn down
    BeamEnd { hand: HandSide, reason: EndReason },
}

impl ActionEvent {
    /// Two-char code used by the compact text format
    pub fn type_code(&self) -> &'static str {
        match self {
            ActionEvent::SessionStart { .. } => "SS",
            ActionEvent::Config(_) => "CF",
            ActionEvent::TrackingLost { .. } => "TL",
            ActionEvent::TrackingRecovered { .. } => "TR",
            ActionEvent::ChargeStart { .. } => "CS",
            ActionEvent::ChargeProgress { .. } => "CP",
            ActionEvent::FullyCharged { .. } => "FC",
            ActionEvent::Launch { .. } => "L",
            ActionEvent::Cancel { .. } => "C",
            ActionEvent::InstantFire { .. } => "IF",
            ActionEvent::BeamStart { .. } => "BS",
            ActionEvent::BeamEnd { .. } => "BE",
        }
    }
}
