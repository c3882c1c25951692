//! Global action tuning (decoupled from the systems that consume it)
//!
//! Loads and saves user-adjustable values to/from a JSON file in the
//! config directory. Missing or malformed files fall back to the
//! defaults in `constants.rs` with a warning, never an error.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Path to the action tuning config
pub const TUNING_FILE: &str = "config/action_tuning.json";

/// Gesture classification thresholds (configuration, not constants)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GestureThresholds {
    /// All four pinch strengths below this = open hand
    pub open_hand: f32,
    /// Index strength below this = finger extended
    pub extended: f32,
    /// Middle/ring/pinky strength above this = finger curled
    pub closed: f32,
    /// Palm orientation above this = palm up
    pub palm_up: f32,
    /// Palm orientation below this = palm down
    pub palm_down: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            open_hand: OPEN_HAND_THRESHOLD,
            extended: EXTENDED_THRESHOLD,
            closed: CLOSED_THRESHOLD,
            palm_up: PALM_UP_THRESHOLD,
            palm_down: PALM_DOWN_THRESHOLD,
        }
    }
}

fn default_progress_log_interval() -> u64 {
    PROGRESS_LOG_INTERVAL
}
fn default_beam_speed() -> f32 {
    BEAM_SPEED
}
fn default_beam_max_distance() -> f32 {
    BEAM_MAX_DISTANCE
}
fn default_beam_arrival_tolerance() -> f32 {
    BEAM_ARRIVAL_TOLERANCE
}

/// Every tunable value the engine reads, as a single resource.
/// Per-action overrides are not supported; one tuning set drives all
/// active actions, the way a scene-wide config would.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub thresholds: GestureThresholds,
    /// Seconds of held gesture required for a full charge
    pub charge_time: f32,
    /// Spawn a visual proxy while charging
    pub visual_feedback: bool,
    /// Proxy scale at 100% charge
    pub max_charge_scale: f32,
    /// Exponential rate for proxy scale approach
    pub scale_smoothing: f32,
    /// Exponential rate for proxy position approach
    pub follow_smoothing: f32,
    /// Cosmetic proxy yaw spin, degrees per second
    pub proxy_spin_rate: f32,
    /// Seconds the proxy lingers after a cancel before despawning
    pub cancel_fade_delay: f32,
    /// Initial projectile speed
    pub launch_speed: f32,
    /// Launch point offset along the hand forward vector
    pub launch_offset: f32,
    /// Seconds before a launched body is unconditionally reclaimed
    pub projectile_ttl: f32,
    /// Downward acceleration applied to launched bodies
    pub projectile_gravity: f32,
    /// Upper bound on the random launch spin magnitude (rad/s)
    pub angular_speed_max: f32,
    /// Emit a ChargeProgress event every N ticks (0 disables)
    #[serde(default = "default_progress_log_interval")]
    pub progress_log_interval: u64,
    #[serde(default = "default_beam_speed")]
    pub beam_speed: f32,
    #[serde(default = "default_beam_max_distance")]
    pub beam_max_distance: f32,
    #[serde(default = "default_beam_arrival_tolerance")]
    pub beam_arrival_tolerance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            thresholds: GestureThresholds::default(),
            charge_time: CHARGE_TIME,
            visual_feedback: true,
            max_charge_scale: MAX_CHARGE_SCALE,
            scale_smoothing: SCALE_SMOOTHING,
            follow_smoothing: FOLLOW_SMOOTHING,
            proxy_spin_rate: PROXY_SPIN_RATE,
            cancel_fade_delay: CANCEL_FADE_DELAY,
            launch_speed: LAUNCH_SPEED,
            launch_offset: LAUNCH_OFFSET,
            projectile_ttl: PROJECTILE_TTL,
            projectile_gravity: PROJECTILE_GRAVITY,
            angular_speed_max: ANGULAR_SPEED_MAX,
            progress_log_interval: default_progress_log_interval(),
            beam_speed: default_beam_speed(),
            beam_max_distance: default_beam_max_distance(),
            beam_arrival_tolerance: default_beam_arrival_tolerance(),
        }
    }
}

impl Tuning {
    /// Load tuning from file, or return defaults if it doesn't exist
    pub fn load() -> Self {
        let path = Path::new(TUNING_FILE);
        if !path.exists() {
            info!("No {} found, using default tuning", TUNING_FILE);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tuning) => {
                    info!("Loaded tuning from {}", TUNING_FILE);
                    tuning
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", TUNING_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", TUNING_FILE, e);
                Self::default()
            }
        }
    }

    /// Save tuning to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = Path::new(TUNING_FILE).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(TUNING_FILE, json)?;
        info!("Saved tuning to {}", TUNING_FILE);
        Ok(())
    }
}
