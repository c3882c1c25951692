//! Tunable constants for handcast
//!
//! Default gesture thresholds and action values live here; the `Tuning`
//! resource starts from these and can be overridden from the config file.

// =============================================================================
// GESTURE THRESHOLDS
// =============================================================================

pub const OPEN_HAND_THRESHOLD: f32 = 0.08; // All four pinch strengths below this = open hand
pub const EXTENDED_THRESHOLD: f32 = 0.3; // Index strength below this = finger extended
pub const CLOSED_THRESHOLD: f32 = 0.6; // Middle/ring/pinky strength above this = finger curled
pub const PALM_UP_THRESHOLD: f32 = 0.5; // -up.y above this = palm facing up
pub const PALM_DOWN_THRESHOLD: f32 = -0.5; // -up.y below this = palm facing down

// =============================================================================
// CHARGING
// =============================================================================

pub const CHARGE_TIME: f32 = 3.0; // Seconds of held gesture to reach full charge
pub const MAX_CHARGE_SCALE: f32 = 0.3; // Proxy scale at 100% charge (meters)
pub const CANCEL_FADE_DELAY: f32 = 0.2; // Seconds the proxy lingers after a cancel
pub const PROGRESS_LOG_INTERVAL: u64 = 30; // Emit ChargeProgress every N ticks

// =============================================================================
// PROXY EASING
// =============================================================================

pub const SCALE_SMOOTHING: f32 = 5.0; // Exponential rate for scale approach
pub const FOLLOW_SMOOTHING: f32 = 10.0; // Exponential rate for position approach
pub const PROXY_SPIN_RATE: f32 = 100.0; // Cosmetic yaw spin, degrees per second

// =============================================================================
// LAUNCHING
// =============================================================================

pub const LAUNCH_SPEED: f32 = 15.0; // Initial projectile speed (m/s)
pub const LAUNCH_OFFSET: f32 = 0.2; // Spawn point offset along hand forward (meters)
pub const PROJECTILE_TTL: f32 = 5.0; // Seconds before a launched body is reclaimed
pub const PROJECTILE_GRAVITY: f32 = 9.81; // Downward acceleration on launched bodies
pub const ANGULAR_SPEED_MAX: f32 = 2.0; // Max magnitude of random launch spin (rad/s)

// =============================================================================
// BEAM
// =============================================================================

pub const BEAM_SPEED: f32 = 10.0; // Guided body speed (m/s)
pub const BEAM_MAX_DISTANCE: f32 = 10.0; // Sensing ray length from the hand (meters)
pub const BEAM_ARRIVAL_TOLERANCE: f32 = 0.1; // Body within this of the ray far point = arrived
