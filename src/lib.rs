//! Handcast - a gesture-driven charge-and-release action engine built with Bevy
//!
//! Hand tracking samples come in, classified gesture predicates drive a
//! per-action state machine, and fully charged releases turn the visual
//! charge proxy into a launched projectile. Everything runs headless;
//! rendering and physics belong to the host application.

// Core modules
pub mod constants;
pub mod events;
pub mod helpers;
pub mod sim;
pub mod tuning;

// Engine modules
pub mod charge;
pub mod hand;
pub mod launcher;
pub mod proxy;

// Re-export commonly used types for convenience
pub use charge::{
    ChargeAction, ChargeEffect, ChargePhase, GestureBinding, TickCount, TrackingLossPolicy,
    TrackingWatch, drive_charge_actions, watch_tracking,
};
pub use constants::*;
pub use events::{
    ActionConfig, ActionEvent, BusEvent, EndReason, EventBuffer, EventBus, EventLogger,
    parse_event, serialize_event, update_event_bus_time,
};
pub use hand::{
    Finger, GesturePredicates, GestureSample, HandInputs, HandPredicates, HandSide, classify,
    classify_hands,
};
pub use helpers::*;
pub use launcher::{
    AngularVelocity, BeamAction, BeamBody, InstantFireAction, LaunchQueue, LaunchRequest,
    Projectile, ProjectileTtl, Velocity, beam_body_motion, fire_instant_actions, launch_projectiles,
    projectile_motion, tick_projectile_ttl, update_beams,
};
pub use proxy::{ChargeProxy, Kinematic, ProxyFade, fade_out_proxies, update_charge_proxies};
pub use sim::{
    ActionSetup, GestureScript, ScenarioDefinition, ScriptState, SimConfig, SimResult,
    inject_scripted_samples, run_scenario, run_script,
};
pub use tuning::{GestureThresholds, TUNING_FILE, Tuning};
