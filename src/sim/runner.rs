//! Headless fixed-dt simulation runner
//!
//! Builds a minimal Bevy app with the full engine system chain, feeds
//! it a scripted gesture stream, and collects every bus event. Used by
//! the demo binary and by scenario tests; determinism comes from
//! `TimeUpdateStrategy::ManualDuration` rather than wall-clock time.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::charge::{
    ChargeAction, GestureBinding, TickCount, TrackingLossPolicy, TrackingWatch,
    drive_charge_actions, watch_tracking,
};
use crate::events::{BusEvent, EventBus, update_event_bus_time};
use crate::hand::{HandInputs, HandPredicates, classify_hands};
use crate::launcher::{
    BeamAction, InstantFireAction, LaunchQueue, beam_body_motion, fire_instant_actions,
    launch_projectiles, projectile_motion, tick_projectile_ttl, update_beams,
};
use crate::proxy::{fade_out_proxies, update_charge_proxies};
use crate::sim::script::{GestureScript, ScenarioDefinition, ScriptState, inject_scripted_samples};
use crate::tuning::Tuning;

/// Which action to spawn for a run
#[derive(Debug, Clone, Copy)]
pub enum ActionSetup {
    Charge {
        binding: GestureBinding,
        loss_policy: TrackingLossPolicy,
    },
    InstantFire,
    Beam,
}

impl ActionSetup {
    pub fn charge(binding: GestureBinding) -> Self {
        ActionSetup::Charge {
            binding,
            loss_policy: TrackingLossPolicy::Freeze,
        }
    }
}

/// Fixed-step run parameters
#[derive(Clone)]
pub struct SimConfig {
    /// Scripted frames to run (after the zero-delta warmup tick)
    pub frames: u32,
    pub dt: f32,
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            dt: 1.0 / 60.0,
            tuning: Tuning::default(),
        }
    }
}

/// Run output: every bus event plus the final app for world inspection
pub struct SimResult {
    pub events: Vec<BusEvent>,
    pub app: App,
}

impl SimResult {
    /// Event type codes in emission order
    pub fn codes(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.event.type_code()).collect()
    }

    pub fn count(&self, code: &str) -> usize {
        self.codes().iter().filter(|&&c| c == code).count()
    }
}

/// Run one action against a scripted gesture stream
pub fn run_script(setup: ActionSetup, script: GestureScript, config: SimConfig) -> SimResult {
    let hand = script.hand();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        config.dt,
    )));

    app.insert_resource(config.tuning.clone());
    app.insert_resource(EventBus::new());
    app.init_resource::<HandInputs>();
    app.init_resource::<HandPredicates>();
    app.init_resource::<LaunchQueue>();
    app.init_resource::<TickCount>();
    app.init_resource::<TrackingWatch>();
    app.init_resource::<ScriptState>();

    app.add_systems(PreUpdate, inject_scripted_samples);
    // Ordering contract: classification, then state transitions, then
    // visual-proxy updates, then launch-request consumption
    app.add_systems(
        Update,
        (
            update_event_bus_time,
            watch_tracking,
            classify_hands,
            drive_charge_actions,
            update_charge_proxies,
            fade_out_proxies,
            fire_instant_actions,
            update_beams,
            launch_projectiles,
            beam_body_motion,
            projectile_motion,
            tick_projectile_ttl,
        )
            .chain(),
    );

    // Warmup tick: the first update has a zero delta, so the scripted
    // frames that follow each advance exactly dt
    app.update();

    match setup {
        ActionSetup::Charge {
            binding,
            loss_policy,
        } => {
            app.world_mut()
                .spawn(ChargeAction::new(hand, binding).with_loss_policy(loss_policy));
        }
        ActionSetup::InstantFire => {
            app.world_mut().spawn(InstantFireAction::new(hand));
        }
        ActionSetup::Beam => {
            app.world_mut().spawn(BeamAction::new(hand));
        }
    }

    app.insert_resource(ScriptState::new(script));

    let mut events = Vec::new();
    for _ in 0..config.frames {
        app.update();
        events.extend(app.world_mut().resource_mut::<EventBus>().drain());
    }

    SimResult { events, app }
}

/// Run a parsed TOML scenario
pub fn run_scenario(def: &ScenarioDefinition, config: SimConfig) -> Result<SimResult, String> {
    let setup = match def.variant.as_str() {
        "pinch" => ActionSetup::charge(GestureBinding::PinchCharge),
        "palm_flip" => ActionSetup::charge(GestureBinding::PalmFlipCharge),
        "open_hand" => ActionSetup::charge(GestureBinding::OpenHandRelease),
        "instant" => ActionSetup::InstantFire,
        "beam" => ActionSetup::Beam,
        other => return Err(format!("Unknown variant '{}'", other)),
    };

    let script = def.script()?;
    let mut config = config;
    if config.frames < script.len() {
        config.frames = script.len();
    }

    let result = run_script(setup, script, config);

    // Verify the expected codes appear as a subsequence
    let codes = result.codes();
    let mut expected = def.expect.iter();
    let mut want = expected.next();
    for code in &codes {
        if let Some(w) = want
            && w == code
        {
            want = expected.next();
        }
    }
    if let Some(missing) = want {
        return Err(format!(
            "Scenario '{}': expected event '{}' not found in {:?}",
            def.name, missing, codes
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ActionEvent;
    use crate::launcher::{Projectile, ProjectileTtl, Velocity};
    use crate::proxy::{ChargeProxy, ProxyFade};
    use crate::sim::script::poses;
    use crate::hand::HandSide;

    const DT: f32 = 1.0 / 60.0;

    fn config(frames: u32) -> SimConfig {
        SimConfig {
            frames,
            dt: DT,
            tuning: Tuning::default(), // charge_time = 3.0, ttl = 5.0
        }
    }

    fn assert_subsequence(codes: &[&str], expected: &[&str]) {
        let mut iter = expected.iter();
        let mut want = iter.next();
        for code in codes {
            if let Some(w) = want
                && w == code
            {
                want = iter.next();
            }
        }
        assert!(
            want.is_none(),
            "missing expected event {:?} in {:?}",
            want,
            codes
        );
    }

    #[test]
    fn test_pinch_charge_full_cycle() {
        // Hold pinch for 3.5s at 60fps, then release
        let script = GestureScript::new(HandSide::Right)
            .hold(210, poses::pinch())
            .hold(10, poses::rest());
        let result = run_script(
            ActionSetup::charge(GestureBinding::PinchCharge),
            script,
            config(230),
        );

        assert_subsequence(&result.codes(), &["CS", "FC", "L"]);
        assert_eq!(result.count("FC"), 1);
        assert_eq!(result.count("L"), 1);
        assert_eq!(result.count("C"), 0);

        // Fully charged at or before simulated t = 3.0s
        let fc_time = result
            .events
            .iter()
            .find(|e| matches!(e.event, ActionEvent::FullyCharged { .. }))
            .unwrap()
            .time_ms;
        assert!(fc_time <= 3020, "fully charged at {}ms", fc_time);

        // Launch direction equals the hand forward vector at release
        let launch = result
            .events
            .iter()
            .find_map(|e| match &e.event {
                ActionEvent::Launch { dir, speed, .. } => Some((*dir, *speed)),
                _ => None,
            })
            .unwrap();
        assert_eq!(launch.0, (0.0, 0.0, 1.0));
        assert_eq!(launch.1, Tuning::default().launch_speed);
    }

    #[test]
    fn test_early_release_cancels() {
        // Release at t = 1.0s, well before the 3.0s threshold
        let script = GestureScript::new(HandSide::Right)
            .hold(60, poses::pinch())
            .hold(10, poses::rest());
        let result = run_script(
            ActionSetup::charge(GestureBinding::PinchCharge),
            script,
            config(80),
        );

        assert_subsequence(&result.codes(), &["CS", "C"]);
        assert_eq!(result.count("L"), 0);
        assert_eq!(result.count("FC"), 0);

        // No proxy survives the cancel fade
        let mut app = result.app;
        let world = app.world_mut();
        let mut proxies = world.query::<&ChargeProxy>();
        assert_eq!(proxies.iter(world).count(), 0);
        let mut fades = world.query::<&ProxyFade>();
        assert_eq!(fades.iter(world).count(), 0);
    }

    #[test]
    fn test_launch_repurposes_proxy_and_ttl_reclaims() {
        let script = GestureScript::new(HandSide::Right)
            .hold(210, poses::pinch())
            .hold(10, poses::rest());

        // Stop right after the launch to inspect the handoff
        let result = run_script(
            ActionSetup::charge(GestureBinding::PinchCharge),
            script.clone(),
            config(215),
        );
        let mut app = result.app;
        let world = app.world_mut();
        // Exactly one body, no proxy: ownership transferred, not duplicated
        let mut bodies = world.query::<&Projectile>();
        assert_eq!(bodies.iter(world).count(), 1);
        let mut proxies = world.query::<&ChargeProxy>();
        assert_eq!(proxies.iter(world).count(), 0);
        let mut ttls = world.query::<&ProjectileTtl>();
        let ttl = ttls.single(world).unwrap();
        assert!(ttl.0 <= 5.0 && ttl.0 > 4.8);

        // Run long enough for the TTL to expire: the body is reclaimed
        // regardless of where it is
        let result = run_script(
            ActionSetup::charge(GestureBinding::PinchCharge),
            script,
            config(540),
        );
        let mut app = result.app;
        let world = app.world_mut();
        let mut bodies = world.query::<&Projectile>();
        assert_eq!(bodies.iter(world).count(), 0);
    }

    #[test]
    fn test_instant_fire_same_tick_no_charge() {
        let script = GestureScript::new(HandSide::Right)
            .hold(5, poses::gun())
            .hold(5, poses::gun_pinch())
            .hold(5, poses::gun());
        let result = run_script(ActionSetup::InstantFire, script, config(20));

        // Launch fired, no charge phase ever observed
        assert_eq!(result.count("IF"), 1);
        assert_eq!(result.count("L"), 1);
        assert_eq!(result.count("CS"), 0);
        assert_eq!(result.count("FC"), 0);

        // IF and L land on the same tick
        let if_time = result
            .events
            .iter()
            .find(|e| matches!(e.event, ActionEvent::InstantFire { .. }))
            .unwrap()
            .time_ms;
        let l_time = result
            .events
            .iter()
            .find(|e| matches!(e.event, ActionEvent::Launch { .. }))
            .unwrap()
            .time_ms;
        assert_eq!(if_time, l_time);
    }

    #[test]
    fn test_open_hand_release_incomplete_cancels() {
        // Start via pinch, open the hand at t = 1.0s
        let script = GestureScript::new(HandSide::Left)
            .hold(60, poses::pinch())
            .hold(10, poses::open_neutral());
        let result = run_script(
            ActionSetup::charge(GestureBinding::OpenHandRelease),
            script,
            config(80),
        );

        assert_subsequence(&result.codes(), &["CS", "C"]);
        assert_eq!(result.count("L"), 0);
    }

    #[test]
    fn test_palm_flip_launch() {
        let script = GestureScript::new(HandSide::Right)
            .hold(200, poses::open_palm_up())
            .hold(10, poses::open_palm_down());
        let result = run_script(
            ActionSetup::charge(GestureBinding::PalmFlipCharge),
            script,
            config(220),
        );

        assert_subsequence(&result.codes(), &["CS", "FC", "L"]);
        assert_eq!(result.count("C"), 0);
    }

    #[test]
    fn test_palm_flip_close_aborts_even_when_charged() {
        let script = GestureScript::new(HandSide::Right)
            .hold(200, poses::open_palm_up())
            .hold(10, poses::fist());
        let result = run_script(
            ActionSetup::charge(GestureBinding::PalmFlipCharge),
            script,
            config(220),
        );

        assert_subsequence(&result.codes(), &["CS", "FC", "C"]);
        assert_eq!(result.count("L"), 0);
    }

    #[test]
    fn test_beam_release_and_arrival() {
        // Released early: body detaches and keeps a TTL
        let script = GestureScript::new(HandSide::Right)
            .hold(20, poses::pinch())
            .hold(10, poses::rest());
        let result = run_script(ActionSetup::Beam, script, config(40));
        assert_subsequence(&result.codes(), &["BS", "BE"]);
        let reason = result
            .events
            .iter()
            .find_map(|e| match &e.event {
                ActionEvent::BeamEnd { reason, .. } => Some(*reason),
                _ => None,
            })
            .unwrap();
        assert_eq!(reason, crate::events::EndReason::Released);

        // Held to arrival: the body reaches the ray far point
        let script = GestureScript::new(HandSide::Right).hold(80, poses::pinch());
        let result = run_script(ActionSetup::Beam, script, config(80));
        let reason = result
            .events
            .iter()
            .find_map(|e| match &e.event {
                ActionEvent::BeamEnd { reason, .. } => Some(*reason),
                _ => None,
            })
            .unwrap();
        assert_eq!(reason, crate::events::EndReason::Arrived);
    }

    #[test]
    fn test_released_beam_body_keeps_flying() {
        // Trigger drops at t ~= 0.33s; the body detaches and must keep
        // its forward velocity instead of hanging in the air
        let script = GestureScript::new(HandSide::Right)
            .hold(20, poses::pinch())
            .hold(20, poses::rest());
        let result = run_script(ActionSetup::Beam, script, config(40));
        assert_eq!(result.count("BE"), 1);

        let mut app = result.app;
        let world = app.world_mut();
        let mut bodies = world.query_filtered::<(&Transform, &Velocity), With<Projectile>>();
        let (transform, velocity) = bodies.single(world).unwrap();
        assert!(velocity.0.z > 0.0);
        // Beam flight alone reaches z ~= 3.4 by teardown; free flight
        // afterwards carries it well past that
        assert!(
            transform.translation.z > 4.5,
            "body stalled at z = {}",
            transform.translation.z
        );
        // Gravity acts once the beam lets go
        assert!(transform.translation.y < 1.2);
    }

    #[test]
    fn test_tracking_gap_freezes_then_resumes() {
        // Pinch, lose tracking mid-charge, recover with pinch still held
        let script = GestureScript::new(HandSide::Right)
            .hold(60, poses::pinch())
            .gap(30)
            .hold(180, poses::pinch())
            .hold(10, poses::rest());
        let result = run_script(
            ActionSetup::charge(GestureBinding::PinchCharge),
            script,
            config(290),
        );

        assert_subsequence(&result.codes(), &["CS", "TL", "TR", "FC", "L"]);
        // Freeze policy: the gap neither cancels nor restarts the charge
        assert_eq!(result.count("C"), 0);
        assert_eq!(result.count("CS"), 1);
    }

    #[test]
    fn test_tracking_gap_cancel_policy() {
        let script = GestureScript::new(HandSide::Right)
            .hold(60, poses::pinch())
            .gap(10);
        let result = run_script(
            ActionSetup::Charge {
                binding: GestureBinding::PinchCharge,
                loss_policy: TrackingLossPolicy::Cancel,
            },
            script,
            config(75),
        );

        assert_subsequence(&result.codes(), &["CS", "C"]);
        assert_eq!(result.count("L"), 0);
    }

    #[test]
    fn test_scenario_end_to_end() {
        let toml = r#"
name = "Charge and launch"
variant = "pinch"
hand = "R"
expect = ["CS", "FC", "L"]

[[input]]
frames = 210
pose = "pinch"

[[input]]
frames = 10
pose = "rest"
"#;
        let def: ScenarioDefinition = toml::from_str(toml).unwrap();
        run_scenario(&def, config(230)).unwrap();
    }

    #[test]
    fn test_scenario_reports_missing_event() {
        let toml = r#"
name = "Impossible"
variant = "pinch"
expect = ["L"]

[[input]]
frames = 30
pose = "pinch"
"#;
        let def: ScenarioDefinition = toml::from_str(toml).unwrap();
        assert!(run_scenario(&def, config(40)).is_err());
    }
}
