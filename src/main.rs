//! Handcast - gesture-driven charge-and-release action engine
//!
//! Headless demo: runs a canned (or TOML) gesture scenario through the
//! full engine and prints the resulting event log.
//!
//! Usage:
//!   cargo run -- --variant pinch
//!   cargo run -- --variant palm_flip --frames 300
//!   cargo run -- --scenario scenarios/quick_cancel.toml --log

use std::path::Path;

use handcast::{
    ActionConfig, ActionSetup, EventBuffer, EventLogger, GestureBinding, GestureScript, HandSide,
    ScenarioDefinition, SimConfig, SimResult, TrackingLossPolicy, Tuning, run_scenario, run_script,
    sim::poses,
};

struct DemoArgs {
    variant: String,
    scenario: Option<String>,
    frames: u32,
    dt: f32,
    write_log: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            variant: "pinch".to_string(),
            scenario: None,
            frames: 400,
            dt: 1.0 / 60.0,
            write_log: false,
        }
    }
}

fn parse_args() -> DemoArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = DemoArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--variant" => {
                if i + 1 < args.len() {
                    parsed.variant = args[i + 1].clone();
                    i += 1;
                }
            }
            "--scenario" => {
                if i + 1 < args.len() {
                    parsed.scenario = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--frames" => {
                if i + 1 < args.len() {
                    parsed.frames = args[i + 1].parse().unwrap_or(400);
                    i += 1;
                }
            }
            "--dt" => {
                if i + 1 < args.len() {
                    parsed.dt = args[i + 1].parse().unwrap_or(1.0 / 60.0);
                    i += 1;
                }
            }
            "--log" => {
                parsed.write_log = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    parsed
}

fn print_help() {
    println!(
        r#"Handcast - headless action engine demo

USAGE:
    cargo run -- [OPTIONS]

OPTIONS:
    --variant <NAME>    Canned demo: pinch, palm_flip, open_hand, instant, beam
                        (default: pinch)
    --scenario <FILE>   Run a TOML scenario file instead of a canned demo
    --frames <N>        Frames to simulate (default: 400)
    --dt <SECS>         Fixed timestep (default: 1/60)
    --log               Write the event log to logs/<timestamp>.evlog
    --help, -h          Show this help
"#
    );
}

/// Canned demo scripts, one full cycle per variant
fn demo_script(variant: &str) -> Option<(ActionSetup, GestureScript)> {
    let hand = HandSide::Right;
    match variant {
        "pinch" => Some((
            ActionSetup::charge(GestureBinding::PinchCharge),
            GestureScript::new(hand)
                .hold(10, poses::rest())
                .hold(210, poses::pinch())
                .hold(20, poses::rest()),
        )),
        "palm_flip" => Some((
            ActionSetup::charge(GestureBinding::PalmFlipCharge),
            GestureScript::new(hand)
                .hold(10, poses::rest())
                .hold(210, poses::open_palm_up())
                .hold(20, poses::open_palm_down()),
        )),
        "open_hand" => Some((
            ActionSetup::Charge {
                binding: GestureBinding::OpenHandRelease,
                loss_policy: TrackingLossPolicy::Freeze,
            },
            GestureScript::new(hand)
                .hold(10, poses::rest())
                .hold(210, poses::pinch())
                .hold(20, poses::open_neutral()),
        )),
        "instant" => Some((
            ActionSetup::InstantFire,
            GestureScript::new(hand)
                .hold(10, poses::gun())
                .hold(10, poses::gun_pinch())
                .hold(10, poses::gun()),
        )),
        "beam" => Some((
            ActionSetup::Beam,
            GestureScript::new(hand)
                .hold(10, poses::rest())
                .hold(80, poses::pinch())
                .hold(10, poses::rest()),
        )),
        _ => None,
    }
}

fn config_snapshot(tuning: &Tuning) -> ActionConfig {
    ActionConfig {
        charge_time: tuning.charge_time,
        launch_speed: tuning.launch_speed,
        max_charge_scale: tuning.max_charge_scale,
        projectile_ttl: tuning.projectile_ttl,
        open_hand_threshold: tuning.thresholds.open_hand,
        extended_threshold: tuning.thresholds.extended,
        closed_threshold: tuning.thresholds.closed,
        palm_up_threshold: tuning.thresholds.palm_up,
        palm_down_threshold: tuning.thresholds.palm_down,
        visual_feedback: tuning.visual_feedback,
    }
}

fn main() {
    let args = parse_args();
    let tuning = Tuning::load();

    let config = SimConfig {
        frames: args.frames,
        dt: args.dt,
        tuning: tuning.clone(),
    };

    let result: SimResult = if let Some(ref path) = args.scenario {
        let def = match ScenarioDefinition::parse_file(Path::new(path)) {
            Ok(def) => def,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
        println!("Running scenario: {}", def.name);
        match run_scenario(&def, config) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    } else {
        let Some((setup, script)) = demo_script(&args.variant) else {
            eprintln!(
                "Unknown variant '{}' (try pinch, palm_flip, open_hand, instant, beam)",
                args.variant
            );
            std::process::exit(1);
        };
        println!("Running demo variant: {}", args.variant);
        run_script(setup, script, config)
    };

    // Assemble the session log: header events plus everything the
    // engine emitted during the run
    let mut buffer = EventBuffer::new();
    buffer.start_session(&chrono::Utc::now().to_rfc3339());
    buffer.log_config(config_snapshot(&tuning));
    buffer.import_events(result.events.iter().map(|e| (e.time_ms, e.event.clone())));

    println!("{}", buffer.serialize());
    println!("{} events in {} frames", buffer.events().len(), args.frames);

    if args.write_log {
        let logger = EventLogger::new("logs");
        if let Err(e) = logger.write(&buffer) {
            eprintln!("Failed to write event log: {}", e);
        }
    }
}
