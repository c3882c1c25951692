//! Compact text format for action event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = event type code
//! - data = pipe-separated values specific to the event type
//!
//! Examples:
//! ```text
//! T:00000|SS|b2c1...|2026-08-23T10:00:00Z
//! T:00150|CS|R|0.0,1.2,0.4
//! T:01650|FC|R|3.0
//! T:01700|L|R|0.0,0.1,1.0|15.0
//! T:02100|C|L|1.2
//! ```

use super::types::{ActionConfig, ActionEvent, EndReason};
use crate::hand::HandSide;

/// Format a float with fixed precision (1 decimal)
fn fmt_f1(v: f32) -> String {
    format!("{:.1}", v)
}

/// Format a 3D vector payload
fn fmt_vec3(v: (f32, f32, f32)) -> String {
    format!("{:.2},{:.2},{:.2}", v.0, v.1, v.2)
}

/// Serialize an ActionEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &ActionEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        ActionEvent::SessionStart {
            session_id,
            timestamp,
        } => {
            format!("{}|{}", session_id, timestamp)
        }
        ActionEvent::Config(config) => {
            // Compact JSON for easy parsing
            serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string())
        }
        ActionEvent::TrackingLost { hand } => hand.to_string(),
        ActionEvent::TrackingRecovered { hand } => hand.to_string(),
        ActionEvent::ChargeStart { hand, pos } => {
            format!("{}|{}", hand, fmt_vec3(*pos))
        }
        ActionEvent::ChargeProgress { hand, percent } => {
            format!("{}|{:.2}", hand, percent)
        }
        ActionEvent::FullyCharged { hand, elapsed } => {
            format!("{}|{}", hand, fmt_f1(*elapsed))
        }
        ActionEvent::Launch { hand, dir, speed } => {
            format!("{}|{}|{}", hand, fmt_vec3(*dir), fmt_f1(*speed))
        }
        ActionEvent::Cancel { hand, elapsed } => {
            format!("{}|{}", hand, fmt_f1(*elapsed))
        }
        ActionEvent::InstantFire { hand } => hand.to_string(),
        ActionEvent::BeamStart { hand } => hand.to_string(),
        ActionEvent::BeamEnd { hand, reason } => {
            format!("{}|{}", hand, reason)
        }
    };

    if data.is_empty() {
        format!("{}|{}", ts, code)
    } else {
        format!("{}|{}|{}", ts, code, data)
    }
}

fn parse_hand(s: &str) -> Option<HandSide> {
    match s {
        "L" => Some(HandSide::Left),
        "R" => Some(HandSide::Right),
        _ => None,
    }
}

fn parse_vec3(s: &str) -> Option<(f32, f32, f32)> {
    let mut parts = s.split(',');
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    Some((x, y, z))
}

/// Parse a line of compact text format back into (time_ms, ActionEvent).
/// Returns None for malformed lines (analysis tools skip them).
pub fn parse_event(line: &str) -> Option<(u32, ActionEvent)> {
    let mut parts = line.split('|');

    let ts = parts.next()?.strip_prefix("T:")?.parse().ok()?;
    let code = parts.next()?;

    let event = match code {
        "SS" => ActionEvent::SessionStart {
            session_id: parts.next()?.to_string(),
            timestamp: parts.next()?.to_string(),
        },
        "CF" => {
            let config: ActionConfig = serde_json::from_str(parts.next()?).ok()?;
            ActionEvent::Config(config)
        }
        "TL" => ActionEvent::TrackingLost {
            hand: parse_hand(parts.next()?)?,
        },
        "TR" => ActionEvent::TrackingRecovered {
            hand: parse_hand(parts.next()?)?,
        },
        "CS" => ActionEvent::ChargeStart {
            hand: parse_hand(parts.next()?)?,
            pos: parse_vec3(parts.next()?)?,
        },
        "CP" => ActionEvent::ChargeProgress {
            hand: parse_hand(parts.next()?)?,
            percent: parts.next()?.parse().ok()?,
        },
        "FC" => ActionEvent::FullyCharged {
            hand: parse_hand(parts.next()?)?,
            elapsed: parts.next()?.parse().ok()?,
        },
        "L" => ActionEvent::Launch {
            hand: parse_hand(parts.next()?)?,
            dir: parse_vec3(parts.next()?)?,
            speed: parts.next()?.parse().ok()?,
        },
        "C" => ActionEvent::Cancel {
            hand: parse_hand(parts.next()?)?,
            elapsed: parts.next()?.parse().ok()?,
        },
        "IF" => ActionEvent::InstantFire {
            hand: parse_hand(parts.next()?)?,
        },
        "BS" => ActionEvent::BeamStart {
            hand: parse_hand(parts.next()?)?,
        },
        "BE" => {
            let hand = parse_hand(parts.next()?)?;
            let reason = match parts.next()? {
                "released" => EndReason::Released,
                "arrived" => EndReason::Arrived,
                _ => return None,
            };
            ActionEvent::BeamEnd { hand, reason }
        }
        _ => return None,
    };

    Some((ts, event))
}
