//! Systems driving the charge machine and applying its effects
//!
//! Tick ordering is fixed by the plugin: classification runs first, then
//! this machine, then proxy easing/fade, then the launcher. Within one
//! tick a release therefore hands the proxy to the launcher before the
//! launcher runs, and the two never coexist as independent entities.

use bevy::prelude::*;

use crate::charge::action::{ChargeAction, ChargeEffect};
use crate::events::{ActionEvent, EventBus};
use crate::hand::{HandInputs, HandPredicates, HandSide};
use crate::launcher::LaunchQueue;
use crate::proxy::{ChargeProxy, Kinematic, ProxyFade};
use crate::tuning::Tuning;

/// Engine tick counter, used to gate periodic progress events
#[derive(Resource, Default)]
pub struct TickCount(pub u64);

/// Tracks per-hand tracking availability between ticks so loss/recovery
/// is reported as an edge, not a level
#[derive(Resource, Default)]
pub struct TrackingWatch {
    tracked: [bool; 2],
    seen: [bool; 2],
}

/// Emit TrackingLost/TrackingRecovered transitions to the bus
pub fn watch_tracking(
    inputs: Res<HandInputs>,
    mut watch: ResMut<TrackingWatch>,
    mut bus: ResMut<EventBus>,
) {
    for hand in HandSide::ALL {
        let i = hand.index();
        let tracked = inputs.is_tracked(hand);

        if tracked && !watch.seen[i] {
            // First sample ever; not a recovery
            watch.seen[i] = true;
        } else if watch.seen[i] && tracked != watch.tracked[i] {
            if tracked {
                bus.emit(ActionEvent::TrackingRecovered { hand });
            } else {
                bus.emit(ActionEvent::TrackingLost { hand });
            }
        }
        watch.tracked[i] = tracked;
    }
}

/// Advance every charge action by one tick and apply its effects:
/// spawn/retarget/fade/hand-over the visual proxy, queue launches, and
/// emit bus events.
pub fn drive_charge_actions(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut inputs: ResMut<HandInputs>,
    predicates: Res<HandPredicates>,
    mut bus: ResMut<EventBus>,
    mut launch_queue: ResMut<LaunchQueue>,
    mut ticks: ResMut<TickCount>,
    mut actions: Query<&mut ChargeAction>,
    mut proxies: Query<&mut ChargeProxy>,
) {
    ticks.0 += 1;
    let dt = time.delta_secs();

    for mut action in &mut actions {
        let hand = action.hand;
        if inputs.check_source(hand) {
            continue;
        }

        let previous = predicates.previous_or_default(hand);
        let current = predicates.current(hand).copied();
        let sample = inputs.get(hand).copied();

        let effects = action.tick(&previous, current.as_ref(), sample.as_ref(), &tuning, dt);

        for effect in effects {
            match effect {
                ChargeEffect::Started => {
                    bus.emit(ActionEvent::ChargeStart {
                        hand,
                        pos: (
                            action.anchor_point.x,
                            action.anchor_point.y,
                            action.anchor_point.z,
                        ),
                    });
                    if tuning.visual_feedback {
                        // Ownership invariant: any previous proxy was
                        // released on the transition back to Idle
                        debug_assert!(action.proxy.is_none());
                        let entity = commands
                            .spawn((
                                Transform::from_translation(action.anchor_point)
                                    .with_scale(Vec3::ZERO),
                                ChargeProxy {
                                    target_pos: action.anchor_point,
                                    target_scale: 0.0,
                                },
                                Kinematic,
                            ))
                            .id();
                        action.proxy = Some(entity);
                    }
                }
                ChargeEffect::Progressed { percent } => {
                    if let Some(entity) = action.proxy
                        && let Ok(mut proxy) = proxies.get_mut(entity)
                    {
                        proxy.target_pos = action.anchor_point;
                        proxy.target_scale = percent * tuning.max_charge_scale;
                    }
                    if tuning.progress_log_interval > 0
                        && ticks.0 % tuning.progress_log_interval == 0
                    {
                        bus.emit(ActionEvent::ChargeProgress { hand, percent });
                    }
                }
                ChargeEffect::FullyCharged => {
                    bus.emit(ActionEvent::FullyCharged {
                        hand,
                        elapsed: action.elapsed,
                    });
                }
                ChargeEffect::Launched(request) => {
                    // Atomic ownership transfer: the proxy leaves the
                    // action and rides the request to the launcher
                    let reuse = action.proxy.take();
                    launch_queue.push(hand, request, reuse);
                }
                ChargeEffect::Cancelled { elapsed } => {
                    if let Some(entity) = action.proxy.take()
                        && let Ok(mut e) = commands.get_entity(entity)
                    {
                        // Deferred despawn leaves room for a fade-out
                        e.insert(ProxyFade(tuning.cancel_fade_delay));
                    }
                    bus.emit(ActionEvent::Cancel { hand, elapsed });
                }
            }
        }
    }
}
