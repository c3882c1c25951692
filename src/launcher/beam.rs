//! Continuous beam - trigger-held guided body with a sensing ray
//!
//! While the trigger holds, a single body flies at fixed speed along the
//! hand forward. Each tick a sensing ray runs from the hand to its far
//! point; when the body gets within tolerance of that point, or the
//! trigger drops, the beam tears down and the body is released to free
//! flight with a TTL so it is still reclaimed. No charge timer.

use bevy::prelude::*;

use crate::events::{ActionEvent, EndReason, EventBus};
use crate::hand::{HandInputs, HandPredicates, HandSide};
use crate::launcher::projectile::{AngularVelocity, Projectile, ProjectileTtl, Velocity};
use crate::tuning::Tuning;

/// Marker for the body a beam is currently guiding
#[derive(Component)]
pub struct BeamBody;

/// Trigger-held beam action for one hand
#[derive(Component)]
pub struct BeamAction {
    pub hand: HandSide,
    /// Body currently in flight, None while inactive
    pub body: Option<Entity>,
}

impl BeamAction {
    pub fn new(hand: HandSide) -> Self {
        Self { hand, body: None }
    }

    pub fn is_active(&self) -> bool {
        self.body.is_some()
    }
}

/// Has the body arrived within tolerance of the sensing ray's far point?
pub fn beam_arrived(
    body_pos: Vec3,
    hand_pos: Vec3,
    hand_forward: Vec3,
    max_distance: f32,
    tolerance: f32,
) -> bool {
    let far_point = hand_pos + hand_forward * max_distance;
    body_pos.distance(far_point) <= tolerance
}

/// Drive all beam actions: spawn on trigger rise, check the sensing ray
/// while active, tear down on arrival or trigger drop.
pub fn update_beams(
    mut commands: Commands,
    tuning: Res<Tuning>,
    mut inputs: ResMut<HandInputs>,
    predicates: Res<HandPredicates>,
    mut bus: ResMut<EventBus>,
    mut actions: Query<&mut BeamAction>,
    bodies: Query<&Transform, With<BeamBody>>,
) {
    for mut action in &mut actions {
        let hand = action.hand;
        if inputs.check_source(hand) {
            continue;
        }

        // Untracked tick reads as "trigger not held"
        let triggered = predicates.current(hand).is_some_and(|p| p.pinching);

        match action.body {
            None => {
                let was_triggered = predicates.previous_or_default(hand).pinching;
                if triggered && !was_triggered {
                    let Some(sample) = inputs.get(hand) else {
                        continue;
                    };
                    let entity = commands
                        .spawn((
                            BeamBody,
                            Transform::from_translation(
                                sample.point_ahead(tuning.launch_offset),
                            ),
                            Velocity(sample.forward * tuning.beam_speed),
                        ))
                        .id();
                    action.body = Some(entity);
                    bus.emit(ActionEvent::BeamStart { hand });
                }
            }
            Some(entity) => {
                let reason = if !triggered {
                    Some(EndReason::Released)
                } else if let (Some(sample), Ok(transform)) =
                    (inputs.get(hand), bodies.get(entity))
                {
                    beam_arrived(
                        transform.translation,
                        sample.position,
                        sample.forward,
                        tuning.beam_max_distance,
                        tuning.beam_arrival_tolerance,
                    )
                    .then_some(EndReason::Arrived)
                } else {
                    None
                };

                if let Some(reason) = reason {
                    // Release the body to free flight; the TTL still
                    // guarantees reclamation
                    if let Ok(mut e) = commands.get_entity(entity) {
                        // Spin-free, but the motion query needs the component
                        e.remove::<BeamBody>().insert((
                            Projectile,
                            AngularVelocity::default(),
                            ProjectileTtl(tuning.projectile_ttl),
                        ));
                    }
                    action.body = None;
                    bus.emit(ActionEvent::BeamEnd { hand, reason });
                }
            }
        }
    }
}

/// Move beam-guided bodies at their fixed velocity (no gravity while
/// the beam owns them)
pub fn beam_body_motion(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &Velocity), With<BeamBody>>,
) {
    let dt = time.delta_secs();
    for (mut transform, velocity) in &mut query {
        transform.translation += velocity.0 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_arrival_tolerance() {
        let hand = Vec3::ZERO;
        let forward = Vec3::Z;
        // Far point is (0, 0, 10)
        assert!(beam_arrived(Vec3::new(0.0, 0.0, 9.95), hand, forward, 10.0, 0.1));
        assert!(!beam_arrived(Vec3::new(0.0, 0.0, 9.0), hand, forward, 10.0, 0.1));
        // Lateral offset counts too
        assert!(!beam_arrived(Vec3::new(0.5, 0.0, 10.0), hand, forward, 10.0, 0.1));
    }

    #[test]
    fn test_beam_action_starts_inactive() {
        let action = BeamAction::new(HandSide::Right);
        assert!(!action.is_active());
    }
}
