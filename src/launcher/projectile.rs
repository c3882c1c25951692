//! Projectile launch and lifetime systems
//!
//! Converts queued launch requests into flying bodies: repurposes the
//! charging proxy when one is handed over (no despawn/respawn at launch)
//! or spawns a fresh body, sets initial velocities, and arms the TTL
//! that guarantees every launched body is eventually reclaimed.

use bevy::prelude::*;
use rand::Rng;

use crate::events::{ActionEvent, EventBus};
use crate::hand::HandSide;
use crate::helpers::random_in_unit_sphere;
use crate::proxy::{ChargeProxy, Kinematic};
use crate::tuning::Tuning;

/// Linear velocity of a simulated body (m/s)
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct Velocity(pub Vec3);

/// Angular velocity of a simulated body (rad/s, axis * magnitude)
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct AngularVelocity(pub Vec3);

/// Marker for launched bodies
#[derive(Component)]
pub struct Projectile;

/// Seconds until the body is unconditionally despawned
#[derive(Component, Debug, Clone, Copy)]
pub struct ProjectileTtl(pub f32);

/// One launch, consumed exactly once by the launcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchRequest {
    pub position: Vec3,
    /// Unit launch direction
    pub direction: Vec3,
    pub speed: f32,
    /// World scale for the launched body
    pub scale: f32,
}

/// Queued launches for this tick, preserving machine -> launcher ordering.
/// `reuse` carries the charging proxy whose ownership transferred on
/// release; `None` means a fresh body must be spawned.
#[derive(Resource, Default)]
pub struct LaunchQueue {
    pending: Vec<(HandSide, LaunchRequest, Option<Entity>)>,
}

impl LaunchQueue {
    pub fn push(&mut self, hand: HandSide, request: LaunchRequest, reuse: Option<Entity>) {
        self.pending.push((hand, request, reuse));
    }

    pub fn drain(&mut self) -> Vec<(HandSide, LaunchRequest, Option<Entity>)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Random angular velocity with magnitude bounded by `max_speed`.
/// Direction is deliberately non-deterministic; only the bound is
/// contractual.
pub fn random_launch_spin(rng: &mut impl Rng, max_speed: f32) -> Vec3 {
    random_in_unit_sphere(rng) * max_speed
}

/// Consume queued launch requests.
/// Runs after the charge machine and proxy systems in the same tick, so
/// there is never a tick in which both the charging proxy and the final
/// projectile exist as independent entities.
pub fn launch_projectiles(
    mut commands: Commands,
    tuning: Res<Tuning>,
    mut queue: ResMut<LaunchQueue>,
    mut bus: ResMut<EventBus>,
) {
    if queue.is_empty() {
        return;
    }

    let mut rng = rand::thread_rng();

    for (hand, request, reuse) in queue.drain() {
        let velocity = Velocity(request.direction * request.speed);
        let spin = AngularVelocity(random_launch_spin(&mut rng, tuning.angular_speed_max));
        let transform = Transform::from_translation(request.position)
            .with_scale(Vec3::splat(request.scale));
        let ttl = ProjectileTtl(tuning.projectile_ttl);

        match reuse {
            Some(entity) => {
                // Repurpose the charging proxy: same entity, dynamics on
                if let Ok(mut e) = commands.get_entity(entity) {
                    e.remove::<(ChargeProxy, Kinematic)>()
                        .insert((Projectile, transform, velocity, spin, ttl));
                } else {
                    // Proxy creation failed earlier; degrade to a spawn
                    commands.spawn((Projectile, transform, velocity, spin, ttl));
                }
            }
            None => {
                commands.spawn((Projectile, transform, velocity, spin, ttl));
            }
        }

        bus.emit(ActionEvent::Launch {
            hand,
            dir: (request.direction.x, request.direction.y, request.direction.z),
            speed: request.speed,
        });
    }
}

/// Integrate projectile motion. Stand-in for the host physics engine:
/// gravity plus straight integration, nothing else.
pub fn projectile_motion(
    tuning: Res<Tuning>,
    time: Res<Time>,
    mut query: Query<
        (&mut Transform, &mut Velocity, &AngularVelocity),
        (With<Projectile>, Without<Kinematic>),
    >,
) {
    let dt = time.delta_secs();

    for (mut transform, mut velocity, spin) in &mut query {
        velocity.0.y -= tuning.projectile_gravity * dt;
        transform.translation += velocity.0 * dt;

        let angle = spin.0.length() * dt;
        if angle > 0.0 {
            transform.rotate(Quat::from_axis_angle(spin.0.normalize(), angle));
        }
    }
}

/// Count down TTLs and reclaim expired bodies.
/// This is a resource-lifetime guarantee, independent of collisions.
pub fn tick_projectile_ttl(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut ProjectileTtl)>,
) {
    let dt = time.delta_secs();

    for (entity, mut ttl) in &mut query {
        ttl.0 -= dt;
        if ttl.0 <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_spin_magnitude_bounded() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let spin = random_launch_spin(&mut rng, 2.0);
            assert!(spin.length() <= 2.0 + f32::EPSILON);
        }
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = LaunchQueue::default();
        let req = |speed| LaunchRequest {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            speed,
            scale: 0.3,
        };
        queue.push(HandSide::Left, req(1.0), None);
        queue.push(HandSide::Right, req(2.0), None);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].1.speed, 1.0);
        assert_eq!(drained[1].1.speed, 2.0);
        assert!(queue.is_empty());
    }
}
