//! Transient visual proxy - the growing placeholder shown while charging
//!
//! The proxy is a separately spawned entity owned by exactly one
//! `ChargeAction`. It eases toward the live anchor and toward the
//! charge-proportional scale instead of snapping, so it visibly trails
//! the hand, and spins slowly for feedback. Dynamics stay disabled (the
//! `Kinematic` marker) until launch repurposes it into the projectile.

use bevy::prelude::*;

use crate::helpers::smoothing_factor;
use crate::tuning::Tuning;

/// Dynamics disabled: no gravity, no integration.
/// Removed when the body goes live as a projectile.
#[derive(Component)]
pub struct Kinematic;

/// The charging placeholder entity
#[derive(Component, Debug, Default)]
pub struct ChargeProxy {
    /// Live anchor the proxy eases toward, refreshed by the machine
    pub target_pos: Vec3,
    /// Charge-proportional scale the proxy eases toward
    pub target_scale: f32,
}

/// Deferred despawn timer, inserted on cancel for the fade-out window
#[derive(Component, Debug)]
pub struct ProxyFade(pub f32);

/// Ease each proxy toward its target position and scale, and apply the
/// cosmetic spin. Runs after the charge machine so targets are fresh.
pub fn update_charge_proxies(
    tuning: Res<Tuning>,
    time: Res<Time>,
    mut query: Query<(&mut Transform, &ChargeProxy), Without<ProxyFade>>,
) {
    let dt = time.delta_secs();
    let follow = smoothing_factor(tuning.follow_smoothing, dt);
    let grow = smoothing_factor(tuning.scale_smoothing, dt);

    for (mut transform, proxy) in &mut query {
        transform.translation = transform.translation.lerp(proxy.target_pos, follow);
        transform.scale = transform
            .scale
            .lerp(Vec3::splat(proxy.target_scale), grow);
        transform.rotate_y(tuning.proxy_spin_rate.to_radians() * dt);
    }
}

/// Count down fade timers and despawn finished proxies.
/// A zero-delay fade despawns on its first tick.
pub fn fade_out_proxies(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut ProxyFade)>,
) {
    let dt = time.delta_secs();

    for (entity, mut fade) in &mut query {
        fade.0 -= dt;
        if fade.0 <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_defaults_to_zero_scale_target() {
        let proxy = ChargeProxy::default();
        assert_eq!(proxy.target_scale, 0.0);
        assert_eq!(proxy.target_pos, Vec3::ZERO);
    }

    #[test]
    fn test_easing_closes_most_of_gap_in_five_ticks() {
        // Default follow smoothing at 90fps should close most of the
        // distance to the anchor within ~5 ticks
        let tuning = Tuning::default();
        let dt = 1.0 / 90.0;
        let mut pos = 0.0_f32;
        let target = 1.0_f32;
        for _ in 0..5 {
            pos += (target - pos) * smoothing_factor(tuning.follow_smoothing, dt);
        }
        assert!(pos > 0.4, "closed only {pos} of the gap");
    }
}
