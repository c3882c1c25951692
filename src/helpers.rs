//! Utility functions for handcast

use bevy::prelude::*;
use rand::Rng;

/// Per-tick blend factor for an exponential approach at the given rate.
/// Frame-rate adaptive: larger dt closes more of the gap.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Uniform random vector inside the unit sphere (rejection sampled).
/// Used for launch spin so every projectile tumbles differently.
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothing_factor_bounds() {
        let f = smoothing_factor(5.0, 1.0 / 90.0);
        assert!(f > 0.0 && f < 1.0);
        // Higher rate closes more of the gap per tick
        assert!(smoothing_factor(10.0, 1.0 / 90.0) > f);
    }

    #[test]
    fn test_random_in_unit_sphere_bounded() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert!(random_in_unit_sphere(&mut rng).length() <= 1.0);
        }
    }
}
