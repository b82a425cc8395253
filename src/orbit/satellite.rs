//! Circular satellite orbits around a parent body.
//!
//! Moons are decorative: they circle their planet at a fixed distance with a
//! small vertical wobble and never feed back into the planet's motion.

use bevy::math::Vec3;

use super::kepler::wrap_angle;

/// Vertical wobble as a fraction of the orbital distance.
pub const SATELLITE_TILT: f32 = 0.2;

/// Fixed parameters of a moon's orbit, relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SatelliteOrbit {
    /// Distance from the parent's center in scene units
    pub distance: f32,
    /// Angular speed in radians per second
    pub speed: f64,
}

impl SatelliteOrbit {
    pub fn new(distance: f32, speed: f64) -> Self {
        Self { distance, speed }
    }

    /// Offset from the parent for a phase angle.
    pub fn offset(&self, angle: f64) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        let d = self.distance;
        Vec3::new(
            cos as f32 * d,
            sin as f32 * d * SATELLITE_TILT,
            sin as f32 * d,
        )
    }

    /// Advance a phase angle by `dt` seconds, wrapped into [0, 2π).
    pub fn advance(&self, angle: f64, dt: f64) -> f64 {
        wrap_angle(angle + self.speed * dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_offset_at_zero_phase() {
        let orbit = SatelliteOrbit::new(6.5, 1.0);
        let o = orbit.offset(0.0);
        assert_relative_eq!(o.x, 6.5, epsilon = 1e-6);
        assert_relative_eq!(o.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(o.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_offset_tilt_at_quarter_turn() {
        let orbit = SatelliteOrbit::new(10.0, 1.0);
        let o = orbit.offset(FRAC_PI_2);
        assert_relative_eq!(o.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(o.z, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_advance_wraps() {
        let orbit = SatelliteOrbit::new(10.0, 2.0);
        let a = orbit.advance(6.0, 1.0);
        assert_relative_eq!(a, 8.0 - TAU, epsilon = 1e-12);
    }
}
