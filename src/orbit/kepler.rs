//! Kepler orbit solver using a fixed-count Newton iteration for the Kepler equation.

use std::f64::consts::TAU;

use bevy::math::{DVec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of Newton steps taken when solving Kepler's equation.
///
/// There is no convergence check: ten steps from `E₀ = M` are plenty for the
/// eccentricities in the body table (e < 0.21) and a fixed count keeps the
/// solver's output reproducible.
pub const KEPLER_ITERATIONS: usize = 10;

/// Errors raised while constructing orbital elements.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("semi-major axis must be positive and finite, got {0}")]
    InvalidSemiMajorAxis(f64),

    #[error("eccentricity must lie in [0, 1), got {0}")]
    InvalidEccentricity(f64),

    #[error("{name} must be finite, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
}

/// Fixed orbital parameters of one body.
///
/// Angular rates are in radians per simulated second, distances in scene units.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis
    semi_major_axis: f64,
    /// Eccentricity (0 ≤ e < 1)
    eccentricity: f64,
    /// Semi-minor axis, `a·sqrt(1 - e²)`
    semi_minor_axis: f64,
    /// Distance from the ellipse center to the focus, `a·e`
    focal_distance: f64,
    /// Base angular rate `n` in radians per second
    mean_motion: f64,
    /// Spin about the body's own axis in radians per second
    rotation_rate: f64,
}

impl OrbitalElements {
    /// Create orbital elements, rejecting anything that is not a closed ellipse.
    ///
    /// # Arguments
    /// * `semi_major_axis` - `a`, must be > 0
    /// * `eccentricity` - `e`, must be in [0, 1)
    /// * `mean_motion` - base angular rate `n` (rad/s)
    /// * `rotation_rate` - self rotation (rad/s)
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        mean_motion: f64,
        rotation_rate: f64,
    ) -> Result<Self, OrbitError> {
        if !semi_major_axis.is_finite() || semi_major_axis <= 0.0 {
            return Err(OrbitError::InvalidSemiMajorAxis(semi_major_axis));
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(OrbitError::InvalidEccentricity(eccentricity));
        }
        if !mean_motion.is_finite() {
            return Err(OrbitError::InvalidRate {
                name: "mean motion",
                value: mean_motion,
            });
        }
        if !rotation_rate.is_finite() {
            return Err(OrbitError::InvalidRate {
                name: "rotation rate",
                value: rotation_rate,
            });
        }

        Ok(Self {
            semi_major_axis,
            eccentricity,
            semi_minor_axis: semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt(),
            focal_distance: semi_major_axis * eccentricity,
            mean_motion,
            rotation_rate,
        })
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    pub fn focal_distance(&self) -> f64 {
        self.focal_distance
    }

    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    pub fn rotation_rate(&self) -> f64 {
        self.rotation_rate
    }

    /// Nominal orbital period `2π/n`, ignoring the radius-dependent speed scaling.
    pub fn period(&self) -> f64 {
        TAU / self.mean_motion
    }

    /// Closest distance to the focus, `a(1 - e)`.
    pub fn periapsis_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Farthest distance from the focus, `a(1 + e)`.
    pub fn apoapsis_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Solve Kepler's equation M = E - e*sin(E) for eccentric anomaly E.
    ///
    /// Newton's method seeded with `E₀ = M`, run for exactly
    /// [`KEPLER_ITERATIONS`] steps.
    pub fn solve_eccentric_anomaly(&self, mean_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let mut e_anomaly = mean_anomaly;

        for _ in 0..KEPLER_ITERATIONS {
            // f(E) = E - e*sin(E) - M
            let f = e_anomaly - e * e_anomaly.sin() - mean_anomaly;
            // f'(E) = 1 - e*cos(E)
            let f_prime = 1.0 - e * e_anomaly.cos();
            e_anomaly -= f / f_prime;
        }

        e_anomaly
    }

    /// Compute true anomaly from eccentric anomaly.
    ///
    /// Formula: ν = 2 * atan2(sqrt(1+e) * sin(E/2), sqrt(1-e) * cos(E/2))
    pub fn eccentric_to_true_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let half_e = eccentric_anomaly / 2.0;

        let y = (1.0 + e).sqrt() * half_e.sin();
        let x = (1.0 - e).sqrt() * half_e.cos();
        2.0 * y.atan2(x)
    }

    /// Distance from the focus for a given eccentric anomaly.
    pub fn radius(&self, eccentric_anomaly: f64) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * eccentric_anomaly.cos())
    }

    /// Point on the orbit curve for a true anomaly.
    ///
    /// The center is shifted by the focal distance so the focus (the star)
    /// sits at the origin. Bodies and orbit paths both go through here.
    #[inline]
    pub fn path_point(&self, true_anomaly: f64) -> DVec3 {
        DVec3::new(
            self.semi_major_axis * true_anomaly.cos() - self.focal_distance,
            0.0,
            self.semi_minor_axis * true_anomaly.sin(),
        )
    }

    /// Closed polyline of the orbit, `segments + 1` points with the last equal to the first.
    pub fn path_points(&self, segments: u32) -> Vec<Vec3> {
        let segments = segments.max(3);
        (0..=segments)
            .map(|i| {
                let nu = (i as f64 / segments as f64) * TAU;
                self.path_point(nu).as_vec3()
            })
            .collect()
    }

    /// Position and orbital radius for a mean anomaly.
    pub fn position(&self, mean_anomaly: f64) -> OrbitalPosition {
        let e_anomaly = self.solve_eccentric_anomaly(mean_anomaly);
        let true_anomaly = self.eccentric_to_true_anomaly(e_anomaly);
        let p = self.path_point(true_anomaly);

        OrbitalPosition {
            x: p.x,
            y: p.y,
            z: p.z,
            r: self.radius(e_anomaly),
        }
    }

    /// Instantaneous angular rate at mean anomaly M: `n·(a/r)^1.5`.
    ///
    /// Faster near periapsis, slower near apoapsis. This is not exact
    /// areal-velocity conservation and is kept as-is.
    pub fn angular_velocity(&self, mean_anomaly: f64) -> f64 {
        let r = self.radius(self.solve_eccentric_anomaly(mean_anomaly));
        self.mean_motion * (self.semi_major_axis / r).powf(1.5)
    }

    /// Advance the mean anomaly by `dt` seconds, wrapped into [0, 2π).
    pub fn advance(&self, state: OrbitalState, dt: f64) -> OrbitalState {
        let omega = self.angular_velocity(state.mean_anomaly);
        OrbitalState {
            mean_anomaly: wrap_angle(state.mean_anomaly + omega * dt),
        }
    }
}

/// Wrap an angle into [0, 2π).
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Mutable orbital progress of one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalState {
    /// Mean anomaly in [0, 2π)
    pub mean_anomaly: f64,
}

impl OrbitalState {
    /// State at a given mean anomaly, wrapped into [0, 2π).
    pub fn at(mean_anomaly: f64) -> Self {
        Self {
            mean_anomaly: wrap_angle(mean_anomaly),
        }
    }

    /// Initial state with a pseudo-random phase.
    ///
    /// A seed gives a reproducible phase; `None` draws one from the thread RNG.
    pub fn init(seed: Option<u64>) -> Self {
        let phase = match seed {
            Some(seed) => StdRng::seed_from_u64(seed).gen_range(0.0..TAU),
            None => rand::thread_rng().gen_range(0.0..TAU),
        };
        Self::at(phase)
    }
}

/// Position in the orbital plane (y = 0) plus the distance from the focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: f64,
}

impl OrbitalPosition {
    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn as_vec3(&self) -> Vec3 {
        self.as_dvec3().as_vec3()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.r.is_finite()
    }
}

/// Advance then locate: one simulated step for one body.
pub fn tick(
    elements: &OrbitalElements,
    state: OrbitalState,
    dt_seconds: f64,
) -> (OrbitalState, OrbitalPosition) {
    let next = elements.advance(state, dt_seconds);
    let position = elements.position(next.mean_anomaly);
    (next, position)
}
