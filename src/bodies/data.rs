//! Scene configuration for every body.
//! Distances and radii are scene units, orbital rates are radians per second.

use bevy::color::Srgba;

use super::BodyId;
use crate::orbit::{OrbitError, OrbitalElements};
use crate::texture::hex;
use crate::types::{REFERENCE_FRAME_RATE, STAR_RADIUS, STAR_ROTATION_PER_FRAME};

/// Moon spin in radians per frame at the reference rate.
pub const MOON_ROTATION_PER_FRAME: f64 = 0.01;

/// Static data for a moon orbiting a planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoonConfig {
    pub name: &'static str,
    /// Orbital distance in parent radii
    pub distance_radii: f32,
    /// Render radius in scene units
    pub radius: f32,
    /// Orbital phase rate (rad/s)
    pub speed: f64,
    pub color: Srgba,
}

/// Static data for a body in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyConfig {
    pub id: BodyId,
    pub radius: f32,
    /// Semi-major axis of the orbit (0 for the star)
    pub distance: f64,
    /// Fallback / tint color
    pub color: Srgba,
    /// Self rotation in radians per frame at the reference rate
    pub rotation_per_frame: f64,
    /// Base orbital rate `n` (rad/s)
    pub orbit_speed: f64,
    pub eccentricity: f64,
    pub has_rings: bool,
    pub moons: &'static [MoonConfig],
}

impl BodyConfig {
    /// Self rotation in radians per second.
    pub fn rotation_rate(&self) -> f64 {
        self.rotation_per_frame * REFERENCE_FRAME_RATE
    }

    /// Orbital elements for the body, `None` for the star at the origin.
    pub fn elements(&self) -> Result<Option<OrbitalElements>, OrbitError> {
        if self.id.is_star() {
            return Ok(None);
        }
        OrbitalElements::new(
            self.distance,
            self.eccentricity,
            self.orbit_speed,
            self.rotation_rate(),
        )
        .map(Some)
    }

    /// Ring plane tilt about the x axis, in radians.
    pub fn ring_tilt(&self) -> f32 {
        match self.id {
            // Uranus rolls on its side
            BodyId::Uranus => -1.4,
            _ => -0.3,
        }
    }
}

const DEFAULT_MOON_COLOR: Srgba = hex(0xCCCCCC);

const EARTH_MOONS: &[MoonConfig] = &[MoonConfig {
    name: "Moon",
    distance_radii: 2.5,
    radius: 2.6 * 0.27,
    speed: 1.0,
    color: hex(0xDDDDDD),
}];

const JUPITER_MOONS: &[MoonConfig] = &[
    MoonConfig {
        name: "Io",
        distance_radii: 1.8,
        radius: 0.5,
        speed: 2.0,
        color: DEFAULT_MOON_COLOR,
    },
    MoonConfig {
        name: "Europa",
        distance_radii: 2.5,
        radius: 0.4,
        speed: 1.5,
        color: DEFAULT_MOON_COLOR,
    },
    MoonConfig {
        name: "Ganymede",
        distance_radii: 3.2,
        radius: 0.6,
        speed: 1.0,
        color: DEFAULT_MOON_COLOR,
    },
    MoonConfig {
        name: "Callisto",
        distance_radii: 4.0,
        radius: 0.45,
        speed: 0.8,
        color: DEFAULT_MOON_COLOR,
    },
];

const SATURN_MOONS: &[MoonConfig] = &[
    MoonConfig {
        name: "Enceladus",
        distance_radii: 3.0,
        radius: 0.4,
        speed: 1.2,
        color: DEFAULT_MOON_COLOR,
    },
    MoonConfig {
        name: "Titan",
        distance_radii: 4.0,
        radius: 0.3,
        speed: 0.9,
        color: DEFAULT_MOON_COLOR,
    },
];

/// Get configuration for a body.
pub fn body_config(id: BodyId) -> BodyConfig {
    match id {
        BodyId::Sun => BodyConfig {
            id,
            radius: STAR_RADIUS,
            distance: 0.0,
            color: hex(0xFDB813),
            rotation_per_frame: STAR_ROTATION_PER_FRAME,
            orbit_speed: 0.0,
            eccentricity: 0.0,
            has_rings: false,
            moons: &[],
        },
        BodyId::Mercury => BodyConfig {
            id,
            radius: 1.5,
            distance: 20.0,
            color: hex(0x8C7853),
            rotation_per_frame: 0.01,
            orbit_speed: 0.47,
            eccentricity: 0.206,
            has_rings: false,
            moons: &[],
        },
        BodyId::Venus => BodyConfig {
            id,
            radius: 2.5,
            distance: 30.0,
            color: hex(0xFFC649),
            rotation_per_frame: 0.008,
            orbit_speed: 0.35,
            eccentricity: 0.007,
            has_rings: false,
            moons: &[],
        },
        BodyId::Earth => BodyConfig {
            id,
            radius: 2.6,
            distance: 40.0,
            color: hex(0x4A90E2),
            rotation_per_frame: 0.01,
            orbit_speed: 0.29,
            eccentricity: 0.017,
            has_rings: false,
            moons: EARTH_MOONS,
        },
        BodyId::Mars => BodyConfig {
            id,
            radius: 2.0,
            distance: 50.0,
            color: hex(0xCD5C5C),
            rotation_per_frame: 0.009,
            orbit_speed: 0.24,
            eccentricity: 0.093,
            has_rings: false,
            moons: &[],
        },
        BodyId::Jupiter => BodyConfig {
            id,
            radius: 6.0,
            distance: 70.0,
            color: hex(0xC88B3A),
            rotation_per_frame: 0.02,
            orbit_speed: 0.13,
            eccentricity: 0.049,
            has_rings: false,
            moons: JUPITER_MOONS,
        },
        BodyId::Saturn => BodyConfig {
            id,
            radius: 5.0,
            distance: 90.0,
            color: hex(0xFAD5A5),
            rotation_per_frame: 0.018,
            orbit_speed: 0.09,
            eccentricity: 0.052,
            has_rings: true,
            moons: SATURN_MOONS,
        },
        BodyId::Uranus => BodyConfig {
            id,
            radius: 4.0,
            distance: 110.0,
            color: hex(0x4FD0E7),
            rotation_per_frame: 0.015,
            orbit_speed: 0.06,
            eccentricity: 0.047,
            has_rings: true,
            moons: &[],
        },
        BodyId::Neptune => BodyConfig {
            id,
            radius: 3.9,
            distance: 130.0,
            color: hex(0x4B70DD),
            rotation_per_frame: 0.016,
            orbit_speed: 0.05,
            eccentricity: 0.009,
            has_rings: true,
            moons: &[],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_planets_have_valid_elements() {
        for &id in BodyId::PLANETS {
            let el = body_config(id).elements().unwrap();
            let el = el.expect("planets orbit the star");
            assert!(el.eccentricity() < 0.21, "{id} is too eccentric");
        }
    }

    #[test]
    fn test_star_has_no_orbit() {
        assert!(body_config(BodyId::Sun).elements().unwrap().is_none());
    }

    #[test]
    fn test_distances_increase_outward() {
        let distances: Vec<f64> = BodyId::PLANETS
            .iter()
            .map(|&id| body_config(id).distance)
            .collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rotation_rate_per_second() {
        let earth = body_config(BodyId::Earth);
        assert_relative_eq!(earth.rotation_rate(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_ringed_bodies() {
        let ringed: Vec<BodyId> = BodyId::ALL
            .iter()
            .copied()
            .filter(|&id| body_config(id).has_rings)
            .collect();
        assert_eq!(ringed, vec![BodyId::Saturn, BodyId::Uranus, BodyId::Neptune]);
    }

    #[test]
    fn test_moon_counts() {
        assert_eq!(body_config(BodyId::Earth).moons.len(), 1);
        assert_eq!(body_config(BodyId::Jupiter).moons.len(), 4);
        assert_eq!(body_config(BodyId::Saturn).moons.len(), 2);
        assert!(body_config(BodyId::Mars).moons.is_empty());
    }
}
