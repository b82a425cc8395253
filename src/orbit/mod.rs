//! Orbit solver for the bodies of the scene.
//!
//! Every planet follows a fixed Keplerian ellipse with the star at the focus.
//! Bodies never perturb each other: each one is advanced independently from
//! its own elements and mean anomaly.
//!
//! Coordinate frame:
//! - Orbital plane is the XZ plane (y = 0), star at the origin.
//! - Periapsis lies on +x.

pub mod kepler;
pub mod satellite;

#[cfg(test)]
mod proptest_orbit;

pub use kepler::{
    KEPLER_ITERATIONS, OrbitError, OrbitalElements, OrbitalPosition, OrbitalState, tick,
    wrap_angle,
};
pub use satellite::SatelliteOrbit;
