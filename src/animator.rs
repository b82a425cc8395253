//! Per-tick orchestration of every body's motion.
//!
//! The animator owns the mutable state of each body (mean anomaly, spin,
//! moon phases) and the star's time accumulator. Nothing else mutates them.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use crate::bodies::{BodyId, MOON_ROTATION_PER_FRAME, body_config};
use crate::orbit::{
    OrbitError, OrbitalElements, OrbitalPosition, OrbitalState, SatelliteOrbit, tick, wrap_angle,
};
use crate::texture::StarField;
use crate::types::{ClockSet, REFERENCE_FRAME_RATE, SimulationClock};

/// System set for the animator update (after the clock, before scene sync).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimatorSet;

/// A moon's phase around its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoonEntry {
    pub orbit: SatelliteOrbit,
    pub angle: f64,
    /// Self rotation angle
    pub spin: f64,
}

impl MoonEntry {
    /// Offset from the parent's center.
    pub fn offset(&self) -> Vec3 {
        self.orbit.offset(self.angle)
    }
}

/// Everything that changes about one body between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyEntry {
    pub id: BodyId,
    /// `None` for the star, which stays at the origin
    pub elements: Option<OrbitalElements>,
    pub state: OrbitalState,
    pub position: OrbitalPosition,
    /// Self rotation angle in [0, 2π)
    pub rotation: f64,
    pub rotation_rate: f64,
    pub moons: Vec<MoonEntry>,
}

const ORIGIN: OrbitalPosition = OrbitalPosition {
    x: 0.0,
    y: 0.0,
    z: 0.0,
    r: 0.0,
};

impl BodyEntry {
    fn advance(&mut self, dt: f64) {
        if let Some(elements) = &self.elements {
            let (state, position) = tick(elements, self.state, dt);
            self.state = state;
            self.position = position;
        }
        self.rotation = wrap_angle(self.rotation + self.rotation_rate * dt);
        let moon_spin = MOON_ROTATION_PER_FRAME * REFERENCE_FRAME_RATE;
        for moon in &mut self.moons {
            moon.angle = moon.orbit.advance(moon.angle, dt);
            moon.spin = wrap_angle(moon.spin + moon_spin * dt);
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.position.as_vec3()
    }
}

/// Owner of every body's orbital state and of the star clock.
#[derive(Resource, Clone, Debug)]
pub struct BodyAnimator {
    entries: Vec<BodyEntry>,
    star_time: f64,
    ticks: u64,
}

impl BodyAnimator {
    /// Build from the static body table.
    ///
    /// With a seed every phase is reproducible; without one phases are random.
    pub fn from_catalog(seed: Option<u64>) -> Result<Self, OrbitError> {
        let mut entries = Vec::with_capacity(BodyId::ALL.len());
        for &id in BodyId::ALL {
            let config = body_config(id);
            let elements = config.elements()?;
            let body_seed = seed.map(|s| s ^ id.salt());
            let state = OrbitalState::init(body_seed);
            let position = elements
                .as_ref()
                .map(|el| el.position(state.mean_anomaly))
                .unwrap_or(ORIGIN);

            let mut phase_rng = match body_seed {
                Some(s) => StdRng::seed_from_u64(s.rotate_left(17)),
                None => StdRng::from_entropy(),
            };
            let moons = config
                .moons
                .iter()
                .map(|m| MoonEntry {
                    orbit: SatelliteOrbit::new(m.distance_radii * config.radius, m.speed),
                    angle: phase_rng.gen_range(0.0..TAU),
                    spin: 0.0,
                })
                .collect();

            entries.push(BodyEntry {
                id,
                elements,
                state,
                position,
                rotation: 0.0,
                rotation_rate: config.rotation_rate(),
                moons,
            });
        }
        info!("Animator tracking {} bodies", entries.len());
        Ok(Self {
            entries,
            star_time: 0.0,
            ticks: 0,
        })
    }

    /// Advance every body by `dt` seconds and return the updated entries.
    ///
    /// Negative or non-finite steps are treated as zero.
    pub fn tick(&mut self, dt: f64) -> &[BodyEntry] {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("Rejected animator step dt={}; treating as 0", dt);
            0.0
        };
        for entry in &mut self.entries {
            entry.advance(dt);
        }
        self.star_time += dt;
        self.ticks += 1;
        &self.entries
    }

    pub fn entries(&self) -> &[BodyEntry] {
        &self.entries
    }

    pub fn entry(&self, id: BodyId) -> Option<&BodyEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Seconds of animated time seen by the star.
    pub fn star_time(&self) -> f64 {
        self.star_time
    }

    pub fn star_field(&self) -> StarField {
        StarField::at(self.star_time)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Plugin advancing the animator from the simulation clock.
#[derive(Default)]
pub struct AnimatorPlugin {
    /// Seed used when no [`BodyAnimator`] has been inserted yet
    pub seed: Option<u64>,
}

impl Plugin for AnimatorPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<BodyAnimator>() {
            match BodyAnimator::from_catalog(self.seed) {
                Ok(animator) => {
                    app.insert_resource(animator);
                }
                Err(err) => error!("Body table rejected: {}", err),
            }
        }
        app.configure_sets(Update, AnimatorSet.after(ClockSet))
            .add_systems(Update, advance_bodies.in_set(AnimatorSet));
    }
}

fn advance_bodies(clock: Res<SimulationClock>, animator: Option<ResMut<BodyAnimator>>) {
    if let Some(mut animator) = animator {
        animator.tick(clock.frame_dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_every_body() {
        let animator = BodyAnimator::from_catalog(Some(1)).unwrap();
        assert_eq!(animator.entries().len(), BodyId::ALL.len());
        let sun = animator.entry(BodyId::Sun).unwrap();
        assert!(sun.elements.is_none());
        assert_eq!(sun.translation(), Vec3::ZERO);
        assert_eq!(animator.entry(BodyId::Jupiter).unwrap().moons.len(), 4);
    }

    #[test]
    fn test_seeded_catalog_is_reproducible() {
        let a = BodyAnimator::from_catalog(Some(99)).unwrap();
        let b = BodyAnimator::from_catalog(Some(99)).unwrap();
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_tick_moves_planets_not_star() {
        let mut animator = BodyAnimator::from_catalog(Some(5)).unwrap();
        let before = animator.entry(BodyId::Earth).unwrap().translation();
        animator.tick(1.0);
        let earth = animator.entry(BodyId::Earth).unwrap();
        assert!(earth.translation().distance(before) > 0.1);
        assert_eq!(animator.entry(BodyId::Sun).unwrap().translation(), Vec3::ZERO);
        assert_eq!(animator.star_time(), 1.0);
    }

    #[test]
    fn test_negative_dt_rejected() {
        let mut animator = BodyAnimator::from_catalog(Some(5)).unwrap();
        let before = animator.entries().to_vec();
        animator.tick(-3.0);
        animator.tick(f64::NAN);
        assert_eq!(animator.entries(), &before[..]);
        assert_eq!(animator.star_time(), 0.0);
        assert_eq!(animator.ticks(), 2);
    }

    #[test]
    fn test_moons_follow_wobble() {
        let mut animator = BodyAnimator::from_catalog(Some(8)).unwrap();
        for _ in 0..50 {
            animator.tick(0.1);
        }
        let earth = animator.entry(BodyId::Earth).unwrap();
        let moon = earth.moons[0];
        let o = moon.offset();
        assert!((o.y - 0.2 * o.z).abs() < 1e-4);
        assert!((0.0..TAU).contains(&moon.angle));
    }

    #[test]
    fn test_rotation_wraps() {
        let mut animator = BodyAnimator::from_catalog(Some(2)).unwrap();
        for _ in 0..1000 {
            animator.tick(0.5);
        }
        for entry in animator.entries() {
            assert!((0.0..TAU).contains(&entry.rotation));
            assert!((0.0..TAU).contains(&entry.state.mean_anomaly));
        }
    }
}
