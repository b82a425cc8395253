//! Long-run behavior of the orbit solver.

mod common;

use approx::assert_relative_eq;
use orrery::orbit::{OrbitalState, tick};
use std::f64::consts::TAU;

#[test]
fn test_thousand_unit_steps_stay_wrapped() {
    let elements = common::earth_like();
    let mut state = OrbitalState::at(0.0);
    for step in 0..1000 {
        let (next, position) = tick(&elements, state, 1.0);
        assert!(
            (0.0..TAU).contains(&next.mean_anomaly),
            "step {step}: M = {}",
            next.mean_anomaly
        );
        assert!(position.is_finite(), "step {step}: {position:?}");
        assert!(position.r >= elements.periapsis_distance() - 1e-9);
        assert!(position.r <= elements.apoapsis_distance() + 1e-9);
        state = next;
    }
}

#[test]
fn test_one_period_returns_near_start() {
    let elements = common::earth_like();
    let start = OrbitalState::at(1.0);
    let steps = 10_000;
    let dt = elements.period() / steps as f64;

    let mut state = start;
    for _ in 0..steps {
        state = elements.advance(state, dt);
    }

    // Speed varies with radius, so one nominal period is only approximately a lap
    let diff = (state.mean_anomaly - start.mean_anomaly).abs();
    let diff = diff.min(TAU - diff);
    assert!(diff < 0.1, "drift {diff}");
}

#[test]
fn test_circular_orbit_keeps_radius() {
    let elements = orrery::orbit::OrbitalElements::new(20.0, 0.0, 0.4, 0.0).unwrap();
    let mut state = OrbitalState::init(Some(3));
    for _ in 0..500 {
        let (next, position) = tick(&elements, state, 0.25);
        assert_relative_eq!(position.r, 20.0, epsilon = 1e-9);
        assert_relative_eq!(position.as_dvec3().length(), 20.0, epsilon = 1e-9);
        state = next;
    }
}
