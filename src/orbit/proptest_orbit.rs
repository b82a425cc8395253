//! Property-based tests for the orbit solver using proptest.
//!
//! These tests verify that orbital computations maintain expected properties
//! across a wide range of inputs.

use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

use super::kepler::{OrbitalElements, OrbitalState};

/// Smallest absolute distance between two angles (radians), in [0, π].
fn angle_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI { TAU - d } else { d }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Radius always lies between periapsis and apoapsis.
    #[test]
    fn prop_radius_within_apsides(
        a in 0.1f64..500.0,
        e in 0.0f64..0.95,
        m in 0.0f64..TAU,
    ) {
        let el = OrbitalElements::new(a, e, 1.0, 0.0).unwrap();
        let p = el.position(m);

        let tol = 1e-9 * a;
        prop_assert!(
            p.r >= a * (1.0 - e) - tol && p.r <= a * (1.0 + e) + tol,
            "r={} outside [{}, {}] for a={}, e={}, M={}",
            p.r, a * (1.0 - e), a * (1.0 + e), a, e, m
        );
        prop_assert_eq!(p.y, 0.0);
    }

    /// Ten Newton steps satisfy Kepler's equation for the configured eccentricity range.
    #[test]
    fn prop_kepler_solver_residual(
        e in 0.0f64..0.21,
        m in 0.0f64..TAU,
    ) {
        let el = OrbitalElements::new(10.0, e, 1.0, 0.0).unwrap();
        let e_anom = el.solve_eccentric_anomaly(m);
        let residual = (e_anom - e * e_anom.sin() - m).abs();
        prop_assert!(residual < 1e-12, "residual {} for e={}, M={}", residual, e, m);
    }

    /// Mean anomaly stays wrapped and finite under arbitrary non-negative steps.
    #[test]
    fn prop_advance_stays_wrapped(
        e in 0.0f64..0.21,
        n in 0.001f64..5.0,
        m0 in 0.0f64..TAU,
        dt in 0.0f64..1000.0,
    ) {
        let el = OrbitalElements::new(40.0, e, n, 0.0).unwrap();
        let s = el.advance(OrbitalState::at(m0), dt);
        prop_assert!(s.mean_anomaly.is_finite());
        prop_assert!((0.0..TAU).contains(&s.mean_anomaly));
    }

    /// One nominal period of small steps brings a near-circular orbit back to its start.
    #[test]
    fn prop_period_returns_to_start(
        e in 0.0f64..0.05,
        n in 0.05f64..1.0,
        m0 in 0.0f64..TAU,
    ) {
        let el = OrbitalElements::new(40.0, e, n, 0.0).unwrap();
        let steps = 2000;
        let dt = el.period() / steps as f64;

        let mut s = OrbitalState::at(m0);
        for _ in 0..steps {
            s = el.advance(s, dt);
        }

        let drift = angle_distance(s.mean_anomaly, m0);
        prop_assert!(drift < 0.02, "drift {} after one period (e={}, n={})", drift, e, n);
    }

    /// Position changes smoothly for small steps.
    #[test]
    fn prop_position_continuity(
        e in 0.0f64..0.21,
        m in 0.0f64..TAU,
    ) {
        let el = OrbitalElements::new(40.0, e, 0.29, 0.0).unwrap();
        let p1 = el.position(m).as_dvec3();
        let p2 = el.position(m + 1e-3).as_dvec3();
        // Arc length for dM = 1e-3 is bounded by a·(1+e)·dν and dν/dM ≤ (1+e)/(1-e)²
        let bound = 40.0 * 2.0 * 1e-3 * (1.0 + e) / (1.0 - e).powi(2);
        prop_assert!((p2 - p1).length() < bound);
    }
}
