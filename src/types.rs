//! Shared constants and the simulation clock.

use bevy::prelude::*;

/// Frame rate the per-frame rates in the body table were tuned at.
///
/// Self-rotation speeds are authored as radians per rendered frame; multiplying
/// by this turns them into radians per second.
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// Render radius of the star in scene units.
pub const STAR_RADIUS: f32 = 10.0;

/// Self-rotation of the star in radians per frame at the reference rate.
pub const STAR_ROTATION_PER_FRAME: f64 = 0.001;

/// System set for the clock update (runs before anything consuming `frame_dt`).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClockSet;

/// Simulation clock resource tracking scaled time.
#[derive(Resource, Clone, Debug)]
pub struct SimulationClock {
    /// Seconds of simulated time since startup
    pub elapsed: f64,
    /// Simulated seconds handed to the animator this frame
    pub frame_dt: f64,
    /// Time scale multiplier (1.0 = real time)
    pub scale: f64,
    /// Whether simulation is paused
    pub paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            frame_dt: 0.0,
            scale: 1.0,
            paused: false,
        }
    }
}

impl SimulationClock {
    /// Scale a real frame delta into simulated seconds and record it.
    ///
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, real_delta: f64) -> f64 {
        let dt = if self.paused || !real_delta.is_finite() || real_delta < 0.0 {
            0.0
        } else {
            real_delta * self.scale
        };
        self.frame_dt = dt;
        self.elapsed += dt;
        dt
    }

    /// Reset to the start, keeping scale and pause state.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.frame_dt = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_default() {
        let clock = SimulationClock::default();
        assert!(!clock.paused);
        assert_eq!(clock.scale, 1.0);
        assert_eq!(clock.elapsed, 0.0);
    }

    #[test]
    fn test_clock_scales_delta() {
        let mut clock = SimulationClock {
            scale: 4.0,
            ..default()
        };
        assert_eq!(clock.advance(0.5), 2.0);
        assert_eq!(clock.frame_dt, 2.0);
        assert_eq!(clock.elapsed, 2.0);
    }

    #[test]
    fn test_clock_paused() {
        let mut clock = SimulationClock {
            paused: true,
            ..default()
        };
        assert_eq!(clock.advance(1.0), 0.0);
        assert_eq!(clock.elapsed, 0.0);
    }

    #[test]
    fn test_clock_ignores_bad_delta() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert_eq!(clock.elapsed, 0.0);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = SimulationClock::default();
        clock.advance(3.0);
        clock.reset();
        assert_eq!(clock.elapsed, 0.0);
        assert_eq!(clock.frame_dt, 0.0);
    }
}
