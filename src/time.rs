//! Time advancement system for the scene.
//!
//! Handles progression of simulated time based on scale and pause state.

use bevy::prelude::*;

use crate::types::{ClockSet, SimulationClock};

/// Plugin providing clock advancement.
pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>()
            .add_systems(Update, advance_clock.in_set(ClockSet));
    }
}

/// Advance simulated time from the real frame delta.
///
/// `scale` is how many simulated seconds pass per real second.
fn advance_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.advance(time.delta_secs_f64());
}
