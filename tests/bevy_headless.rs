//! Headless Bevy integration tests.
//!
//! These tests verify the clock and animator plugins work without a GPU.

mod common;

use bevy::prelude::*;
use orrery::animator::{AnimatorPlugin, BodyAnimator};
use orrery::bodies::BodyId;
use orrery::time::ClockPlugin;
use orrery::types::SimulationClock;
use std::time::Duration;

fn animated_app(seed: u64) -> App {
    let mut app = common::headless_app(Duration::from_millis(100));
    app.add_plugins((ClockPlugin, AnimatorPlugin { seed: Some(seed) }));
    app
}

#[test]
fn test_plugin_inserts_animator() {
    let mut app = animated_app(1);
    app.update();
    let animator = app.world().resource::<BodyAnimator>();
    assert_eq!(animator.entries().len(), BodyId::ALL.len());
}

#[test]
fn test_animator_ticks_every_update() {
    let mut app = animated_app(2);
    let start = app
        .world()
        .resource::<BodyAnimator>()
        .entry(BodyId::Mercury)
        .unwrap()
        .translation();

    for _ in 0..10 {
        app.update();
    }

    let animator = app.world().resource::<BodyAnimator>();
    assert_eq!(animator.ticks(), 10);
    assert!(animator.star_time() > 0.0);
    let clock = app.world().resource::<SimulationClock>();
    assert!((animator.star_time() - clock.elapsed).abs() < 1e-9);
    let now = animator.entry(BodyId::Mercury).unwrap().translation();
    assert!(now.distance(start) > 0.0);
}

#[test]
fn test_paused_clock_freezes_bodies() {
    let mut app = animated_app(3);
    app.world_mut().resource_mut::<SimulationClock>().paused = true;
    let before = app.world().resource::<BodyAnimator>().entries().to_vec();

    for _ in 0..5 {
        app.update();
    }

    let animator = app.world().resource::<BodyAnimator>();
    assert_eq!(animator.entries(), &before[..]);
    assert_eq!(animator.star_time(), 0.0);
}

#[test]
fn test_preinserted_animator_is_kept() {
    let mut app = common::headless_app(Duration::from_millis(50));
    let animator = BodyAnimator::from_catalog(Some(40)).unwrap();
    let expected = animator.entries().to_vec();
    app.insert_resource(animator);
    app.add_plugins((ClockPlugin, AnimatorPlugin { seed: Some(41) }));

    assert_eq!(app.world().resource::<BodyAnimator>().entries(), &expected[..]);
}
