//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use orrery::orbit::OrbitalElements;
use orrery::texture::TextureSettings;
use std::time::Duration;

/// Small rasters so full-catalog synthesis stays quick.
pub fn small_settings(seed: u64) -> TextureSettings {
    TextureSettings {
        width: 128,
        height: 64,
        seed,
    }
}

/// Earth-like orbit from the body table.
pub fn earth_like() -> OrbitalElements {
    OrbitalElements::new(40.0, 0.017, 0.29, 0.6).expect("valid elements")
}

/// Headless app whose clock advances by a fixed step every update.
pub fn headless_app(step: Duration) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));
    app
}
