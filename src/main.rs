//! Orrery - animated solar system
//!
//! Opens a window on the nine bodies circling the star.

use bevy::prelude::*;

use orrery::animator::{AnimatorPlugin, BodyAnimator};
use orrery::scene::ScenePlugin;
use orrery::texture::{AppearanceCache, TextureSettings};
use orrery::time::ClockPlugin;

fn main() {
    let animator = match BodyAnimator::from_catalog(None) {
        Ok(animator) => animator,
        Err(err) => {
            eprintln!("orrery: body table rejected: {err}");
            return;
        }
    };

    App::new()
        .add_plugins(DefaultPlugins)
        // Insert resources before plugins that depend on them
        .insert_resource(animator)
        .insert_resource(AppearanceCache::new(TextureSettings::default()))
        .add_plugins((ClockPlugin, AnimatorPlugin::default(), ScenePlugin))
        .run();
}
