//! Orbit path rendering using Bevy Gizmos.
//!
//! Each planet's ellipse is traced from its orbital elements with the star at
//! the focus, so a planet always lies on its own path.

use bevy::prelude::*;

use crate::animator::BodyAnimator;
use crate::bodies::body_config;

/// Plugin providing orbit path visualization.
pub struct OrbitPathPlugin;

impl Plugin for OrbitPathPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitPathSettings>();
    }
}

/// Settings for orbit path rendering.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct OrbitPathSettings {
    /// Whether to show orbit paths.
    pub visible: bool,
    /// Number of segments for drawing the ellipse (higher = smoother).
    pub segments: u32,
    /// Alpha value for orbit path color.
    pub alpha: f32,
    /// Dash pattern: draw N segments, then skip M segments, repeating.
    ///
    /// Set to (1, 0) for a solid line.
    pub dash_on: u32,
    pub dash_off: u32,
}

impl Default for OrbitPathSettings {
    fn default() -> Self {
        Self {
            visible: true,
            segments: 256,
            alpha: 0.3,
            dash_on: 1,
            dash_off: 0,
        }
    }
}

/// Whether segment `index` is drawn under an on/off dash pattern.
fn dash_visible(index: u32, on: u32, off: u32) -> bool {
    let on = on.max(1);
    index % (on + off) < on
}

/// Draw every planet's orbit as a closed polyline.
pub fn draw_orbit_paths(
    mut gizmos: Gizmos,
    settings: Res<OrbitPathSettings>,
    animator: Option<Res<BodyAnimator>>,
) {
    if !settings.visible {
        return;
    }
    let Some(animator) = animator else {
        return;
    };

    for entry in animator.entries() {
        let Some(elements) = &entry.elements else {
            continue;
        };
        let color = Color::from(body_config(entry.id).color.with_alpha(settings.alpha));
        let points = elements.path_points(settings.segments);

        if settings.dash_off == 0 {
            gizmos.linestrip(points, color);
            continue;
        }
        for (i, pair) in points.windows(2).enumerate() {
            if dash_visible(i as u32, settings.dash_on, settings.dash_off) {
                gizmos.line(pair[0], pair[1], color);
            }
        }
    }
}
