//! Transform synchronization from the animator.
//!
//! The animator is the only source of positions and spin angles; these
//! systems copy its entries onto the spawned entities.

use bevy::prelude::*;

use super::bodies::{BodyMarker, MoonMarker, RingMarker};
use crate::animator::BodyAnimator;

/// Place bodies at their orbital positions and spin them about +y.
pub fn sync_body_transforms(
    animator: Option<Res<BodyAnimator>>,
    mut query: Query<(&mut Transform, &BodyMarker)>,
) {
    let Some(animator) = animator else {
        return;
    };
    for (mut transform, body) in query.iter_mut() {
        if let Some(entry) = animator.entry(body.id) {
            transform.translation = entry.translation();
            transform.rotation = Quat::from_rotation_y(entry.rotation as f32);
        }
    }
}

/// Moons sit at their parent's position plus the satellite offset.
pub fn sync_moon_transforms(
    animator: Option<Res<BodyAnimator>>,
    mut query: Query<(&mut Transform, &MoonMarker)>,
) {
    let Some(animator) = animator else {
        return;
    };
    for (mut transform, moon) in query.iter_mut() {
        let Some(parent) = animator.entry(moon.parent) else {
            continue;
        };
        if let Some(state) = parent.moons.get(moon.index) {
            transform.translation = parent.translation() + state.offset();
            transform.rotation = Quat::from_rotation_y(state.spin as f32);
        }
    }
}

/// Rings follow their planet but keep their own fixed tilt.
pub fn sync_ring_transforms(
    animator: Option<Res<BodyAnimator>>,
    mut query: Query<(&mut Transform, &RingMarker)>,
) {
    let Some(animator) = animator else {
        return;
    };
    for (mut transform, ring) in query.iter_mut() {
        if let Some(parent) = animator.entry(ring.parent) {
            transform.translation = parent.translation();
        }
    }
}
