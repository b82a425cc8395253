//! Bevy presentation of the animated system.
//!
//! Spawns meshes for every body from the appearance cache and keeps their
//! transforms in step with the [`BodyAnimator`](crate::animator::BodyAnimator).

mod background;
pub mod bodies;
pub mod mesh;
mod orbits;
pub mod star;
mod sync;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use self::background::BackgroundPlugin;
use self::bodies::BodySpawnPlugin;
use self::orbits::{OrbitPathPlugin, draw_orbit_paths};
use self::star::{StarSurfacePlugin, update_star_surface};
use self::sync::{sync_body_transforms, sync_moon_transforms, sync_ring_transforms};
use crate::animator::AnimatorSet;
use crate::texture::RasterMap;

pub use self::bodies::{BodyMarker, MoonMarker, RingMarker};
pub use self::orbits::OrbitPathSettings;
pub use self::star::StarFieldSettings;

/// Where the fixed camera sits, looking at the star.
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 140.0, 220.0);

/// System set for everything that reads the animator after it ticks.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneSyncSet;

/// Plugin aggregating all scene functionality.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            BodySpawnPlugin,
            BackgroundPlugin,
            OrbitPathPlugin,
            StarSurfacePlugin,
        ))
        .add_systems(Startup, spawn_camera)
        .configure_sets(Update, SceneSyncSet.after(AnimatorSet))
        // Bodies first, then what hangs off them, then the star texture and
        // orbit lines which read the final transforms
        .add_systems(
            Update,
            (
                sync_body_transforms,
                (sync_moon_transforms, sync_ring_transforms),
                update_star_surface,
                draw_orbit_paths,
            )
                .chain()
                .in_set(SceneSyncSet),
        );
    }
}

/// Marker for the scene camera.
#[derive(Component)]
pub struct MainCamera;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        // Faint fill so night sides are not pitch black
        AmbientLight {
            color: Color::WHITE,
            brightness: 80.0,
            ..default()
        },
        MainCamera,
    ));
}

/// Upload-ready sRGB image of a color or ring map.
pub fn raster_to_image(map: &RasterMap) -> Image {
    rgba8_image(
        map.width(),
        map.height(),
        map.to_rgba8(),
        TextureFormat::Rgba8UnormSrgb,
    )
}

/// Metallic-roughness texture from a reflectivity map.
///
/// Roughness lives in green and is the inverse of reflectivity; blue
/// (metallic) stays zero.
pub fn roughness_image(map: &RasterMap) -> Image {
    let data = map
        .to_rgba8()
        .chunks_exact(4)
        .flat_map(|t| [0, 255 - t[0], 0, 255])
        .collect();
    rgba8_image(map.width(), map.height(), data, TextureFormat::Rgba8Unorm)
}

/// Parallax depth texture from an elevation map; high ground is shallow.
pub fn depth_image(map: &RasterMap) -> Image {
    let data = map
        .to_rgba8()
        .chunks_exact(4)
        .flat_map(|t| {
            let depth = 255 - t[0];
            [depth, depth, depth, 255]
        })
        .collect();
    rgba8_image(map.width(), map.height(), data, TextureFormat::Rgba8Unorm)
}

/// Blank sRGB image meant to be rewritten every frame.
pub fn dynamic_image(width: u32, height: u32) -> Image {
    rgba8_image(
        width,
        height,
        vec![0; width as usize * height as usize * 4],
        TextureFormat::Rgba8UnormSrgb,
    )
}

fn rgba8_image(width: u32, height: u32, data: Vec<u8>, format: TextureFormat) -> Image {
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        format,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Channel;

    #[test]
    fn test_roughness_inverts_reflectivity() {
        let map = RasterMap::from_bytes(2, 1, Channel::Reflectivity, vec![255, 20]).unwrap();
        let image = roughness_image(&map);
        assert_eq!(image.data.as_deref(), Some(&[0, 0, 0, 255, 0, 235, 0, 255][..]));
    }

    #[test]
    fn test_depth_inverts_elevation() {
        let map = RasterMap::from_bytes(1, 1, Channel::Elevation, vec![200]).unwrap();
        let image = depth_image(&map);
        assert_eq!(image.data.as_deref(), Some(&[55, 55, 55, 255][..]));
    }

    #[test]
    fn test_color_image_size() {
        let map = RasterMap::solid(4, 2, Srgba::WHITE);
        let image = raster_to_image(&map);
        assert_eq!((image.width(), image.height()), (4, 2));
        assert_eq!(dynamic_image(8, 4).data.map(|d| d.len()), Some(128));
    }

    #[test]
    fn test_catalog_colors_convert_without_loss() {
        use crate::bodies::{BodyId, body_config};
        for &id in BodyId::ALL {
            let tint = body_config(id).color.with_alpha(0.3);
            assert_eq!(Color::from(tint).to_srgba(), tint, "{id}");
        }
    }
}
