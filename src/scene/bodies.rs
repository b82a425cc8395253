//! Planet, moon and ring spawning.
//!
//! Every planet gets a textured sphere from the appearance cache. Moons are
//! plain colored spheres and ring systems are one annulus per sub-ring.

use bevy::prelude::*;

use super::mesh::{annulus, uv_sphere};
use super::{depth_image, raster_to_image, roughness_image};
use crate::animator::BodyAnimator;
use crate::bodies::{BodyConfig, BodyId, body_config};
use crate::texture::{AppearanceCache, BodyAppearanceMaps, RingKind, RingSpec};

/// Sectors around a planet sphere; stacks are half of this.
const SPHERE_SECTORS: u32 = 64;
const MOON_SECTORS: u32 = 16;
const RING_SEGMENTS: u32 = 128;

/// Height of the tallest terrain in parallax mapping.
const PARALLAX_DEPTH: f32 = 0.02;

/// Component marking an entity as a rendered body (the star included).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyMarker {
    pub id: BodyId,
}

/// Component marking a moon, by its parent and position in the parent's table.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonMarker {
    pub parent: BodyId,
    pub index: usize,
}

/// Component marking one sub-ring annulus.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingMarker {
    pub parent: BodyId,
}

/// Plugin providing planet spawning.
pub struct BodySpawnPlugin;

impl Plugin for BodySpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppearanceCache>()
            .add_systems(Startup, spawn_planets);
    }
}

/// Surface material from a body's maps.
fn planet_material(maps: &BodyAppearanceMaps, images: &mut Assets<Image>) -> StandardMaterial {
    let roughness = maps
        .reflectivity
        .as_ref()
        .map(|m| images.add(roughness_image(m)));
    let depth = maps.elevation.as_ref().map(|m| images.add(depth_image(m)));
    StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(images.add(raster_to_image(&maps.albedo))),
        // The texture, when present, scales this per texel
        perceptual_roughness: if roughness.is_some() { 1.0 } else { 0.85 },
        metallic: 0.0,
        metallic_roughness_texture: roughness,
        parallax_depth_scale: PARALLAX_DEPTH,
        depth_map: depth,
        ..default()
    }
}

/// Spawn all planets with their moons and rings.
fn spawn_planets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut cache: ResMut<AppearanceCache>,
    animator: Option<Res<BodyAnimator>>,
) {
    let mut moons = 0;
    let mut rings = 0;

    for &id in BodyId::PLANETS {
        let config = body_config(id);
        let translation = animator
            .as_ref()
            .and_then(|a| a.entry(id))
            .map(|e| e.translation())
            .unwrap_or(Vec3::new(config.distance as f32, 0.0, 0.0));

        let maps = cache.get(id);
        let material = materials.add(planet_material(&maps, &mut images));
        commands.spawn((
            Mesh3d(meshes.add(uv_sphere(config.radius, SPHERE_SECTORS, SPHERE_SECTORS / 2))),
            MeshMaterial3d(material),
            Transform::from_translation(translation),
            BodyMarker { id },
        ));

        moons += spawn_moons(
            &mut commands,
            &mut meshes,
            &mut materials,
            &config,
            translation,
        );

        if let Some(spec) = RingSpec::for_body(id) {
            rings += spawn_rings(
                &mut commands,
                &mut meshes,
                &mut materials,
                &mut images,
                &mut cache,
                &config,
                &spec,
                translation,
            );
        }
    }

    info!(
        "Spawned {} planets, {} moons and {} ring bands",
        BodyId::PLANETS.len(),
        moons,
        rings
    );
}

fn spawn_moons(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &BodyConfig,
    parent: Vec3,
) -> usize {
    for (index, moon) in config.moons.iter().enumerate() {
        let material = materials.add(StandardMaterial {
            base_color: moon.color.into(),
            perceptual_roughness: 0.8,
            ..default()
        });
        let offset = Vec3::X * moon.distance_radii * config.radius;
        commands.spawn((
            Mesh3d(meshes.add(uv_sphere(moon.radius, MOON_SECTORS, MOON_SECTORS / 2))),
            MeshMaterial3d(material),
            Transform::from_translation(parent + offset),
            MoonMarker {
                parent: config.id,
                index,
            },
        ));
    }
    config.moons.len()
}

/// One annulus per visible sub-ring, textured with its strip.
fn spawn_rings(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    cache: &mut AppearanceCache,
    config: &BodyConfig,
    spec: &RingSpec,
    parent: Vec3,
) -> usize {
    let strips = cache.get_ring_maps(spec);
    let tilt = Quat::from_rotation_x(config.ring_tilt());
    let mut spawned = 0;

    for (sub_ring, strip) in spec.sub_rings().iter().zip(strips.iter()) {
        if sub_ring.kind == RingKind::Gap {
            continue;
        }
        let inner = config.radius * spec.radius_at(sub_ring.start);
        let outer = config.radius * spec.radius_at(sub_ring.end());
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(images.add(raster_to_image(strip))),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.8,
            cull_mode: None,
            double_sided: true,
            ..default()
        });
        commands.spawn((
            Mesh3d(meshes.add(annulus(inner, outer, RING_SEGMENTS))),
            MeshMaterial3d(material),
            Transform::from_translation(parent).with_rotation(tilt),
            RingMarker { parent: config.id },
        ));
        spawned += 1;
    }
    spawned
}
