//! The star: a sphere whose texture is re-sampled from the analytic field
//! every frame, a camera-facing corona and three glow shells.

use bevy::color::ColorToPacked;
use bevy::math::DQuat;
use bevy::prelude::*;
use bevy::render::render_resource::Face;

use super::bodies::BodyMarker;
use super::mesh::uv_sphere;
use super::{MainCamera, dynamic_image};
use crate::animator::BodyAnimator;
use crate::bodies::BodyId;
use crate::texture::{StarField, hex};
use crate::types::STAR_RADIUS;

/// Corona billboard edge as a multiple of the star's diameter.
const CORONA_SCALE: f32 = 2.5;

/// Glow shells: scale relative to the star, color and opacity.
const GLOW_SHELLS: [(f32, Srgba, f32); 3] = [
    (1.3, hex(0xFFD700), 0.4),
    (1.6, hex(0xFFA500), 0.2),
    (2.0, hex(0xFF6347), 0.1),
];

/// Resolution of the per-frame star textures.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct StarFieldSettings {
    /// Surface texture width (longitude)
    pub width: u32,
    /// Surface texture height (latitude)
    pub height: u32,
    /// Edge of the square corona texture
    pub corona_size: u32,
    pub glow_shells: bool,
}

impl Default for StarFieldSettings {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            corona_size: 64,
            glow_shells: true,
        }
    }
}

/// Image handles rewritten every frame.
#[derive(Resource)]
pub struct StarTextures {
    pub surface: Handle<Image>,
    pub corona: Handle<Image>,
}

/// Marker for the corona billboard.
#[derive(Component)]
pub struct Corona;

/// Plugin providing the star.
pub struct StarSurfacePlugin;

impl Plugin for StarSurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StarFieldSettings>()
            .add_systems(Startup, spawn_star);
    }
}

/// Fill a square RGBA8 buffer with the corona.
fn render_corona_into(field: &StarField, size: u32, out: &mut [u8]) {
    let size = size.max(1);
    for (i, texel) in out
        .chunks_exact_mut(4)
        .take(size as usize * size as usize)
        .enumerate()
    {
        let x = (i % size as usize) as f32;
        let y = (i / size as usize) as f32;
        let uv = Vec2::new(x + 0.5, y + 0.5) / size as f32;
        texel.copy_from_slice(&field.corona_at(uv).to_u8_array());
    }
}

fn spawn_star(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<StarFieldSettings>,
    animator: Option<Res<BodyAnimator>>,
) {
    let field = animator
        .map(|a| a.star_field())
        .unwrap_or(StarField::at(0.0));

    let (w, h) = (settings.width.max(1), settings.height.max(1));
    let mut surface = dynamic_image(w, h);
    if let Some(data) = surface.data.as_mut() {
        field.render_into(w, h, DQuat::IDENTITY, data);
    }
    let surface = images.add(surface);

    let size = settings.corona_size.max(1);
    let mut corona = dynamic_image(size, size);
    if let Some(data) = corona.data.as_mut() {
        render_corona_into(&field, size, data);
    }
    let corona = images.add(corona);

    commands.spawn((
        Mesh3d(meshes.add(uv_sphere(STAR_RADIUS, 64, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture: Some(surface.clone()),
            emissive: LinearRgba::WHITE,
            emissive_texture: Some(surface.clone()),
            unlit: true,
            ..default()
        })),
        Transform::default(),
        BodyMarker { id: BodyId::Sun },
    ));

    let edge = 2.0 * STAR_RADIUS * CORONA_SCALE;
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(edge, edge))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(corona.clone()),
            alpha_mode: AlphaMode::Add,
            unlit: true,
            cull_mode: None,
            ..default()
        })),
        Transform::default(),
        Corona,
    ));

    if settings.glow_shells {
        let shell = meshes.add(uv_sphere(STAR_RADIUS, 32, 16));
        for (scale, color, opacity) in GLOW_SHELLS {
            commands.spawn((
                Mesh3d(shell.clone()),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color.with_alpha(opacity).into(),
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    // Seen from inside, like a halo behind the surface
                    cull_mode: Some(Face::Front),
                    ..default()
                })),
                Transform::from_scale(Vec3::splat(scale)),
            ));
        }
    }

    commands.insert_resource(StarTextures { surface, corona });
    info!("Star spawned with a {}x{} animated surface", w, h);
}

/// Re-sample the star textures for this frame and turn the corona to the camera.
pub fn update_star_surface(
    animator: Option<Res<BodyAnimator>>,
    textures: Option<Res<StarTextures>>,
    mut images: ResMut<Assets<Image>>,
    bodies: Query<(&Transform, &BodyMarker), Without<Corona>>,
    camera: Query<&Transform, (With<MainCamera>, Without<Corona>)>,
    mut corona: Query<&mut Transform, With<Corona>>,
) {
    let (Some(animator), Some(textures)) = (animator, textures) else {
        return;
    };
    let field = animator.star_field();

    let view = camera.single().map(|t| t.rotation).unwrap_or(Quat::IDENTITY);
    let spin = bodies
        .iter()
        .find(|(_, body)| body.id.is_star())
        .map(|(t, _)| t.rotation)
        .unwrap_or(Quat::IDENTITY);
    // Object-space normals into view space, where +z faces the viewer
    let to_view = (view.inverse() * spin).as_dquat();

    if let Some(mut image) = images.get_mut(&textures.surface) {
        let (w, h) = (image.width(), image.height());
        if let Some(data) = image.data.as_mut() {
            field.render_into(w, h, to_view, data);
        }
    }
    if let Some(mut image) = images.get_mut(&textures.corona) {
        let size = image.width();
        if let Some(data) = image.data.as_mut() {
            render_corona_into(&field, size, data);
        }
    }

    for mut transform in &mut corona {
        transform.rotation = view;
    }
}
