//! Background dust and scene lighting.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Plugin providing background visual elements.
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DustSettings>()
            .add_systems(Startup, (spawn_dust_shell, spawn_lighting))
            .add_systems(Update, drift_dust_shell);
    }
}

/// Layout of the dust shell around the system.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct DustSettings {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub seed: u64,
}

impl Default for DustSettings {
    fn default() -> Self {
        Self {
            count: 1000,
            inner_radius: 150.0,
            outer_radius: 300.0,
            seed: 0xD057,
        }
    }
}

/// Slow drift of the whole shell, radians per second about y and x.
const DRIFT_RATE: Vec2 = Vec2::new(0.006, 0.003);

/// Parent of every dust particle.
#[derive(Component)]
struct DustShell;

/// Uniformly distributed point in a spherical shell.
fn shell_point(rng: &mut impl Rng, inner: f32, outer: f32) -> Vec3 {
    let radius = rng.gen_range(inner..=outer);
    let theta = rng.gen_range(0.0..TAU);
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let ring = (1.0 - z * z).sqrt();
    Vec3::new(ring * theta.cos(), ring * theta.sin(), z) * radius
}

/// Spawn the dust shell with seeded particle positions.
fn spawn_dust_shell(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<DustSettings>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.6),
        emissive: LinearRgba::WHITE * 0.5,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let mesh = meshes.add(Sphere::new(0.25));

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let inner = settings.inner_radius.min(settings.outer_radius);
    let outer = settings.outer_radius.max(settings.inner_radius);

    commands
        .spawn((DustShell, Transform::default(), Visibility::default()))
        .with_children(|shell| {
            for _ in 0..settings.count {
                let position = shell_point(&mut rng, inner, outer);
                let scale = rng.gen_range(0.2..2.0);
                shell.spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(position).with_scale(Vec3::splat(scale)),
                ));
            }
        });

    info!("Spawned {} dust particles", settings.count);
}

fn drift_dust_shell(time: Res<Time>, mut query: Query<&mut Transform, With<DustShell>>) {
    let dt = time.delta_secs();
    for mut transform in query.iter_mut() {
        transform.rotate_y(DRIFT_RATE.x * dt);
        transform.rotate_x(DRIFT_RATE.y * dt);
    }
}

/// Spawn lighting for the scene.
fn spawn_lighting(mut commands: Commands) {
    // The star is the main light
    commands.spawn((
        PointLight {
            color: Color::srgb_u8(0xFD, 0xB8, 0x13),
            intensity: 4.0e8,
            range: 500.0,
            radius: crate::types::STAR_RADIUS,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));

    // Two weak white fills on either side
    for x in [-100.0, 100.0] {
        commands.spawn((
            PointLight {
                color: Color::WHITE,
                intensity: 5.0e7,
                range: 300.0,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(x, 0.0, 0.0),
        ));
    }

    info!("Scene lighting initialized");
}
