//! Analytic star surface and corona.
//!
//! The star is never rasterized once and cached: its color is a pure function
//! of time, surface position and view-space normal, cheap enough to evaluate
//! for every texel of a small emissive texture each frame.

use bevy::math::{DQuat, DVec3, Vec2};
use std::f64::consts::{PI, TAU};
use wide::f64x4;

use bevy::color::{Alpha, ColorToPacked, Mix, Srgba};

use super::color::{TexelColor, hex};
use super::raster::{Channel, RasterMap};
use crate::types::STAR_RADIUS;

const COLOR_A: Srgba = hex(0xFDB813);
const COLOR_B: Srgba = hex(0xFF6347);
const COLOR_C: Srgba = hex(0xFFA500);

/// Object-space positions are scaled by this before sampling noise.
const SURFACE_SCALE: f64 = 0.1;

/// Weights of the four plasma octaves.
const OCTAVE_WEIGHTS: [f64; 4] = [0.5, 0.25, 0.15, 0.1];

/// Color added at the limb, scaled by the limb factor.
const LIMB_TINT: [f32; 3] = [0.3, 0.2, 0.1];

fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Smooth pseudo-noise in [-1, 1] built from nested sine products.
fn noise3(p: DVec3) -> f64 {
    let a = (p.x * 1.7 + (p.y * 1.3).sin()).sin()
        * (p.y * 1.9 + (p.z * 1.1).sin()).sin()
        * (p.z * 1.5 + (p.x * 1.2).sin()).sin();
    let b = (p.x * 2.3 + p.y * 1.1 - p.z * 0.7 + (p.z * 2.9).sin()).sin();
    0.7 * a + 0.3 * b
}

/// The star's appearance frozen at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarField {
    time: f64,
}

impl StarField {
    pub fn at(time: f64) -> Self {
        Self { time }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Plasma intensity in [0, 1] at an object-space surface point.
    fn plasma(&self, surface: DVec3) -> f64 {
        let t = self.time;
        let pos = surface * SURFACE_SCALE + DVec3::splat(t * 0.02);
        let octaves = f64x4::new([
            noise3(pos),
            noise3(pos * 2.0 - DVec3::splat(t * 0.03)),
            noise3(pos * 4.0 + DVec3::splat(t * 0.05)),
            noise3(pos * 8.0 - DVec3::splat(t * 0.07)),
        ]);
        let weighted = (octaves * f64x4::new(OCTAVE_WEIGHTS)).to_array();
        let sum: f64 = weighted.iter().sum();
        (((sum + 1.0) * 0.5).clamp(0.0, 1.0)).powf(1.5)
    }

    /// Surface color at `surface` (object space) seen with view-space `normal`.
    ///
    /// `normal.z` is the cosine between the normal and the direction to the viewer.
    pub fn color_at(&self, surface: DVec3, normal: DVec3) -> Srgba {
        let t = self.time;
        let plasma = self.plasma(surface);
        let pos = surface * SURFACE_SCALE + DVec3::splat(t * 0.02);

        let granulation = smoothstep(-0.2, 0.2, noise3(pos * 20.0 + DVec3::splat(t * 0.1)));
        let spots = smoothstep(0.3, 0.5, noise3(surface * 0.5 + DVec3::splat(t * 0.005)));

        // Latitude bands drift with a slow sine turbulence
        let lat = surface.normalize_or_zero().y;
        let lon = surface.z.atan2(surface.x);
        let wobble = 0.15 * (lon * 3.0 + t * 0.1).sin() + 0.08 * (lon * 7.0 - t * 0.17).sin();
        let bands = 0.5 + 0.5 * ((lat + wobble) * 12.0).sin();

        let mut color = COLOR_A.mix(&COLOR_B, plasma as f32);
        color = color.mix(&COLOR_C, (granulation * 0.3) as f32);
        color = color.mix(&COLOR_C, (bands * 0.12) as f32);
        color = color.mix(&color.scale_rgb(0.7), spots as f32);

        let limb = (1.0 - normal.z).clamp(0.0, 1.0).powf(0.4) as f32;
        color.red += LIMB_TINT[0] * limb;
        color.green += LIMB_TINT[1] * limb;
        color.blue += LIMB_TINT[2] * limb;

        let flicker = (0.9 + 0.1 * (t * 2.0 + plasma * 10.0).sin()) as f32;
        Srgba::new(
            color.red * flicker,
            color.green * flicker,
            color.blue * flicker,
            1.0,
        )
        .clamped()
    }

    /// Corona color on a billboard; `uv` spans [0, 1]² with the star at the center.
    pub fn corona_at(&self, uv: Vec2) -> Srgba {
        let t = self.time;
        let d = uv.distance(Vec2::splat(0.5)) as f64;
        let angle = ((uv.y - 0.5) as f64).atan2((uv.x - 0.5) as f64);

        let wave = |k: f64, w: f64| (angle * k + t * w).sin() * 0.5 + 0.5;
        let rays = wave(12.0, 1.0) * wave(8.0, -0.7) * wave(6.0, 1.5);
        let flare = |w: f64, k: f64| (t * w + angle * k).sin() * 0.5 + 0.5;
        let flares = flare(3.0, 5.0).max(flare(2.0, -7.0));

        let glow = (1.0 - smoothstep(0.0, 0.5, d)).powi(2);
        let intensity = glow * rays * flares * (0.6 + 0.4 * (t * 2.0).sin());

        let inner = Srgba::new(1.0, 0.9, 0.6, 1.0);
        let outer = Srgba::new(1.0, 0.5, 0.2, 1.0);
        inner
            .mix(&outer, (d * d) as f32)
            .with_alpha((intensity * 0.8) as f32)
            .clamped()
    }

    /// Fill an equirectangular RGBA8 buffer.
    ///
    /// `to_view` rotates object-space normals into view space so the limb lands
    /// where the camera sees it. `out` must hold `width * height * 4` bytes.
    pub fn render_into(&self, width: u32, height: u32, to_view: DQuat, out: &mut [u8]) {
        for (i, texel) in out
            .chunks_exact_mut(4)
            .take(width as usize * height as usize)
            .enumerate()
        {
            let x = (i % width as usize) as f64;
            let y = (i / width as usize) as f64;
            let lon = (x + 0.5) / width as f64 * TAU;
            let lat = PI * (0.5 - (y + 0.5) / height as f64);
            let dir = DVec3::new(lat.cos() * lon.cos(), lat.sin(), -lat.cos() * lon.sin());
            let c = self.color_at(dir * STAR_RADIUS as f64, to_view * dir);
            texel.copy_from_slice(&c.to_u8_array());
        }
    }

    /// Equirectangular snapshot, limb measured against +z.
    pub fn snapshot(&self, width: u32, height: u32) -> RasterMap {
        let mut data = vec![0; width as usize * height as usize * 4];
        self.render_into(width, height, DQuat::IDENTITY, &mut data);
        RasterMap::from_bytes(width, height, Channel::Color, data)
            .unwrap_or_else(|| RasterMap::solid(width, height, COLOR_A))
    }
}

/// Star surface color at `time` for an object-space point and view-space normal.
pub fn sample_star_field(time: f64, surface_coord: DVec3, normal: DVec3) -> Srgba {
    StarField::at(time).color_at(surface_coord, normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::ColorToComponents;

    fn sample_points() -> impl Iterator<Item = DVec3> {
        (0..16).flat_map(|i| {
            (0..8).map(move |j| {
                let lon = i as f64 / 16.0 * TAU;
                let lat = (j as f64 / 8.0 - 0.5) * PI;
                DVec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
            })
        })
    }

    #[test]
    fn test_noise_bounded() {
        for p in sample_points() {
            for s in [1.0, 7.3, 55.0] {
                let n = noise3(p * s);
                assert!((-1.0..=1.0).contains(&n));
            }
        }
    }

    #[test]
    fn test_colors_finite_over_time() {
        for t in [0.0, 0.5, 17.0, 1.0e4, 1.0e6] {
            let field = StarField::at(t);
            for dir in sample_points() {
                let c = field.color_at(dir * 10.0, dir);
                for v in c.to_f32_array() {
                    assert!(v.is_finite() && (0.0..=1.0).contains(&v));
                }
            }
        }
    }

    #[test]
    fn test_sampling_is_pure() {
        let p = DVec3::new(3.0, 4.0, 8.6);
        let n = DVec3::Z;
        assert_eq!(sample_star_field(2.5, p, n), sample_star_field(2.5, p, n));
    }

    #[test]
    fn test_field_animates() {
        let p = DVec3::new(3.0, 4.0, 8.6);
        let n = DVec3::Z;
        let changed = (1..20).any(|k| {
            sample_star_field(0.0, p, n) != sample_star_field(k as f64 * 0.37, p, n)
        });
        assert!(changed);
    }

    #[test]
    fn test_limb_brightening() {
        // Same surface point, facing the viewer vs. grazing
        let field = StarField::at(1.0);
        let p = DVec3::new(0.0, 0.0, 10.0);
        let center = field.color_at(p, DVec3::Z);
        let limb = field.color_at(p, DVec3::X);
        assert!(limb.blue > center.blue || limb.blue >= 1.0);
    }

    #[test]
    fn test_corona_fades_outwards() {
        let field = StarField::at(0.3);
        let far = field.corona_at(Vec2::new(1.0, 1.0));
        assert_eq!(far.alpha, 0.0);
        let center = field.corona_at(Vec2::new(0.5, 0.5));
        assert!(center.alpha >= 0.0 && center.alpha <= 0.8);
    }

    #[test]
    fn test_snapshot_dimensions() {
        let map = StarField::at(0.0).snapshot(32, 16);
        assert_eq!((map.width(), map.height()), (32, 16));
        assert!(map.data().chunks_exact(4).all(|t| t[3] == 255));
    }
}
