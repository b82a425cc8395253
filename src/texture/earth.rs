//! Earth: oceans, continents, polar caps and a cloud layer.
//!
//! Elevation and reflectivity are painted alongside the color so that land
//! and sea line up texel for texel across all three maps.

use bevy::color::{Alpha, Srgba};
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::BodyAppearanceMaps;
use super::canvas::{Canvas, Paint};
use super::color::{Gradient, gray, hex};
use super::raster::Channel;

/// Continent placement on the 1024×512 authoring canvas: center and half extents.
const CONTINENTS: [(Vec2, Vec2); 6] = [
    (Vec2::new(200.0, 175.0), Vec2::new(70.0, 75.0)),
    (Vec2::new(270.0, 340.0), Vec2::new(40.0, 70.0)),
    (Vec2::new(512.0, 256.0), Vec2::new(50.0, 85.0)),
    (Vec2::new(740.0, 190.0), Vec2::new(130.0, 60.0)),
    (Vec2::new(820.0, 355.0), Vec2::new(42.0, 28.0)),
    (Vec2::new(350.0, 80.0), Vec2::new(35.0, 22.0)),
];

const OCEAN_HEIGHT: f32 = 0.15;
const LAND_HEIGHT: f32 = 0.7;
const OCEAN_GLOSS: f32 = 0.85;
const LAND_GLOSS: f32 = 0.12;
const ICE_GLOSS: f32 = 0.5;

/// Irregular closed outline around an ellipse.
///
/// # Arguments
/// * `vertices` - number of perturbed control points (at least 16)
/// * `rotation` - rotation of the underlying ellipse in radians
fn continent_outline(
    rng: &mut impl Rng,
    center: Vec2,
    half: Vec2,
    vertices: usize,
    rotation: f32,
) -> Vec<Vec2> {
    let vertices = vertices.max(16);
    let (sin, cos) = rotation.sin_cos();
    (0..vertices)
        .map(|k| {
            let a = TAU * k as f32 / vertices as f32;
            let f = rng.gen_range(0.75..1.25);
            let local = Vec2::new(half.x * a.cos() * f, half.y * a.sin() * f);
            center + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
        })
        .collect()
}

/// Round off a closed outline with quadratic curves through edge midpoints.
fn smooth_closed(points: &[Vec2], steps: usize) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n * steps);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let ctrl = points[i];
        let next = points[(i + 1) % n];
        let a = (prev + ctrl) * 0.5;
        let b = (ctrl + next) * 0.5;
        for s in 0..steps {
            let t = s as f32 / steps as f32;
            let u = 1.0 - t;
            out.push(a * (u * u) + ctrl * (2.0 * u * t) + b * (t * t));
        }
    }
    out
}

/// Even-odd point-in-polygon test.
fn polygon_contains(poly: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let n = poly.len();
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        if (a.y > p.y) != (b.y > p.y) && p.x < a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x) {
            inside = !inside;
        }
    }
    inside
}

/// Dark mountain and light desert dots scattered inside a continent.
fn speckle(
    rng: &mut impl Rng,
    outline: &[Vec2],
    center: Vec2,
    half: Vec2,
    color: &mut Canvas,
    elevation: &mut Canvas,
    scale: f32,
) {
    let mountain = hex(0x1B5E20).with_alpha(0.5);
    let desert = hex(0xC2B280).with_alpha(0.45);
    let count = rng.gen_range(40..=80);
    for _ in 0..count {
        let p = center + Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)) * half;
        if !polygon_contains(outline, p) {
            continue;
        }
        let r = rng.gen_range(1.0..3.0) * scale;
        if rng.gen_bool(0.6) {
            color.fill_circle(p, r, &Paint::Solid(mountain));
            elevation.fill_circle(p, r, &Paint::Solid(gray(0.95).with_alpha(0.8)));
        } else {
            color.fill_circle(p, r, &Paint::Solid(desert));
        }
    }
}

pub fn earth(width: u32, height: u32, rng: &mut impl Rng) -> BodyAppearanceMaps {
    let (w, h) = (width as f32, height as f32);
    let s = Vec2::new(w / 1024.0, h / 512.0);

    let mut color = Canvas::new(width, height);
    color.fill(&Paint::Radial {
        center: Vec2::new(w * 0.5, h * 0.5),
        inner: 0.0,
        outer: w * 0.5,
        gradient: Gradient::two(hex(0x1E90FF), hex(0x000080)),
    });
    let mut elevation = Canvas::filled(width, height, gray(OCEAN_HEIGHT));
    let mut reflectivity = Canvas::filled(width, height, gray(OCEAN_GLOSS));

    let land = Paint::Radial {
        center: Vec2::new(w * 0.5, h * 0.5),
        inner: 0.0,
        outer: 400.0 * s.x,
        gradient: Gradient::new([
            (0.0, hex(0x228B22)),
            (0.5, hex(0x3CB371)),
            (1.0, hex(0x2E7D32)),
        ]),
    };
    for (center, half) in CONTINENTS {
        let center = center * s;
        let half = half * s;
        let vertices = rng.gen_range(16..=24);
        let rotation = rng.gen_range(0.0..0.5);
        let outline = smooth_closed(
            &continent_outline(rng, center, half, vertices, rotation),
            4,
        );
        color.fill_polygon(&outline, &land);
        elevation.fill_polygon(&outline, &Paint::Solid(gray(LAND_HEIGHT)));
        reflectivity.fill_polygon(&outline, &Paint::Solid(gray(LAND_GLOSS)));
        speckle(rng, &outline, center, half, &mut color, &mut elevation, s.y);
    }

    // Polar caps fade out over the top and bottom 7% of the map
    let cap = h * 0.07;
    let ice = hex(0xF0F8FF);
    for (from, to) in [(0.0, cap), (h, h - cap)] {
        let fade = |c: Srgba| Paint::vertical(from, to, Gradient::two(c, c.with_alpha(0.0)));
        let (y, span) = if from < to { (from, cap) } else { (to, cap) };
        color.fill_rect(0.0, y, w, span, &fade(ice));
        elevation.fill_rect(0.0, y, w, span, &fade(gray(0.6)));
        reflectivity.fill_rect(0.0, y, w, span, &fade(gray(ICE_GLOSS)));
    }

    let clouds = rng.gen_range(150..=300);
    for _ in 0..clouds {
        let center = Vec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
        let radius = rng.gen_range(0.015..0.06) * h;
        let alpha = rng.gen_range(0.3..0.6);
        color.fill_circle(
            center,
            radius,
            &Paint::radial(
                center,
                radius,
                Gradient::two(Srgba::WHITE.with_alpha(alpha), Srgba::WHITE.with_alpha(0.0)),
            ),
        );
    }

    BodyAppearanceMaps {
        albedo: color.into_raster(Channel::Color),
        elevation: Some(elevation.into_raster(Channel::Elevation)),
        reflectivity: Some(reflectivity.into_raster(Channel::Reflectivity)),
    }
}
