//! Band-structured surfaces: Jupiter, Saturn, Uranus, Neptune and Venus.
//!
//! Every band is a vertical `color → brightened → color` gradient. Bands are
//! redrawn column by column with a turbulence offset so their edges wave.
//! Colors and band proportions are authored against a 1024×512 canvas and
//! scaled to the requested size.

use bevy::color::{Alpha, Srgba};
use bevy::math::Vec2;
use rand::Rng;

use super::canvas::{Canvas, Paint};
use super::color::{Gradient, TexelColor, hex};
use super::noise::Turbulence;
use super::raster::{Channel, RasterMap};

/// Width of the canvas the recipes were authored on.
const AUTHORED_WIDTH: f32 = 1024.0;
const AUTHORED_HEIGHT: f32 = 512.0;

/// One horizontal band; `weight` is its share of the band stack's height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub color: Srgba,
    pub weight: f32,
}

const fn band(rgb: u32, weight: f32) -> Band {
    Band {
        color: hex(rgb),
        weight,
    }
}

/// How a stack of bands is drawn.
#[derive(Clone, Copy, Debug)]
struct BandStyle {
    /// Brightening at the band's middle, in percent
    brighten: f32,
    /// Per-column-group brightness jitter, ± percent
    jitter: f32,
    /// Width of a jitter group in texels
    column: u32,
    opacity: f32,
}

/// Composite a band gradient into one texel column.
fn fill_column(canvas: &mut Canvas, x: u32, top: f32, height: f32, gradient: &Gradient) {
    let y0 = top.floor().max(0.0) as u32;
    let y1 = (top + height).ceil().min(canvas.height() as f32).max(0.0) as u32;
    for y in y0..y1 {
        let cy = y as f32 + 0.5;
        if cy < top || cy >= top + height {
            continue;
        }
        canvas.blend(x, y, gradient.sample((cy - top) / height));
    }
}

/// Draw `bands` stacked from the top to the bottom of the canvas.
fn draw_bands(
    canvas: &mut Canvas,
    rng: &mut impl Rng,
    bands: &[Band],
    style: BandStyle,
    turbulence: &Turbulence,
) {
    let total: f32 = bands.iter().map(|b| b.weight).sum();
    if total <= 0.0 {
        return;
    }
    let scale = canvas.height() as f32 / total;
    let width = canvas.width();
    let column = style.column.max(1);

    let mut top = 0.0;
    for band in bands {
        let height = band.weight * scale;
        let base = band.color.with_alpha(style.opacity);
        canvas.fill_rect(
            0.0,
            top,
            width as f32,
            height,
            &Paint::vertical(top, top + height, Gradient::band(base, style.brighten)),
        );

        let mut x = 0;
        while x < width {
            let shift = if style.jitter > 0.0 {
                rng.gen_range(-style.jitter..=style.jitter)
            } else {
                0.0
            };
            let gradient = Gradient::band(base.adjust_brightness(shift), style.brighten);
            for cx in x..(x + column).min(width) {
                let offset = turbulence.sample(cx as f32);
                fill_column(canvas, cx, top + offset, height, &gradient);
            }
            x += column;
        }
        top += height;
    }
}

/// Concentric rotated ellipses, each smaller and fainter than the last.
pub fn draw_vortex(
    canvas: &mut Canvas,
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    colors: [Srgba; 3],
    layers: usize,
) {
    let layers = layers.max(1);
    for i in 0..layers {
        let f = i as f32 / layers as f32;
        let size = 1.0 - 0.8 * f;
        let alpha = 0.95 - 0.6 * f;
        let gradient = Gradient::new([
            (0.0, colors[0].with_alpha(alpha)),
            (0.5, colors[1].with_alpha(alpha)),
            (1.0, colors[2].with_alpha(alpha)),
        ]);
        let paint = Paint::radial(center, radii.x * size, gradient);
        // Slight twist per layer reads as rotation
        let twist = rotation + 0.04 * i as f32;
        canvas.fill_ellipse(center, radii.x * size, radii.y * size, twist, &paint);
    }
}

/// Horizontal scale factors relative to the authored canvas.
fn scales(canvas: &Canvas) -> (f32, f32) {
    (
        canvas.width() as f32 / AUTHORED_WIDTH,
        canvas.height() as f32 / AUTHORED_HEIGHT,
    )
}

const JUPITER_BANDS: &[Band] = &[
    band(0xD4A76A, 40.0),
    band(0xFFE5CC, 30.0),
    band(0xC8986B, 50.0),
    band(0xFFF8DC, 25.0),
    band(0x8B7355, 45.0),
    band(0xFAEBD7, 35.0),
    band(0xA0522D, 40.0),
    band(0xFFE4B5, 30.0),
    band(0xD2691E, 50.0),
    band(0xFFDEAD, 35.0),
];

pub fn jupiter(width: u32, height: u32, rng: &mut impl Rng) -> RasterMap {
    let mut canvas = Canvas::filled(width, height, hex(0xD4A76A));
    let (sx, sy) = scales(&canvas);

    let turbulence = Turbulence::random(rng, 3, 0.0016 / sx, 5.0 * sy);
    let style = BandStyle {
        brighten: 20.0,
        jitter: 10.0,
        column: (20.0 * sx).round() as u32,
        opacity: 1.0,
    };
    draw_bands(&mut canvas, rng, JUPITER_BANDS, style, &turbulence);

    let layers = rng.gen_range(8..=15);
    draw_vortex(
        &mut canvas,
        Vec2::new(700.0 * sx, 320.0 * sy),
        Vec2::new(80.0 * sx, 50.0 * sy),
        0.2,
        [
            hex(0xCD5C5C),
            hex(0xB22222),
            hex(0x8B0000),
        ],
        layers,
    );
    canvas.into_raster(Channel::Color)
}

const SATURN_BANDS: &[Band] = &[
    band(0xFFF8DC, 1.0),
    band(0xFAEBD7, 1.0),
    band(0xFFE4C4, 1.0),
    band(0xFFDAB9, 1.0),
    band(0xFFE4B5, 1.0),
];

/// Hexagonal storm around the north pole, squashed by the projection.
fn draw_polar_hexagon(canvas: &mut Canvas) {
    let (sx, sy) = scales(canvas);
    let center = Vec2::new(canvas.width() as f32 * 0.5, 34.0 * sy);
    let hexagon = |rx: f32, ry: f32| -> Vec<Vec2> {
        (0..6)
            .map(|k| {
                let a = std::f32::consts::TAU * k as f32 / 6.0;
                center + Vec2::new(rx * a.cos(), ry * a.sin())
            })
            .collect()
    };
    canvas.fill_polygon(
        &hexagon(110.0 * sx, 26.0 * sy),
        &Paint::Solid(hex(0xC9A66B).with_alpha(0.55)),
    );
    canvas.fill_polygon(
        &hexagon(92.0 * sx, 20.0 * sy),
        &Paint::Solid(hex(0xE8CFA0).with_alpha(0.6)),
    );
}

pub fn saturn(width: u32, height: u32, rng: &mut impl Rng) -> RasterMap {
    let mut canvas = Canvas::new(width, height);
    let (sx, sy) = scales(&canvas);
    canvas.fill(&Paint::vertical(
        0.0,
        height as f32,
        Gradient::new([
            (0.0, hex(0xFFE4B5)),
            (0.5, hex(0xFFDEAD)),
            (1.0, hex(0xF5DEB3)),
        ]),
    ));

    let turbulence = Turbulence::random(rng, 2, 0.0016 / sx, 3.0 * sy);
    let style = BandStyle {
        brighten: 10.0,
        jitter: 0.0,
        column: 1,
        opacity: 0.75,
    };
    draw_bands(&mut canvas, rng, SATURN_BANDS, style, &turbulence);

    // Faint wave overlay every 50 authored texels
    let band_height = height as f32 / SATURN_BANDS.len() as f32;
    let step = (50.0 * sx).max(1.0);
    for (i, b) in SATURN_BANDS.iter().enumerate() {
        let y = i as f32 * band_height;
        let paint = Paint::Solid(b.color.with_alpha(0x33 as f32 / 255.0));
        let mut x = 0.0;
        while x < width as f32 {
            let wave = (x / sx * 0.01).sin() * 10.0 * sy;
            canvas.fill_rect(x, y + wave, step, band_height, &paint);
            x += step;
        }
    }

    draw_polar_hexagon(&mut canvas);
    canvas.into_raster(Channel::Color)
}

pub fn uranus(width: u32, height: u32, rng: &mut impl Rng) -> RasterMap {
    let mut canvas = Canvas::filled(width, height, hex(0x9FE2EE));
    let (sx, sy) = scales(&canvas);

    let palette = [0x9FE2EE, 0xA8E6F0, 0x96DDEA, 0xB2EAF2, 0x8FD8E6];
    let count = rng.gen_range(7..=10);
    let bands: Vec<Band> = (0..count)
        .map(|i| band(palette[i % palette.len()], rng.gen_range(0.6..1.4)))
        .collect();

    let turbulence = Turbulence::random(rng, 2, 0.001 / sx, 2.0 * sy);
    let style = BandStyle {
        brighten: 4.0,
        jitter: 2.0,
        column: (32.0 * sx).round() as u32,
        opacity: 1.0,
    };
    draw_bands(&mut canvas, rng, &bands, style, &turbulence);
    canvas.into_raster(Channel::Color)
}

const NEPTUNE_BANDS: &[Band] = &[
    band(0x3F5FBF, 40.0),
    band(0x4B70DD, 60.0),
    band(0x5A7FE6, 35.0),
    band(0x2E4AA8, 50.0),
    band(0x4B70DD, 70.0),
    band(0x3A58C4, 45.0),
    band(0x5A7FE6, 40.0),
    band(0x2E4AA8, 55.0),
    band(0x3F5FBF, 45.0),
];

pub fn neptune(width: u32, height: u32, rng: &mut impl Rng) -> RasterMap {
    let mut canvas = Canvas::filled(width, height, hex(0x4B70DD));
    let (sx, sy) = scales(&canvas);

    let turbulence = Turbulence::random(rng, 3, 0.002 / sx, 6.0 * sy);
    let style = BandStyle {
        brighten: 12.0,
        jitter: 6.0,
        column: (16.0 * sx).round() as u32,
        opacity: 1.0,
    };
    draw_bands(&mut canvas, rng, NEPTUNE_BANDS, style, &turbulence);

    let layers = rng.gen_range(8..=15);
    draw_vortex(
        &mut canvas,
        Vec2::new(360.0 * sx, 300.0 * sy),
        Vec2::new(70.0 * sx, 36.0 * sy),
        -0.15,
        [
            hex(0x14205A),
            hex(0x1C2B70),
            hex(0x2A3C8C),
        ],
        layers,
    );

    // Bright methane clouds trailing the dark spot
    let cirrus = Paint::Solid(Srgba::WHITE.with_alpha(0.35));
    for k in 0..3 {
        let x = (360.0 + 60.0 * k as f32) * sx + rng.gen_range(-20.0..20.0) * sx;
        let y = 255.0 * sy + rng.gen_range(-10.0..10.0) * sy;
        canvas.fill_ellipse(Vec2::new(x, y), 30.0 * sx, 4.0 * sy, 0.0, &cirrus);
    }
    canvas.into_raster(Channel::Color)
}

const VENUS_BANDS: &[Band] = &[
    band(0xFFE5B4, 70.0),
    band(0xF5C26B, 55.0),
    band(0xFFD699, 80.0),
    band(0xE8A953, 50.0),
    band(0xFFF0C9, 75.0),
    band(0xF2B66D, 60.0),
    band(0xFFE5B4, 65.0),
];

pub fn venus(width: u32, height: u32, rng: &mut impl Rng) -> RasterMap {
    let mut canvas = Canvas::filled(width, height, hex(0xFFE5B4));
    let (sx, sy) = scales(&canvas);

    let turbulence = Turbulence::random(rng, 4, 0.003 / sx, 14.0 * sy);
    let style = BandStyle {
        brighten: 8.0,
        jitter: 5.0,
        column: (8.0 * sx).round() as u32,
        opacity: 1.0,
    };
    draw_bands(&mut canvas, rng, VENUS_BANDS, style, &turbulence);
    canvas.into_raster(Channel::Color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn column_variation(map: &RasterMap, x: u32) -> u32 {
        let mut seen: Vec<[u8; 4]> = (0..map.height())
            .filter_map(|y| map.rgba(x, y))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len() as u32
    }

    #[test]
    fn test_bands_fill_whole_canvas() {
        let mut rng = StdRng::seed_from_u64(1);
        let map = jupiter(128, 64, &mut rng);
        assert_eq!(map.channel(), Channel::Color);
        assert!(map.data().chunks_exact(4).all(|t| t[3] == 255));
    }

    #[test]
    fn test_band_edges_wave() {
        // With turbulence the same row differs between distant columns
        let mut rng = StdRng::seed_from_u64(2);
        let map = venus(256, 128, &mut rng);
        let differs = (0..map.height()).any(|y| map.rgba(10, y) != map.rgba(140, y));
        assert!(differs);
        assert!(column_variation(&map, 10) > 5);
    }

    #[test]
    fn test_vortex_layers_darken_center() {
        let mut canvas = Canvas::filled(200, 100, Srgba::WHITE);
        let center = Vec2::new(100.0, 50.0);
        draw_vortex(
            &mut canvas,
            center,
            Vec2::new(40.0, 20.0),
            0.0,
            [Srgba::BLACK, Srgba::BLACK, Srgba::BLACK],
            10,
        );
        let inside = canvas.get(100, 50).unwrap();
        let outside = canvas.get(5, 5).unwrap();
        assert!(inside.red < 0.1);
        assert_eq!(outside, Srgba::WHITE);
    }

    #[test]
    fn test_saturn_hexagon_marks_pole() {
        let mut rng = StdRng::seed_from_u64(9);
        let map = saturn(1024, 512, &mut rng);
        // Hexagon center is darker than the same latitude far from it
        let pole = map.rgba(512, 34).unwrap();
        let side = map.rgba(100, 34).unwrap();
        assert!(pole[0] < side[0] || pole[1] < side[1] || pole[2] < side[2]);
    }

    #[test]
    fn test_uranus_low_contrast() {
        let mut rng = StdRng::seed_from_u64(4);
        let map = uranus(128, 64, &mut rng);
        let (min, max) = map
            .data()
            .chunks_exact(4)
            .fold((255u8, 0u8), |(lo, hi), t| (lo.min(t[0]), hi.max(t[0])));
        assert!(max - min < 60);
    }
}
