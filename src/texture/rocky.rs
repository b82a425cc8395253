//! Rocky, cratered surfaces: Mercury and Mars.

use std::ops::RangeInclusive;

use bevy::color::{Alpha, Srgba};
use bevy::math::Vec2;
use rand::Rng;

use super::BodyAppearanceMaps;
use super::canvas::{Canvas, Paint};
use super::color::{Gradient, TexelColor, gray, hex};
use super::noise::SineNoise;
use super::raster::Channel;

/// Mid-gray height that untouched terrain sits at.
const DATUM: f32 = 0.5;

/// How many craters Mercury gets, and their radius range as fractions of the height.
const MERCURY_CRATERS: RangeInclusive<usize> = 120..=200;
const MERCURY_CRATER_RADIUS: (f32, f32) = (0.004, 0.03);

/// A circular impact site in texel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crater {
    pub center: Vec2,
    pub radius: f32,
}

impl Crater {
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Color ramps of a crater from its center (0) to its outer rim (1).
#[derive(Clone, Debug)]
pub struct CraterShading {
    pub color: Gradient,
    pub height: Gradient,
}

impl Default for CraterShading {
    fn default() -> Self {
        let dark = Srgba::BLACK;
        let rim = Srgba::WHITE;
        Self {
            color: Gradient::new([
                (0.0, dark.with_alpha(0.45)),
                (0.7, dark.with_alpha(0.25)),
                (0.85, rim.with_alpha(0.3)),
                (1.0, rim.with_alpha(0.0)),
            ]),
            height: Gradient::new([
                (0.0, dark.with_alpha(0.6)),
                (0.7, dark.with_alpha(0.2)),
                (0.85, rim.with_alpha(0.5)),
                (1.0, rim.with_alpha(0.0)),
            ]),
        }
    }
}

/// Random crater sites; radii are fractions of the canvas height.
pub fn scatter_craters(
    rng: &mut impl Rng,
    width: u32,
    height: u32,
    count: RangeInclusive<usize>,
    radius: (f32, f32),
) -> Vec<Crater> {
    let n = rng.gen_range(count);
    let h = height as f32;
    (0..n)
        .map(|_| Crater {
            center: Vec2::new(
                rng.gen_range(0.0..width as f32),
                rng.gen_range(0.0..h),
            ),
            radius: rng.gen_range(radius.0 * h..=radius.1 * h).max(1.0),
        })
        .collect()
}

/// Stamp each crater as a radial gradient: dark floor, bright rim annulus.
pub fn stamp_craters(canvas: &mut Canvas, craters: &[Crater], ramp: &Gradient) {
    for c in craters {
        let paint = Paint::radial(c.center, c.radius, ramp.clone());
        canvas.fill_circle(c.center, c.radius, &paint);
    }
}

/// Latitude gradient roughened by 3-octave sine noise.
fn rough_surface(
    width: u32,
    height: u32,
    rng: &mut impl Rng,
    latitude: Gradient,
    roughness: f32,
) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    canvas.fill(&Paint::vertical(0.0, height as f32, latitude));

    let noise = SineNoise::new(rng, 24.0 / height as f32);
    canvas.map_texels(|x, y, c| c.scale_rgb(1.0 + roughness * noise.sample(x as f32, y as f32)));
    canvas
}

pub fn mercury(width: u32, height: u32, rng: &mut impl Rng) -> BodyAppearanceMaps {
    let mut color = rough_surface(
        width,
        height,
        rng,
        Gradient::new([
            (0.0, hex(0x9E9A94)),
            (0.5, hex(0xB8B8B8)),
            (1.0, hex(0xA09C96)),
        ]),
        0.18,
    );
    let mut elevation = Canvas::filled(width, height, gray(DATUM));

    let craters = scatter_craters(rng, width, height, MERCURY_CRATERS, MERCURY_CRATER_RADIUS);
    let shading = CraterShading::default();
    stamp_craters(&mut color, &craters, &shading.color);
    stamp_craters(&mut elevation, &craters, &shading.height);

    BodyAppearanceMaps {
        albedo: color.into_raster(Channel::Color),
        elevation: Some(elevation.into_raster(Channel::Elevation)),
        reflectivity: None,
    }
}

/// Broad shield volcano: raised, slightly lighter.
fn stamp_dome(color: &mut Canvas, elevation: &mut Canvas, center: Vec2, radius: f32) {
    let tint = hex(0xD88A6A);
    color.fill_circle(
        center,
        radius,
        &Paint::radial(
            center,
            radius,
            Gradient::two(tint.with_alpha(0.6), tint.with_alpha(0.0)),
        ),
    );
    elevation.fill_circle(
        center,
        radius,
        &Paint::radial(
            center,
            radius,
            Gradient::two(Srgba::WHITE.with_alpha(0.9), Srgba::WHITE.with_alpha(0.0)),
        ),
    );
}

/// Long rift valley: a rectangle darkest along its axis.
fn stamp_canyon(color: &mut Canvas, elevation: &mut Canvas, origin: Vec2, size: Vec2) {
    let (top, bottom) = (origin.y, origin.y + size.y);
    let across = |c: Srgba, a: f32| {
        Paint::vertical(
            top,
            bottom,
            Gradient::new([
                (0.0, c.with_alpha(0.0)),
                (0.5, c.with_alpha(a)),
                (1.0, c.with_alpha(0.0)),
            ]),
        )
    };
    color.fill_rect(
        origin.x,
        origin.y,
        size.x,
        size.y,
        &across(hex(0x5A2A1E), 0.85),
    );
    elevation.fill_rect(origin.x, origin.y, size.x, size.y, &across(Srgba::BLACK, 0.9));
}

pub fn mars(width: u32, height: u32, rng: &mut impl Rng) -> BodyAppearanceMaps {
    let (w, h) = (width as f32, height as f32);
    let mut color = rough_surface(
        width,
        height,
        rng,
        Gradient::new([
            (0.0, hex(0xE8D8D0)),
            (0.06, hex(0xB5523B)),
            (0.5, hex(0xCD5C5C)),
            (0.94, hex(0xA0452E)),
            (1.0, hex(0xE8D8D0)),
        ]),
        0.15,
    );
    let mut elevation = Canvas::filled(width, height, gray(DATUM));

    let craters = scatter_craters(rng, width, height, 30..=80, (0.006, 0.035));
    let shading = CraterShading::default();
    stamp_craters(&mut color, &craters, &shading.color);
    stamp_craters(&mut elevation, &craters, &shading.height);

    let domes = rng.gen_range(2..=3);
    for _ in 0..domes {
        let center = Vec2::new(rng.gen_range(0.1..0.5) * w, rng.gen_range(0.3..0.55) * h);
        let radius = rng.gen_range(0.04..0.07) * h;
        stamp_dome(&mut color, &mut elevation, center, radius);
    }

    let origin = Vec2::new(rng.gen_range(0.45..0.6) * w, rng.gen_range(0.5..0.58) * h);
    let size = Vec2::new(rng.gen_range(0.2..0.3) * w, rng.gen_range(0.025..0.04) * h);
    stamp_canyon(&mut color, &mut elevation, origin, size);

    BodyAppearanceMaps {
        albedo: color.into_raster(Channel::Color),
        elevation: Some(elevation.into_raster(Channel::Elevation)),
        reflectivity: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_mercury_crater_count_is_stable() {
        let count = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            scatter_craters(&mut rng, 1024, 512, MERCURY_CRATERS, MERCURY_CRATER_RADIUS).len()
        };
        let n = count(42);
        assert_eq!(n, count(42));
        assert!(MERCURY_CRATERS.contains(&n));
    }

    #[test]
    fn test_stamps_leave_untouched_texels() {
        let mut rng = StdRng::seed_from_u64(42);
        let craters =
            scatter_craters(&mut rng, 1024, 512, MERCURY_CRATERS, MERCURY_CRATER_RADIUS);
        let mut canvas = Canvas::new(1024, 512);
        stamp_craters(&mut canvas, &craters, &CraterShading::default().color);

        let outside = (0..512u32)
            .flat_map(|y| (0..1024u32).map(move |x| (x, y)))
            .find(|&(x, y)| {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                craters.iter().all(|c| !c.contains(p))
            });
        let (x, y) = outside.expect("canvas is far larger than all craters");
        assert_eq!(canvas.get(x, y), Some(Srgba::NONE));
        assert!(canvas.covered() > 0);
        assert!(canvas.covered() < (1024 * 512) / 2);
    }

    #[test]
    fn test_crater_floor_is_dark_and_low() {
        let crater = Crater {
            center: Vec2::new(32.0, 32.0),
            radius: 20.0,
        };
        let shading = CraterShading::default();
        let mut color = Canvas::filled(64, 64, gray(0.6));
        let mut height = Canvas::filled(64, 64, gray(DATUM));
        stamp_craters(&mut color, &[crater], &shading.color);
        stamp_craters(&mut height, &[crater], &shading.height);

        assert!(color.get(32, 32).unwrap().red < 0.6);
        assert!(height.get(32, 32).unwrap().red < DATUM);
        // Rim sits at 0.85 of the radius
        assert!(height.get(32 + 17, 32).unwrap().red > DATUM);
    }

    #[test]
    fn test_mercury_maps_are_cratered() {
        let mut rng = StdRng::seed_from_u64(7);
        let maps = mercury(256, 128, &mut rng);
        assert_eq!((maps.albedo.width(), maps.albedo.height()), (256, 128));
        let elevation = maps.elevation.expect("mercury has relief");
        // Crater floors sink well below the datum, rims rise above it
        let datum = (DATUM * 255.0).round() as u8;
        assert!(elevation.data().iter().any(|&v| v < datum - 40));
        assert!(elevation.data().iter().any(|&v| v > datum));
        assert!(maps.reflectivity.is_none());
    }

    #[test]
    fn test_mars_maps() {
        let mut rng = StdRng::seed_from_u64(7);
        let maps = mars(256, 128, &mut rng);
        assert_eq!(maps.albedo.width(), 256);
        let elevation = maps.elevation.expect("mars has relief");
        assert_eq!(elevation.channel(), Channel::Elevation);
        assert!(maps.reflectivity.is_none());
    }
}
