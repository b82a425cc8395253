//! Floating-point drawing surface used by the raster recipes.
//!
//! Shapes are filled by testing texel centers (`x + 0.5`, `y + 0.5`) and
//! composited source-over. Everything outside the canvas is clipped.

use bevy::color::{ColorToPacked, Srgba};
use bevy::math::Vec2;

use super::color::{Gradient, NEUTRAL_GRAY, TexelColor};
use super::raster::{Channel, RasterMap};

/// How a shape is colored.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Srgba),
    /// Gradient along the segment `start → end`, clamped past either end
    Linear {
        start: Vec2,
        end: Vec2,
        gradient: Gradient,
    },
    /// Gradient from `inner` to `outer` radius around `center`
    Radial {
        center: Vec2,
        inner: f32,
        outer: f32,
        gradient: Gradient,
    },
}

impl Paint {
    /// Vertical linear gradient spanning rows `top..bottom`.
    pub fn vertical(top: f32, bottom: f32, gradient: Gradient) -> Self {
        Paint::Linear {
            start: Vec2::new(0.0, top),
            end: Vec2::new(0.0, bottom),
            gradient,
        }
    }

    /// Radial gradient from the center outwards.
    pub fn radial(center: Vec2, radius: f32, gradient: Gradient) -> Self {
        Paint::Radial {
            center,
            inner: 0.0,
            outer: radius,
            gradient,
        }
    }

    pub fn color_at(&self, p: Vec2) -> Srgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear {
                start,
                end,
                gradient,
            } => {
                let dir = *end - *start;
                let len2 = dir.length_squared();
                let t = if len2 > 0.0 {
                    (p - *start).dot(dir) / len2
                } else {
                    0.0
                };
                gradient.sample(t)
            }
            Paint::Radial {
                center,
                inner,
                outer,
                gradient,
            } => {
                let span = (outer - inner).max(f32::EPSILON);
                gradient.sample((p.distance(*center) - inner) / span)
            }
        }
    }
}

/// RGBA surface with straight alpha.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    texels: Vec<Srgba>,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Srgba::NONE)
    }

    pub fn filled(width: u32, height: u32, color: Srgba) -> Self {
        Self {
            width,
            height,
            texels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Srgba> {
        (x < self.width && y < self.height).then(|| self.texels[self.index(x, y)])
    }

    /// Composite `color` over the texel at `(x, y)`.
    pub fn blend(&mut self, x: u32, y: u32, color: Srgba) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.texels[i] = color.over(self.texels[i]);
        }
    }

    /// Paint the whole canvas.
    pub fn fill(&mut self, paint: &Paint) {
        self.fill_rect(0.0, 0.0, self.width as f32, self.height as f32, paint);
    }

    /// Clamp a float box to texel index ranges.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        let xa = x0.floor().max(0.0);
        let ya = y0.floor().max(0.0);
        let xb = x1.ceil().min(self.width as f32);
        let yb = y1.ceil().min(self.height as f32);
        (xa < xb && ya < yb).then_some((xa as u32, ya as u32, xb as u32, yb as u32))
    }

    /// Apply `inside` to every texel center in the box and paint the matching ones.
    fn fill_where(
        &mut self,
        bounds: (f32, f32, f32, f32),
        paint: &Paint,
        inside: impl Fn(Vec2) -> bool,
    ) {
        let Some((xa, ya, xb, yb)) = self.clip(bounds.0, bounds.1, bounds.2, bounds.3) else {
            return;
        };
        for y in ya..yb {
            for x in xa..xb {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(p) {
                    let c = paint.color_at(p);
                    self.blend(x, y, c);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        self.fill_where((x, y, x + w, y + h), paint, |p| {
            p.x >= x && p.x < x + w && p.y >= y && p.y < y + h
        });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let r2 = radius * radius;
        self.fill_where(
            (
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
            paint,
            |p| p.distance_squared(center) <= r2,
        );
    }

    /// Ellipse with radii `rx`, `ry` rotated by `rotation` radians.
    pub fn fill_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, rotation: f32, paint: &Paint) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (sin, cos) = rotation.sin_cos();
        let reach = rx.max(ry);
        self.fill_where(
            (
                center.x - reach,
                center.y - reach,
                center.x + reach,
                center.y + reach,
            ),
            paint,
            |p| {
                let d = p - center;
                let u = d.x * cos + d.y * sin;
                let v = -d.x * sin + d.y * cos;
                (u / rx).powi(2) + (v / ry).powi(2) <= 1.0
            },
        );
    }

    /// Closed polygon, even-odd rule.
    pub fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let (mut min, mut max) = (points[0], points[0]);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        let Some((xa, ya, xb, yb)) = self.clip(min.x, min.y, max.x, max.y) else {
            return;
        };

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in ya..yb {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy) != (b.y <= sy) {
                    crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                for x in xa..xb {
                    let sx = x as f32 + 0.5;
                    if sx >= span[0] && sx < span[1] {
                        let c = paint.color_at(Vec2::new(sx, sy));
                        self.blend(x, y, c);
                    }
                }
            }
        }
    }

    /// Replace every texel with `f(x, y, current)`.
    pub fn map_texels(&mut self, mut f: impl FnMut(u32, u32, Srgba) -> Srgba) {
        let width = self.width;
        for (i, t) in self.texels.iter_mut().enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            *t = f(x, y, *t);
        }
    }

    /// Number of texels with non-zero alpha.
    pub fn covered(&self) -> usize {
        self.texels.iter().filter(|t| t.alpha > 0.0).count()
    }

    /// Quantize into a raster. Scalar channels store the luma of each texel.
    pub fn into_raster(self, channel: Channel) -> RasterMap {
        let data: Vec<u8> = match channel.components() {
            4 => self.texels.iter().flat_map(|t| t.to_u8_array()).collect(),
            _ => self
                .texels
                .iter()
                .map(|t| (t.luma().clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
        };
        RasterMap::from_bytes(self.width, self.height, channel, data)
            .unwrap_or_else(|| RasterMap::solid(self.width, self.height, NEUTRAL_GRAY))
    }
}
