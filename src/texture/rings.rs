//! Ring systems: hand-authored sub-ring tables and their alpha strips.
//!
//! Sub-ring intervals are normalized to [0, 1] across the ring annulus, 0 at
//! the inner edge. Each sub-ring is rendered into its own strip whose x axis
//! runs outwards across the sub-ring.

use bevy::color::{Alpha, Srgba};
use bevy::log::warn;
use rand::Rng;

use super::canvas::{Canvas, Paint};
use super::color::{Gradient, hex};
use super::raster::{Channel, RasterMap};
use crate::bodies::BodyId;

/// Slack when comparing interval edges authored as decimals.
const EDGE_EPSILON: f32 = 1e-5;

/// Probability that a 2×2 grain cell gets a speck.
const GRAIN_DENSITY: f64 = 0.3;
/// Strongest alpha of a speck.
const GRAIN_ALPHA: f32 = 0.3;

/// Errors raised when building a [`RingSpec`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RingError {
    #[error("sub-ring {name:?} has an invalid interval or opacity")]
    InvalidInterval { name: String },
    #[error("sub-ring {next:?} overlaps {previous:?}")]
    Overlap { previous: String, next: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingKind {
    Band,
    /// Materially transparent division between bands
    Gap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubRing {
    pub name: String,
    pub start: f32,
    pub width: f32,
    pub opacity: f32,
    pub color: Srgba,
    pub kind: RingKind,
}

impl SubRing {
    pub fn band(name: &str, start: f32, end: f32, opacity: f32, color: Srgba) -> Self {
        Self {
            name: name.to_string(),
            start,
            width: end - start,
            opacity,
            color,
            kind: RingKind::Band,
        }
    }

    pub fn gap(name: &str, start: f32, end: f32) -> Self {
        Self {
            name: name.to_string(),
            start,
            width: end - start,
            opacity: 0.0,
            color: Srgba::NONE,
            kind: RingKind::Gap,
        }
    }

    /// Ringlet centered at `position`.
    pub fn ringlet(name: &str, position: f32, width: f32, opacity: f32, color: Srgba) -> Self {
        Self::band(
            name,
            position - width * 0.5,
            position + width * 0.5,
            opacity,
            color,
        )
    }

    pub fn end(&self) -> f32 {
        self.start + self.width
    }

    fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.width.is_finite()
            && self.start >= -EDGE_EPSILON
            && self.width > 0.0
            && self.end() <= 1.0 + EDGE_EPSILON
            && (0.0..=1.0).contains(&self.opacity)
    }
}

/// An ordered, validated ring system.
#[derive(Clone, Debug, PartialEq)]
pub struct RingSpec {
    name: String,
    sub_rings: Vec<SubRing>,
    /// Texels across the full normalized span
    resolution: u32,
    strip_height: u32,
    /// Inner and outer edge in planet radii
    inner_radius: f32,
    outer_radius: f32,
    grain: bool,
}

impl RingSpec {
    /// Validate and build a ring system. Sub-rings must be in increasing order.
    pub fn new(
        name: &str,
        sub_rings: Vec<SubRing>,
        resolution: u32,
        strip_height: u32,
        inner_radius: f32,
        outer_radius: f32,
    ) -> Result<Self, RingError> {
        if sub_rings.is_empty()
            || resolution == 0
            || strip_height == 0
            || !(inner_radius > 0.0 && outer_radius > inner_radius)
        {
            return Err(RingError::InvalidInterval {
                name: name.to_string(),
            });
        }
        for ring in &sub_rings {
            if !ring.is_valid() {
                return Err(RingError::InvalidInterval {
                    name: ring.name.clone(),
                });
            }
        }
        for pair in sub_rings.windows(2) {
            if pair[1].start < pair[0].end() - EDGE_EPSILON {
                return Err(RingError::Overlap {
                    previous: pair[0].name.clone(),
                    next: pair[1].name.clone(),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            sub_rings,
            resolution,
            strip_height,
            inner_radius,
            outer_radius,
            grain: true,
        })
    }

    /// Enable or disable the speckle grain.
    pub fn with_grain(mut self, grain: bool) -> Self {
        self.grain = grain;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sub_rings(&self) -> &[SubRing] {
        &self.sub_rings
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn strip_height(&self) -> u32 {
        self.strip_height
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    pub fn grain(&self) -> bool {
        self.grain
    }

    /// Radius (in planet radii) of a normalized ring position.
    pub fn radius_at(&self, t: f32) -> f32 {
        self.inner_radius + (self.outer_radius - self.inner_radius) * t
    }

    /// Ring preset for a body, if it has rings.
    pub fn for_body(id: BodyId) -> Option<RingSpec> {
        match id {
            BodyId::Saturn => Some(Self::saturn()),
            BodyId::Uranus => Some(Self::uranus()),
            BodyId::Neptune => Some(Self::neptune()),
            _ => None,
        }
    }

    /// Saturn's C, B and A rings with their divisions and the faint F halo.
    pub fn saturn() -> RingSpec {
        let rings = vec![
            SubRing::band("C Ring", 0.0, 0.15, 0.7, hex(0xD4A76A)),
            SubRing::gap("Maxwell Gap", 0.15, 0.18),
            SubRing::band("B Ring Inner", 0.18, 0.35, 0.8, hex(0xE5C995)),
            SubRing::gap("B Ring Gap", 0.35, 0.37),
            SubRing::band("B Ring Outer", 0.37, 0.55, 0.9, hex(0xF5E6D3)),
            SubRing::gap("Cassini Division", 0.55, 0.57),
            SubRing::band("A Ring", 0.57, 0.75, 0.6, hex(0xC8B88B)),
            SubRing::gap("Encke Gap", 0.75, 0.76),
            SubRing::band("A Ring Outer", 0.76, 0.90, 0.4, hex(0xA0826D)),
            SubRing::band("F Ring Halo", 0.90, 1.0, 0.2, hex(0x8B7355)),
        ];
        Self::preset("Saturn", rings, 2048, 64, 1.4, 2.3)
    }

    /// Uranus' narrow dark ringlets.
    pub fn uranus() -> RingSpec {
        let color = Srgba::rgb_u8(100, 120, 140);
        let rings = [
            ("6 Ring", 0.2, 0.02, 0.6),
            ("5 Ring", 0.3, 0.01, 0.4),
            ("4 Ring", 0.4, 0.02, 0.5),
            ("Alpha Ring", 0.5, 0.01, 0.3),
            ("Beta Ring", 0.6, 0.03, 0.7),
            ("Eta Ring", 0.7, 0.01, 0.4),
            ("Gamma Ring", 0.8, 0.02, 0.5),
            ("Epsilon Ring", 0.9, 0.01, 0.3),
        ]
        .into_iter()
        .map(|(name, position, width, opacity)| {
            SubRing::ringlet(name, position, width, opacity, color)
        })
        .collect();
        Self::preset("Uranus", rings, 1024, 32, 1.6, 2.1)
    }

    /// Neptune's five faint ringlets.
    pub fn neptune() -> RingSpec {
        let color = Srgba::rgb_u8(110, 110, 125);
        let rings = vec![
            SubRing::band("Galle", 0.05, 0.15, 0.15, color),
            SubRing::band("Le Verrier", 0.38, 0.40, 0.35, color),
            SubRing::band("Lassell", 0.42, 0.70, 0.1, color),
            SubRing::band("Arago", 0.72, 0.735, 0.2, color),
            SubRing::band("Adams", 0.88, 0.91, 0.45, color),
        ];
        Self::preset("Neptune", rings, 1024, 32, 1.7, 2.6)
    }

    /// Build one of the authored tables, which are known to be well formed.
    fn preset(
        name: &str,
        sub_rings: Vec<SubRing>,
        resolution: u32,
        strip_height: u32,
        inner: f32,
        outer: f32,
    ) -> RingSpec {
        match Self::new(name, sub_rings.clone(), resolution, strip_height, inner, outer) {
            Ok(spec) => spec,
            Err(err) => {
                warn!("Ring preset {} failed validation ({}); using it unchecked", name, err);
                Self {
                    name: name.to_string(),
                    sub_rings,
                    resolution,
                    strip_height,
                    inner_radius: inner,
                    outer_radius: outer,
                    grain: true,
                }
            }
        }
    }
}

/// Alpha across a band strip: 0 → full at 10% → full at 90% → 0.
fn band_profile(opacity: f32) -> Gradient {
    let c = Srgba::WHITE;
    Gradient::new([
        (0.0, c.with_alpha(0.0)),
        (0.1, c.with_alpha(opacity)),
        (0.5, c.with_alpha(opacity)),
        (0.9, c.with_alpha(opacity)),
        (1.0, c.with_alpha(0.0)),
    ])
}

/// Render one strip per sub-ring, in table order.
pub fn synthesize_ring(spec: &RingSpec, rng: &mut impl Rng) -> Vec<RasterMap> {
    spec.sub_rings()
        .iter()
        .map(|ring| synthesize_strip(spec, ring, rng))
        .collect()
}

fn synthesize_strip(spec: &RingSpec, ring: &SubRing, rng: &mut impl Rng) -> RasterMap {
    let width = ((ring.width * spec.resolution() as f32).round() as u32).max(1);
    let height = spec.strip_height();
    let mut canvas = Canvas::new(width, height);
    if ring.kind == RingKind::Gap {
        return canvas.into_raster(Channel::RingAlpha);
    }

    let profile = band_profile(ring.opacity);
    let tinted = Gradient::new(
        [0.0, 0.1, 0.5, 0.9, 1.0].map(|t| (t, ring.color.with_alpha(profile.sample(t).alpha))),
    );
    canvas.fill(&Paint::Linear {
        start: bevy::math::Vec2::ZERO,
        end: bevy::math::Vec2::new(width as f32, 0.0),
        gradient: tinted,
    });

    if spec.grain() {
        for y in (0..height).step_by(2) {
            for x in (0..width).step_by(2) {
                if rng.gen_bool(GRAIN_DENSITY) {
                    let a = rng.gen_range(0.0..GRAIN_ALPHA);
                    canvas.blend(x, y, Srgba::WHITE.with_alpha(a));
                }
            }
        }
    }
    canvas.into_raster(Channel::RingAlpha)
}
