//! Color helpers for the synthesizer, on top of Bevy's [`Srgba`].
//!
//! Texels are straight (non-premultiplied) alpha with every channel in
//! [0, 1]. Blending and ramps work on the sRGB-encoded components, the same
//! space the maps are uploaded in.

use bevy::color::{Mix, Srgba};

/// Neutral gray used when a body has no recipe.
pub const NEUTRAL_GRAY: Srgba = hex(0xCCCCCC);

/// Opaque color from a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> Srgba {
    Srgba::rgb(
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
    )
}

/// Opaque gray; scalar maps store their value in every color channel.
pub const fn gray(v: f32) -> Srgba {
    Srgba::rgb(v, v, v)
}

/// Texel arithmetic Bevy's color traits don't cover.
pub trait TexelColor: Sized {
    /// Multiply the color channels, keeping alpha.
    fn scale_rgb(self, k: f32) -> Self;
    /// Shift every channel by `percent` of full scale, in 8-bit steps of 2.55 per percent.
    fn adjust_brightness(self, percent: f32) -> Self;
    fn clamped(self) -> Self;
    /// Composite `self` over `dst` (source-over).
    fn over(self, dst: Self) -> Self;
    /// Rec. 601 luma of the encoded channels.
    fn luma(self) -> f32;
}

impl TexelColor for Srgba {
    fn scale_rgb(self, k: f32) -> Self {
        Srgba::new(self.red * k, self.green * k, self.blue * k, self.alpha).clamped()
    }

    fn adjust_brightness(self, percent: f32) -> Self {
        let amt = (2.55 * percent).round() / 255.0;
        Srgba::new(self.red + amt, self.green + amt, self.blue + amt, self.alpha).clamped()
    }

    fn clamped(self) -> Self {
        Srgba::new(
            self.red.clamp(0.0, 1.0),
            self.green.clamp(0.0, 1.0),
            self.blue.clamp(0.0, 1.0),
            self.alpha.clamp(0.0, 1.0),
        )
    }

    fn over(self, dst: Self) -> Self {
        let sa = self.alpha.clamp(0.0, 1.0);
        if sa >= 1.0 {
            return self;
        }
        if sa <= 0.0 {
            return dst;
        }
        let da = dst.alpha * (1.0 - sa);
        let out_a = sa + da;
        Srgba::new(
            (self.red * sa + dst.red * da) / out_a,
            (self.green * sa + dst.green * da) / out_a,
            (self.blue * sa + dst.blue * da) / out_a,
            out_a,
        )
    }

    fn luma(self) -> f32 {
        0.299 * self.red + 0.587 * self.green + 0.114 * self.blue
    }
}

/// Color ramp with stops at offsets in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: Vec<(f32, Srgba)>,
}

impl Gradient {
    /// Build a gradient; stops are sorted by offset.
    pub fn new(stops: impl IntoIterator<Item = (f32, Srgba)>) -> Self {
        let mut stops: Vec<(f32, Srgba)> = stops.into_iter().collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    pub fn two(from: Srgba, to: Srgba) -> Self {
        Self::new([(0.0, from), (1.0, to)])
    }

    /// `color → brightened → color`, used for every horizontal band.
    pub fn band(color: Srgba, brighten_percent: f32) -> Self {
        Self::new([
            (0.0, color),
            (0.5, color.adjust_brightness(brighten_percent)),
            (1.0, color),
        ])
    }

    /// Color at `t`, clamped to the end stops.
    pub fn sample(&self, t: f32) -> Srgba {
        let Some(&(first_t, first)) = self.stops.first() else {
            return Srgba::NONE;
        };
        if t <= first_t {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return c1;
                }
                return c0.mix(&c1, (t - t0) / span);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::color::{Alpha, ColorToPacked};

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xFF8000).to_u8_array(), [255, 128, 0, 255]);
        assert_eq!(hex(0xFDB813), Srgba::rgb_u8(0xFD, 0xB8, 0x13));
    }

    #[test]
    fn test_adjust_brightness_clamps() {
        let c = hex(0xF0F0F0).adjust_brightness(20.0);
        assert_eq!(c.to_u8_array(), [255, 255, 255, 255]);

        let d = hex(0x101010).adjust_brightness(-20.0);
        assert_eq!(d.to_u8_array(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_adjust_brightness_step() {
        // 10% is round(25.5) = 26 levels
        let c = hex(0x646464).adjust_brightness(10.0);
        assert_eq!(c.to_u8_array()[0], 100 + 26);
    }

    #[test]
    fn test_over_opaque_and_transparent() {
        let red = hex(0xFF0000);
        let blue = hex(0x0000FF);
        assert_eq!(red.over(blue), red);
        assert_eq!(Srgba::NONE.over(blue), blue);
    }

    #[test]
    fn test_over_half() {
        let white = Srgba::WHITE.with_alpha(0.5);
        let out = white.over(Srgba::BLACK);
        assert_relative_eq!(out.red, 0.5, epsilon = 1e-6);
        assert_relative_eq!(out.alpha, 1.0, epsilon = 1e-6);

        // Onto a transparent destination the source color survives unchanged
        let onto_clear = white.over(Srgba::NONE);
        assert_relative_eq!(onto_clear.red, 1.0, epsilon = 1e-6);
        assert_relative_eq!(onto_clear.alpha, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_gray_luma_is_identity() {
        assert_relative_eq!(gray(0.3).luma(), 0.3, epsilon = 1e-6);
        assert_relative_eq!(hex(0x808080).scale_rgb(0.5).red, 0.251, epsilon = 1e-3);
    }

    #[test]
    fn test_gradient_sampling() {
        let g = Gradient::new([(1.0, Srgba::WHITE), (0.0, Srgba::BLACK)]);
        assert_eq!(g.sample(-1.0), Srgba::BLACK);
        assert_eq!(g.sample(2.0), Srgba::WHITE);
        assert_relative_eq!(g.sample(0.25).red, 0.25, epsilon = 1e-6);
        assert_eq!(Gradient::new([]).sample(0.5), Srgba::NONE);
    }

    #[test]
    fn test_band_gradient_peaks_in_middle() {
        let g = Gradient::band(hex(0x808080), 20.0);
        assert!(g.sample(0.5).red > g.sample(0.0).red);
        assert_eq!(g.sample(0.0), g.sample(1.0));
    }
}
