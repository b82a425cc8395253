//! Sine-based noise used to roughen bands and surfaces.

use rand::Rng;
use std::f32::consts::TAU;

/// One sine term of a [`Turbulence`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Harmonic {
    /// Cycles per texel
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
}

/// 1D turbulence: a sum of 2 to 4 sine harmonics.
#[derive(Clone, Debug, PartialEq)]
pub struct Turbulence {
    harmonics: Vec<Harmonic>,
}

impl Turbulence {
    pub const MIN_HARMONICS: usize = 2;
    pub const MAX_HARMONICS: usize = 4;

    /// Harmonics are truncated to four; fewer than two are accepted as-is.
    pub fn new(mut harmonics: Vec<Harmonic>) -> Self {
        harmonics.truncate(Self::MAX_HARMONICS);
        Self { harmonics }
    }

    /// Random harmonics with frequency roughly doubling and amplitude halving per term.
    ///
    /// # Arguments
    /// * `count` - number of harmonics, clamped to 2..=4
    /// * `base_frequency` - cycles per texel of the first harmonic
    /// * `amplitude` - peak offset of the first harmonic in texels
    pub fn random(rng: &mut impl Rng, count: usize, base_frequency: f32, amplitude: f32) -> Self {
        let count = count.clamp(Self::MIN_HARMONICS, Self::MAX_HARMONICS);
        let harmonics = (0..count)
            .map(|i| {
                let octave = 2f32.powi(i as i32);
                Harmonic {
                    frequency: base_frequency * octave * rng.gen_range(0.8..1.25),
                    amplitude: amplitude / octave,
                    phase: rng.gen_range(0.0..TAU),
                }
            })
            .collect();
        Self { harmonics }
    }

    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// Upper bound of `|sample(x)|`.
    pub fn peak(&self) -> f32 {
        self.harmonics.iter().map(|h| h.amplitude.abs()).sum()
    }

    pub fn sample(&self, x: f32) -> f32 {
        self.harmonics
            .iter()
            .map(|h| h.amplitude * (x * h.frequency * TAU + h.phase).sin())
            .sum()
    }
}

/// 2D sine-product noise with three octaves, normalized to [-1, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineNoise {
    frequency: f32,
    phases: [(f32, f32); 3],
}

impl SineNoise {
    pub const OCTAVES: usize = 3;

    pub fn new(rng: &mut impl Rng, frequency: f32) -> Self {
        let mut phases = [(0.0, 0.0); Self::OCTAVES];
        for p in &mut phases {
            *p = (rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU));
        }
        Self { frequency, phases }
    }

    /// Octaves halve in amplitude and double in frequency.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        for &(px, py) in &self.phases {
            total += amplitude * (x * frequency + px).sin() * (y * frequency + py).sin();
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        total / norm
    }
}
