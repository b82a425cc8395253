//! Procedural appearance for every body.
//!
//! Raster recipes run once per body and are cached in [`AppearanceCache`];
//! the star is an analytic field ([`StarField`]) sampled every frame.

pub mod banded;
pub mod canvas;
pub mod color;
pub mod earth;
pub mod noise;
pub mod raster;
pub mod rings;
pub mod rocky;
pub mod star;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bodies::{BodyId, UnknownBodyError};

pub use color::{Gradient, NEUTRAL_GRAY, TexelColor, gray, hex};
pub use raster::{Channel, RasterMap};
pub use rings::{RingError, RingKind, RingSpec, SubRing};
pub use star::{StarField, sample_star_field};

/// Errors from appearance lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("unknown body: {0:?}")]
    UnknownBody(String),
}

impl From<UnknownBodyError> for SynthesisError {
    fn from(err: UnknownBodyError) -> Self {
        SynthesisError::UnknownBody(err.0)
    }
}

/// Raster size and random seed for synthesis.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct TextureSettings {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 512,
            seed: 0x5013_A2E5,
        }
    }
}

/// Maps synthesized for one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyAppearanceMaps {
    pub albedo: RasterMap,
    pub elevation: Option<RasterMap>,
    pub reflectivity: Option<RasterMap>,
}

impl BodyAppearanceMaps {
    pub fn albedo_only(albedo: RasterMap) -> Self {
        Self {
            albedo,
            elevation: None,
            reflectivity: None,
        }
    }
}

/// Random stream for one body, independent of every other body.
pub fn body_rng(id: BodyId, seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ id.salt())
}

/// Run the recipe for `id`.
pub fn synthesize(id: BodyId, settings: &TextureSettings) -> BodyAppearanceMaps {
    let (w, h) = (settings.width.max(1), settings.height.max(1));
    let mut rng = body_rng(id, settings.seed);
    match id {
        BodyId::Sun => BodyAppearanceMaps::albedo_only(StarField::at(0.0).snapshot(w, h)),
        BodyId::Mercury => rocky::mercury(w, h, &mut rng),
        BodyId::Venus => BodyAppearanceMaps::albedo_only(banded::venus(w, h, &mut rng)),
        BodyId::Earth => earth::earth(w, h, &mut rng),
        BodyId::Mars => rocky::mars(w, h, &mut rng),
        BodyId::Jupiter => BodyAppearanceMaps::albedo_only(banded::jupiter(w, h, &mut rng)),
        BodyId::Saturn => BodyAppearanceMaps::albedo_only(banded::saturn(w, h, &mut rng)),
        BodyId::Uranus => BodyAppearanceMaps::albedo_only(banded::uranus(w, h, &mut rng)),
        BodyId::Neptune => BodyAppearanceMaps::albedo_only(banded::neptune(w, h, &mut rng)),
    }
}

/// Render every strip of a ring system.
pub fn synthesize_ring(spec: &RingSpec, seed: u64) -> Vec<RasterMap> {
    let salt = spec
        .name()
        .bytes()
        .fold(0xCBF2_9CE4_8422_2325u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01B3)
        });
    let mut rng = StdRng::seed_from_u64(seed ^ salt);
    rings::synthesize_ring(spec, &mut rng)
}

/// Process-lifetime cache of synthesized maps. Entries are never evicted.
#[derive(Resource, Default)]
pub struct AppearanceCache {
    settings: TextureSettings,
    bodies: HashMap<BodyId, Arc<BodyAppearanceMaps>>,
    /// Matched by equality on the whole spec
    rings: Vec<(RingSpec, Arc<Vec<RasterMap>>)>,
    fallback: Option<Arc<BodyAppearanceMaps>>,
}

impl AppearanceCache {
    pub fn new(settings: TextureSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    pub fn settings(&self) -> &TextureSettings {
        &self.settings
    }

    /// Maps for `id`, synthesized on first use.
    pub fn get(&mut self, id: BodyId) -> Arc<BodyAppearanceMaps> {
        if let Some(maps) = self.bodies.get(&id) {
            debug!("Appearance cache hit for {}", id);
            return Arc::clone(maps);
        }
        let started = Instant::now();
        let maps = Arc::new(synthesize(id, &self.settings));
        info!(
            "Synthesized {} appearance ({}x{}) in {:.1} ms",
            id,
            self.settings.width,
            self.settings.height,
            started.elapsed().as_secs_f64() * 1000.0
        );
        self.bodies.insert(id, Arc::clone(&maps));
        maps
    }

    /// Maps for a body named by its identifier, e.g. `"earth"`.
    pub fn get_appearance(&mut self, id: &str) -> Result<Arc<BodyAppearanceMaps>, SynthesisError> {
        let body: BodyId = id.parse()?;
        Ok(self.get(body))
    }

    /// Like [`Self::get_appearance`], but unknown bodies get a neutral gray map.
    pub fn get_or_fallback(&mut self, id: &str) -> Arc<BodyAppearanceMaps> {
        match self.get_appearance(id) {
            Ok(maps) => maps,
            Err(err) => {
                warn!("{}; using neutral gray fallback material", err);
                Arc::clone(self.fallback.get_or_insert_with(|| {
                    Arc::new(BodyAppearanceMaps::albedo_only(RasterMap::solid(
                        1,
                        1,
                        NEUTRAL_GRAY,
                    )))
                }))
            }
        }
    }

    /// Strips for a ring system. Two specs share strips only if they are equal.
    pub fn get_ring_maps(&mut self, spec: &RingSpec) -> Arc<Vec<RasterMap>> {
        if let Some((_, maps)) = self.rings.iter().find(|(cached, _)| cached == spec) {
            debug!("Ring cache hit for {}", spec.name());
            return Arc::clone(maps);
        }
        let started = Instant::now();
        let maps = Arc::new(synthesize_ring(spec, self.settings.seed));
        info!(
            "Synthesized {} ring strips for {} in {:.1} ms",
            maps.len(),
            spec.name(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        self.rings.push((spec.clone(), Arc::clone(&maps)));
        maps
    }

    /// Number of cached body entries.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TextureSettings {
        TextureSettings {
            width: 64,
            height: 32,
            seed: 7,
        }
    }

    #[test]
    fn test_unknown_body_error() {
        let mut cache = AppearanceCache::new(small());
        let err = cache.get_appearance("vulcan").unwrap_err();
        assert_eq!(err, SynthesisError::UnknownBody("vulcan".to_string()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fallback_is_gray() {
        let mut cache = AppearanceCache::new(small());
        let maps = cache.get_or_fallback("vulcan");
        assert_eq!(maps.albedo.rgba(0, 0), Some([204, 204, 204, 255]));
        assert!(Arc::ptr_eq(&maps, &cache.get_or_fallback("krypton")));
    }

    #[test]
    fn test_cache_shares_maps() {
        let mut cache = AppearanceCache::new(small());
        let a = cache.get(BodyId::Mars);
        let b = cache.get_appearance("mars").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_ring_cache() {
        let mut cache = AppearanceCache::new(small());
        let spec = RingSpec::neptune();
        let a = cache.get_ring_maps(&spec);
        let b = cache.get_ring_maps(&spec);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_ring_cache_tells_same_named_specs_apart() {
        let mut cache = AppearanceCache::new(small());
        let saturn = cache.get_ring_maps(&RingSpec::saturn());
        assert_eq!(saturn.len(), 10);

        let single = RingSpec::new(
            "Saturn",
            vec![SubRing::band("Only", 0.2, 0.6, 0.5, Srgba::WHITE)],
            256,
            8,
            1.4,
            2.3,
        )
        .unwrap();
        assert_eq!(cache.get_ring_maps(&single).len(), 1);

        let smooth = cache.get_ring_maps(&RingSpec::saturn().with_grain(false));
        assert!(!Arc::ptr_eq(&saturn, &smooth));
        assert!(Arc::ptr_eq(&saturn, &cache.get_ring_maps(&RingSpec::saturn())));
    }

    #[test]
    fn test_body_streams_differ() {
        use rand::Rng;
        let a: u64 = body_rng(BodyId::Earth, 1).r#gen();
        let b: u64 = body_rng(BodyId::Mars, 1).r#gen();
        assert_ne!(a, b);
    }
}
