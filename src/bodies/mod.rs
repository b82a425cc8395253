//! Static configuration for the bodies of the scene.
//!
//! Distances, radii and rates are in scene units and seconds, tuned for a
//! readable view rather than physical scale.

mod data;

pub use data::{BodyConfig, MOON_ROTATION_PER_FRAME, MoonConfig, body_config};

use std::fmt;
use std::str::FromStr;

/// Identifier for bodies in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

/// Error for identifiers outside the body enumeration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown body: {0:?}")]
pub struct UnknownBodyError(pub String);

impl BodyId {
    /// Every body, star first, then planets outward.
    pub const ALL: &'static [BodyId] = &[
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
    ];

    /// All planets (not including the Sun)
    pub const PLANETS: &'static [BodyId] = &[
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
    ];

    /// Lowercase identifier used by configuration and lookups.
    pub fn key(&self) -> &'static str {
        match self {
            BodyId::Sun => "sun",
            BodyId::Mercury => "mercury",
            BodyId::Venus => "venus",
            BodyId::Earth => "earth",
            BodyId::Mars => "mars",
            BodyId::Jupiter => "jupiter",
            BodyId::Saturn => "saturn",
            BodyId::Uranus => "uranus",
            BodyId::Neptune => "neptune",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            BodyId::Sun => "Sun",
            BodyId::Mercury => "Mercury",
            BodyId::Venus => "Venus",
            BodyId::Earth => "Earth",
            BodyId::Mars => "Mars",
            BodyId::Jupiter => "Jupiter",
            BodyId::Saturn => "Saturn",
            BodyId::Uranus => "Uranus",
            BodyId::Neptune => "Neptune",
        }
    }

    pub fn is_star(&self) -> bool {
        matches!(self, BodyId::Sun)
    }

    /// Stable per-body value mixed into seeds so bodies never share a random stream.
    pub fn salt(&self) -> u64 {
        (*self as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyId {
    type Err = UnknownBodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if key == "star" {
            return Ok(BodyId::Sun);
        }
        BodyId::ALL
            .iter()
            .copied()
            .find(|id| id.key() == key)
            .ok_or_else(|| UnknownBodyError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_bodies() {
        for &id in BodyId::ALL {
            assert_eq!(id.key().parse::<BodyId>(), Ok(id));
        }
        assert_eq!("Earth".parse::<BodyId>(), Ok(BodyId::Earth));
        assert_eq!("star".parse::<BodyId>(), Ok(BodyId::Sun));
    }

    #[test]
    fn test_parse_unknown_body() {
        let err = "unknown-body".parse::<BodyId>().unwrap_err();
        assert_eq!(err, UnknownBodyError("unknown-body".to_string()));
        assert!(err.to_string().contains("unknown-body"));
        assert!("pluto".parse::<BodyId>().is_err());
    }

    #[test]
    fn test_salts_are_distinct() {
        let mut salts: Vec<u64> = BodyId::ALL.iter().map(|id| id.salt()).collect();
        salts.sort_unstable();
        salts.dedup();
        assert_eq!(salts.len(), BodyId::ALL.len());
    }
}
