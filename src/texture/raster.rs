//! Immutable texel grids handed to the scene layer.

use bevy::color::{ColorToPacked, Srgba};

/// What the texels of a [`RasterMap`] mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// RGBA8 surface color
    Color,
    /// One byte of height per texel, 0 = lowest
    Elevation,
    /// One byte of specular reflectivity per texel
    Reflectivity,
    /// RGBA8 ring strip whose alpha carries the band profile
    RingAlpha,
}

impl Channel {
    /// Bytes per texel.
    pub fn components(&self) -> usize {
        match self {
            Channel::Color | Channel::RingAlpha => 4,
            Channel::Elevation | Channel::Reflectivity => 1,
        }
    }
}

/// Fixed-size grid of texels for one visual channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterMap {
    width: u32,
    height: u32,
    channel: Channel,
    data: Vec<u8>,
}

impl RasterMap {
    /// Wrap raw texel bytes. Returns `None` when the buffer size does not match.
    pub fn from_bytes(width: u32, height: u32, channel: Channel, data: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * channel.components();
        (data.len() == expected).then_some(Self {
            width,
            height,
            channel,
            data,
        })
    }

    /// A map filled with a single color.
    pub fn solid(width: u32, height: u32, color: Srgba) -> Self {
        let texel = color.to_u8_array();
        let data = texel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            channel: Channel::Color,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Raw bytes of the texel at `(x, y)`.
    pub fn texel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let n = self.channel.components();
        let start = (y as usize * self.width as usize + x as usize) * n;
        self.data.get(start..start + n)
    }

    /// Texel as RGBA8; scalar channels expand to opaque gray.
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let t = self.texel(x, y)?;
        Some(match *t {
            [v] => [v, v, v, 255],
            [r, g, b, a] => [r, g, b, a],
            _ => return None,
        })
    }

    /// Whole map as RGBA8, expanding scalar channels.
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.channel.components() {
            4 => self.data.clone(),
            _ => self.data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::color::NEUTRAL_GRAY;

    #[test]
    fn test_from_bytes_checks_length() {
        assert!(RasterMap::from_bytes(2, 2, Channel::Elevation, vec![0; 4]).is_some());
        assert!(RasterMap::from_bytes(2, 2, Channel::Color, vec![0; 4]).is_none());
    }

    #[test]
    fn test_texel_lookup() {
        let map = RasterMap::from_bytes(2, 1, Channel::Reflectivity, vec![10, 200]).unwrap();
        assert_eq!(map.texel(1, 0), Some(&[200u8][..]));
        assert_eq!(map.texel(2, 0), None);
        assert_eq!(map.rgba(0, 0), Some([10, 10, 10, 255]));
    }

    #[test]
    fn test_solid_and_expand() {
        let map = RasterMap::solid(3, 2, NEUTRAL_GRAY);
        assert_eq!(map.data().len(), 3 * 2 * 4);
        assert_eq!(map.rgba(2, 1), Some([204, 204, 204, 255]));

        let scalar = RasterMap::from_bytes(1, 1, Channel::Elevation, vec![7]).unwrap();
        assert_eq!(scalar.to_rgba8(), vec![7, 7, 7, 255]);
    }
}
