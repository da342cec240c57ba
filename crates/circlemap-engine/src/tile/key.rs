use std::fmt;
use std::sync::Arc;

/// Identity of the style layer a contribution was built for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(Arc<str>);

impl LayerId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Address of a tile in the pyramid, including overscaling and world copy.
///
/// `wrap` distinguishes copies of the same canonical tile across the
/// antimeridian; two copies are different contributions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileAddress {
    pub overscaled_z: u8,
    pub wrap: i16,
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileAddress {
    #[inline]
    pub const fn new(z: u8, x: u32, y: u32) -> Self {
        Self { overscaled_z: z, wrap: 0, z, x, y }
    }

    #[inline]
    pub const fn with_wrap(mut self, wrap: i16) -> Self {
        self.wrap = wrap;
        self
    }

    /// Requests data beyond the source max zoom; `overscaled_z` must be >= `z`.
    #[inline]
    pub fn overscaled(mut self, overscaled_z: u8) -> Self {
        debug_assert!(overscaled_z >= self.z, "overscaled zoom below canonical zoom");
        self.overscaled_z = overscaled_z;
        self
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)?;
        if self.overscaled_z != self.z {
            write!(f, "@{}", self.overscaled_z)?;
        }
        if self.wrap != 0 {
            write!(f, "~{}", self.wrap)?;
        }
        Ok(())
    }
}

/// Unique key of one tile's contribution: layer + tile address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    pub layer: LayerId,
    pub tile: TileAddress,
}

impl TileKey {
    #[inline]
    pub fn new(layer: impl Into<LayerId>, tile: TileAddress) -> Self {
        Self { layer: layer.into(), tile }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer.as_str(), self.tile)
    }
}
