use crate::error::CompositorError;
use crate::geometry::{CircleVertex, QUAD_VERTICES};
use crate::paint::PaintArrays;

/// One tile's circle geometry and paint snapshot, as produced by its bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TileContribution {
    vertices: Vec<CircleVertex>,
    paint: PaintArrays,
}

impl TileContribution {
    /// Wraps a tile bucket's output.
    ///
    /// Fails if `vertices` does not split into whole quads; truncating would
    /// shift every following vertex out of alignment with its paint data.
    pub fn new(vertices: Vec<CircleVertex>, paint: PaintArrays) -> Result<Self, CompositorError> {
        if vertices.len() % QUAD_VERTICES != 0 {
            return Err(CompositorError::MisalignedQuads { vertex_count: vertices.len() });
        }
        Ok(Self { vertices, paint })
    }

    #[inline]
    pub fn vertices(&self) -> &[CircleVertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / QUAD_VERTICES
    }

    /// Iterates the circle quads, four vertices each.
    pub fn quads(&self) -> impl Iterator<Item = &[CircleVertex]> {
        self.vertices.chunks_exact(QUAD_VERTICES)
    }

    #[inline]
    pub fn paint(&self) -> &PaintArrays {
        &self.paint
    }
}
