use crate::error::CompositorError;
use crate::tile::TileContribution;

use super::segment::{Segment, SegmentVector};
use super::vertex::{CircleVertex, Triangle, QUAD_TRIANGLES, QUAD_VERTICES};

/// Draw-order key of a quad: the Y offset of its first vertex.
///
/// This is a coarse, rotation-unaware proxy for depth. Circles overlapping
/// diagonally under map rotation can still draw in the wrong order.
///
/// The offset is compared as raw `u16` bits, so buffer-zone circles above the
/// tile (negative Y) sort after every in-tile circle.
#[inline]
pub fn quad_sort_key(quad: &[CircleVertex]) -> u16 {
    quad[0].pos[1] as u16
}

#[derive(Debug, Copy, Clone)]
struct PendingQuad {
    sort_key: u16,
    segment: usize,
    /// First vertex of the quad, relative to its segment.
    base: u16,
}

/// Global vertex/index arrays built from all tile contributions.
///
/// Vertices are stored in tile order (so paint buffers line up); only the
/// triangle order is sorted. Every rebuild starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct GeometryCompositor {
    vertices: Vec<CircleVertex>,
    triangles: Vec<Triangle>,
    segments: SegmentVector,
    version: u64,
}

impl GeometryCompositor {
    /// Creates a compositor using `vertex_limit` vertices per segment.
    pub fn new(vertex_limit: usize) -> Result<Self, CompositorError> {
        Ok(Self {
            segments: SegmentVector::with_vertex_limit(vertex_limit)?,
            ..Self::default()
        })
    }

    /// Rebuilds vertices, triangles and segments from `tiles`.
    pub fn rebuild<'a, I>(&mut self, tiles: I) -> Result<(), CompositorError>
    where
        I: IntoIterator<Item = &'a TileContribution>,
    {
        self.vertices.clear();
        self.triangles.clear();
        self.segments.clear();

        let tiles: Vec<&TileContribution> = tiles.into_iter().collect();
        let total_vertices: usize = tiles.iter().map(|t| t.vertex_count()).sum();
        self.vertices.reserve(total_vertices);

        let mut pending = Vec::with_capacity(total_vertices / QUAD_VERTICES);
        for tile in tiles {
            for quad in tile.quads() {
                let segment = self.segments.prepare_segment(QUAD_VERTICES, self.vertices.len())?;
                // Segment length stays below the limit, which is at most 65536.
                let base = segment.vertex_length as u16;
                segment.vertex_length += QUAD_VERTICES;
                segment.primitive_length += QUAD_TRIANGLES;

                pending.push(PendingQuad {
                    sort_key: quad_sort_key(quad),
                    segment: self.segments.len() - 1,
                    base,
                });
                self.vertices.extend_from_slice(quad);
            }
        }

        // Stable: equal keys keep tile order. Segments stay contiguous so each
        // one remains a single draw range.
        pending.sort_by_key(|q| (q.segment, q.sort_key));

        self.triangles.reserve_exact(pending.len() * QUAD_TRIANGLES);
        for q in &pending {
            let v = q.base;
            self.triangles.push(Triangle::new(v, v + 1, v + 2));
            self.triangles.push(Triangle::new(v, v + 3, v + 2));
        }

        self.vertices.shrink_to_fit();
        self.triangles.shrink_to_fit();
        self.version += 1;

        log::debug!(
            "rebuilt circle geometry v{}: {} vertices, {} triangles, {} segments",
            self.version,
            self.vertices.len(),
            self.triangles.len(),
            self.segments.len()
        );
        Ok(())
    }

    #[inline]
    pub fn vertices(&self) -> &[CircleVertex] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flat `u16` view of the triangles, as uploaded to the index buffer.
    #[inline]
    pub fn indices(&self) -> &[u16] {
        bytemuck::cast_slice(&self.triangles)
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        self.segments.as_slice()
    }

    #[inline]
    pub fn vertex_limit(&self) -> usize {
        self.segments.vertex_limit()
    }

    /// Incremented by every rebuild.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
