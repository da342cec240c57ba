use core::ops::Range;

use crate::error::CompositorError;

use super::vertex::QUAD_VERTICES;

/// Largest vertex run a `u16` index buffer can address.
pub const MAX_SEGMENT_VERTICES: usize = u16::MAX as usize + 1;

/// A contiguous run of vertices and triangles drawable with one indexed draw call.
///
/// Triangle indices inside a segment are relative to `vertex_offset`, so they
/// stay below `vertex_length` and fit a `u16`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    /// First vertex of the segment in the global vertex array.
    pub vertex_offset: usize,
    /// First triangle of the segment in the global index array.
    pub primitive_offset: usize,
    pub vertex_length: usize,
    pub primitive_length: usize,
}

impl Segment {
    /// Range into the flat `u16` index buffer, for `draw_indexed`.
    pub fn index_range(&self) -> Range<u32> {
        let start = (self.primitive_offset * 3) as u32;
        let end = ((self.primitive_offset + self.primitive_length) * 3) as u32;
        start..end
    }

    /// Base vertex to pass alongside `index_range`.
    #[inline]
    pub fn base_vertex(&self) -> i32 {
        self.vertex_offset as i32
    }

    #[inline]
    pub fn vertex_range(&self) -> Range<usize> {
        self.vertex_offset..self.vertex_offset + self.vertex_length
    }
}

/// Splits a growing vertex stream into segments bounded by the index width.
///
/// The allocator only guarantees capacity and keeps offsets consistent; the
/// caller copies vertices and advances `vertex_length` / `primitive_length`.
#[derive(Debug, Clone)]
pub struct SegmentVector {
    segments: Vec<Segment>,
    vertex_limit: usize,
}

impl Default for SegmentVector {
    fn default() -> Self {
        Self { segments: Vec::new(), vertex_limit: MAX_SEGMENT_VERTICES }
    }
}

impl SegmentVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator with a custom per-segment vertex limit.
    ///
    /// The limit must hold at least one quad and may not exceed [`MAX_SEGMENT_VERTICES`].
    pub fn with_vertex_limit(vertex_limit: usize) -> Result<Self, CompositorError> {
        if !(QUAD_VERTICES..=MAX_SEGMENT_VERTICES).contains(&vertex_limit) {
            return Err(CompositorError::InvalidSegmentLimit { limit: vertex_limit });
        }
        Ok(Self { segments: Vec::new(), vertex_limit })
    }

    #[inline]
    pub fn vertex_limit(&self) -> usize {
        self.vertex_limit
    }

    /// Returns a segment with room for `vertices_needed` more vertices.
    ///
    /// Reuses the last segment when it has room, otherwise opens a new one that
    /// starts at `vertex_array_len` and at the triangle following every
    /// triangle already accounted to earlier segments.
    pub fn prepare_segment(
        &mut self,
        vertices_needed: usize,
        vertex_array_len: usize,
    ) -> Result<&mut Segment, CompositorError> {
        if vertices_needed > self.vertex_limit {
            return Err(CompositorError::SegmentCapacity {
                needed: vertices_needed,
                limit: self.vertex_limit,
            });
        }

        let fits = self
            .segments
            .last()
            .is_some_and(|s| s.vertex_length + vertices_needed <= self.vertex_limit);

        if !fits {
            let primitive_offset = self
                .segments
                .last()
                .map_or(0, |s| s.primitive_offset + s.primitive_length);
            log::trace!(
                "opening segment {} at vertex {vertex_array_len}",
                self.segments.len()
            );
            self.segments.push(Segment {
                vertex_offset: vertex_array_len,
                primitive_offset,
                vertex_length: 0,
                primitive_length: 0,
            });
        }

        // A segment was pushed above if none existed.
        let last = self.segments.len() - 1;
        Ok(&mut self.segments[last])
    }

    #[inline]
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_vertices(&self) -> usize {
        self.segments.iter().map(|s| s.vertex_length).sum()
    }

    pub fn total_primitives(&self) -> usize {
        self.segments.iter().map(|s| s.primitive_length).sum()
    }

    /// Drops all segments, keeping the limit.
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}
