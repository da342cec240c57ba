use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::CompositorError;
use crate::tile::TileContribution;

use super::{PaintBinder, PaintProperty};

/// One tile's slice of a merged buffer and the global vertices it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintSpan {
    /// Range in the global vertex array.
    pub vertices: Range<usize>,
    /// Range in [`MergedPaintBuffer::bytes`].
    pub bytes: Range<usize>,
}

/// Global attribute buffer of one property: every tile's bytes, in tile order.
///
/// Tiles without data for the property add no bytes, so byte offsets and
/// vertex offsets drift apart after such a tile. `spans` keeps the pairing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedPaintBuffer {
    bytes: Vec<u8>,
    spans: Vec<PaintSpan>,
    stride: usize,
    max_value: Option<f32>,
}

impl MergedPaintBuffer {
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes per vertex.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Supplying tiles in tile order, ascending in both vertex and byte offset.
    #[inline]
    pub fn spans(&self) -> &[PaintSpan] {
        &self.spans
    }

    pub fn span_for_vertex(&self, vertex: usize) -> Option<&PaintSpan> {
        let i = self.spans.partition_point(|s| s.vertices.start <= vertex);
        self.spans[..i].last().filter(|s| s.vertices.contains(&vertex))
    }

    /// Encoded value of global vertex `vertex`, `None` if its tile has no data.
    pub fn vertex_bytes(&self, vertex: usize) -> Option<&[u8]> {
        let span = self.span_for_vertex(vertex)?;
        let start = span.bytes.start + (vertex - span.vertices.start) * self.stride;
        Some(&self.bytes[start..start + self.stride])
    }

    /// True if every one of `vertex_count` vertices has a value, i.e. the
    /// buffer can be bound directly alongside the vertex buffer.
    pub fn covers(&self, vertex_count: usize) -> bool {
        self.bytes.len() == vertex_count * self.stride
    }

    /// Max over the per-tile maxima, `None` if no tile supplied this property.
    #[inline]
    pub fn max_value(&self) -> Option<f32> {
        self.max_value
    }
}

/// Concatenates per-tile paint buffers into one buffer per bound property.
///
/// Vertex order of the global geometry is tile order, so bytes are appended in
/// that same order. When every tile supplies a property its buffer lines up
/// with the vertex buffer one value per vertex.
#[derive(Debug, Clone, Default)]
pub struct PaintMerger {
    binders: Vec<PaintBinder>,
    merged: BTreeMap<PaintProperty, MergedPaintBuffer>,
    zoom: Option<f32>,
    needs_upload: bool,
}

impl PaintMerger {
    pub fn new(binders: Vec<PaintBinder>) -> Self {
        Self { binders, ..Self::default() }
    }

    #[inline]
    pub fn binders(&self) -> &[PaintBinder] {
        &self.binders
    }

    pub fn binder(&self, property: &PaintProperty) -> Option<&PaintBinder> {
        self.binders.iter().find(|b| b.property() == property)
    }

    /// Checks that every buffer of `contribution` has a binder and holds exactly
    /// one encoded value per vertex. Absent properties are allowed.
    pub fn validate(&self, contribution: &TileContribution) -> Result<(), CompositorError> {
        for (property, data) in contribution.paint().iter() {
            let Some(binder) = self.binder(property) else {
                return Err(CompositorError::UnknownPaintProperty { property: property.clone() });
            };
            let expected = contribution.vertex_count() * binder.vertex_stride();
            if data.bytes.len() != expected {
                return Err(CompositorError::PaintLengthMismatch {
                    property: property.clone(),
                    expected,
                    actual: data.bytes.len(),
                });
            }
        }
        Ok(())
    }

    /// Rebuilds every merged buffer from `tiles`, which must be in geometry order.
    pub fn rebuild<'a, I>(&mut self, tiles: I, zoom: Option<f32>)
    where
        I: IntoIterator<Item = &'a TileContribution>,
        I::IntoIter: Clone,
    {
        let tiles = tiles.into_iter();
        self.merged.clear();

        for binder in &self.binders {
            let property = binder.property();
            let total: usize =
                tiles.clone().filter_map(|t| t.paint().get(property)).map(|d| d.bytes.len()).sum();

            let mut merged = MergedPaintBuffer {
                bytes: Vec::with_capacity(total),
                stride: binder.vertex_stride(),
                ..MergedPaintBuffer::default()
            };
            let mut vertex = 0;
            for tile in tiles.clone() {
                let vertices = vertex..vertex + tile.vertex_count();
                vertex = vertices.end;

                let Some(data) = tile.paint().get(property) else { continue };
                if !vertices.is_empty() {
                    let start = merged.bytes.len();
                    merged.spans.push(PaintSpan { vertices, bytes: start..start + data.bytes.len() });
                }
                merged.bytes.extend_from_slice(&data.bytes);
                merged.max_value = Some(merged.max_value.map_or(data.max_value, |m| m.max(data.max_value)));
            }

            if !merged.covers(vertex) {
                log::debug!("`{property}` covers {} of {vertex} vertices", total / merged.stride.max(1));
            }
            log::trace!("merged `{property}`: {total} bytes in {} spans", merged.spans.len());
            self.merged.insert(property.clone(), merged);
        }

        self.zoom = zoom;
        self.needs_upload = true;
    }

    #[inline]
    pub fn merged(&self, property: &PaintProperty) -> Option<&MergedPaintBuffer> {
        self.merged.get(property)
    }

    /// Zoom level the current buffers were built for.
    #[inline]
    pub fn zoom(&self) -> Option<f32> {
        self.zoom
    }

    #[inline]
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    #[inline]
    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::circle_quad;
    use crate::paint::{PaintArrays, PaintAttributeData};

    fn radius_binder() -> PaintBinder {
        PaintBinder::new("circle-radius", 2, wgpu::VertexFormat::Float32)
    }

    fn tile(quads: usize, paint: PaintArrays) -> TileContribution {
        let vertices = (0..quads).flat_map(|i| circle_quad(i as i16, 0)).collect();
        TileContribution::new(vertices, paint).unwrap()
    }

    fn radii(values: &[f32]) -> PaintArrays {
        PaintArrays::new().with("circle-radius", PaintAttributeData::from_f32(values))
    }

    // ── validate ──────────────────────────────────────────────────────────

    #[test]
    fn validate_accepts_matching_lengths() {
        let merger = PaintMerger::new(vec![radius_binder()]);
        assert!(merger.validate(&tile(1, radii(&[1.0; 4]))).is_ok());
    }

    #[test]
    fn validate_accepts_absent_property() {
        let merger = PaintMerger::new(vec![radius_binder()]);
        assert!(merger.validate(&tile(2, PaintArrays::new())).is_ok());
    }

    #[test]
    fn validate_rejects_unbound_property() {
        let merger = PaintMerger::new(vec![radius_binder()]);
        let paint = PaintArrays::new().with("circle-blur", PaintAttributeData::from_f32(&[0.0; 4]));
        assert_eq!(
            merger.validate(&tile(1, paint)).unwrap_err(),
            CompositorError::UnknownPaintProperty { property: "circle-blur".into() }
        );
    }

    #[test]
    fn validate_rejects_short_buffer() {
        let merger = PaintMerger::new(vec![radius_binder()]);
        assert_eq!(
            merger.validate(&tile(1, radii(&[1.0; 3]))).unwrap_err(),
            CompositorError::PaintLengthMismatch {
                property: "circle-radius".into(),
                expected: 16,
                actual: 12,
            }
        );
    }

    // ── rebuild ───────────────────────────────────────────────────────────

    #[test]
    fn rebuild_concatenates_in_tile_order() {
        let a = tile(1, radii(&[1.0; 4]));
        let b = tile(1, radii(&[2.0; 4]));
        let mut merger = PaintMerger::new(vec![radius_binder()]);
        merger.rebuild([&a, &b], Some(14.0));

        let merged = merger.merged(&"circle-radius".into()).unwrap();
        let values: &[f32] = bytemuck::cast_slice(merged.bytes());
        assert_eq!(values, &[1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
        assert_eq!(merged.max_value(), Some(2.0));
        assert_eq!(merger.zoom(), Some(14.0));
        assert!(merger.needs_upload());
    }

    #[test]
    fn absent_property_contributes_no_bytes() {
        let a = tile(1, radii(&[3.0; 4]));
        let b = tile(2, PaintArrays::new());
        let c = tile(1, radii(&[5.0; 4]));
        let mut merger = PaintMerger::new(vec![radius_binder()]);
        merger.rebuild([&a, &b, &c], None);

        let merged = merger.merged(&"circle-radius".into()).unwrap();
        let values: &[f32] = bytemuck::cast_slice(merged.bytes());
        assert_eq!(values, &[3.0, 3.0, 3.0, 3.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(merged.max_value(), Some(5.0));
        assert!(!merged.covers(16));
    }

    #[test]
    fn spans_pair_vertices_with_bytes_around_missing_tile() {
        let a = tile(1, radii(&[1.0; 4]));
        let b = tile(1, PaintArrays::new());
        let c = tile(1, radii(&[5.0; 4]));
        let mut merger = PaintMerger::new(vec![radius_binder()]);
        merger.rebuild([&a, &b, &c], None);

        let merged = merger.merged(&"circle-radius".into()).unwrap();
        assert_eq!(
            merged.spans(),
            &[
                PaintSpan { vertices: 0..4, bytes: 0..16 },
                PaintSpan { vertices: 8..12, bytes: 16..32 },
            ]
        );

        let value = |v: usize| merged.vertex_bytes(v).map(|b| f32::from_le_bytes(b.try_into().unwrap()));
        assert_eq!(value(0), Some(1.0));
        assert_eq!(value(4), None);
        assert_eq!(value(7), None);
        assert_eq!(value(8), Some(5.0));
        assert_eq!(value(11), Some(5.0));
        assert_eq!(value(12), None);
    }

    #[test]
    fn full_coverage_is_one_contiguous_run() {
        let a = tile(1, radii(&[1.0; 4]));
        let b = tile(2, radii(&[2.0; 8]));
        let mut merger = PaintMerger::new(vec![radius_binder()]);
        merger.rebuild([&a, &b], None);

        let merged = merger.merged(&"circle-radius".into()).unwrap();
        assert!(merged.covers(12));
        assert_eq!(merged.stride(), 4);
        assert_eq!(merged.spans()[1], PaintSpan { vertices: 4..12, bytes: 16..48 });
    }

    #[test]
    fn property_without_sources_is_empty() {
        let a = tile(1, PaintArrays::new());
        let mut merger = PaintMerger::new(vec![radius_binder()]);
        merger.rebuild([&a], None);

        let merged = merger.merged(&"circle-radius".into()).unwrap();
        assert!(merged.bytes().is_empty());
        assert_eq!(merged.max_value(), None);
    }

    #[test]
    fn mark_uploaded_clears_flag() {
        let mut merger = PaintMerger::new(vec![radius_binder()]);
        merger.rebuild(std::iter::empty(), None);
        merger.mark_uploaded();
        assert!(!merger.needs_upload());
    }
}
