use super::PaintProperty;

/// Binds a style property to a per-vertex shader attribute.
///
/// The binder only describes the encoded layout; encoding values into bytes
/// happens upstream when the tile bucket is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintBinder {
    property: PaintProperty,
    attribute: [wgpu::VertexAttribute; 1],
}

impl PaintBinder {
    pub fn new(
        property: impl Into<PaintProperty>,
        shader_location: wgpu::ShaderLocation,
        format: wgpu::VertexFormat,
    ) -> Self {
        Self {
            property: property.into(),
            attribute: [wgpu::VertexAttribute { format, offset: 0, shader_location }],
        }
    }

    #[inline]
    pub fn property(&self) -> &PaintProperty {
        &self.property
    }

    #[inline]
    pub fn format(&self) -> wgpu::VertexFormat {
        self.attribute[0].format
    }

    /// Encoded bytes per vertex.
    #[inline]
    pub fn vertex_stride(&self) -> usize {
        self.format().size() as usize
    }

    /// Vertex buffer layout of the merged attribute buffer (one value per vertex).
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.format().size(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attribute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_follows_format() {
        let radius = PaintBinder::new("circle-radius", 2, wgpu::VertexFormat::Float32);
        let color = PaintBinder::new("circle-color", 3, wgpu::VertexFormat::Float32x4);
        assert_eq!(radius.vertex_stride(), 4);
        assert_eq!(color.vertex_stride(), 16);
    }

    #[test]
    fn layout_places_attribute_at_location() {
        let binder = PaintBinder::new("circle-opacity", 5, wgpu::VertexFormat::Unorm8x4);
        let layout = binder.layout();
        assert_eq!(layout.array_stride, 4);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 5);
        assert_eq!(layout.attributes[0].offset, 0);
    }
}
