/// Device-side buffer that must be released explicitly.
pub trait BufferHandle {
    /// Size in bytes.
    fn size(&self) -> u64;

    /// Frees the device memory backing this buffer.
    fn destroy(self);
}

/// Buffer-creation primitives the batch needs from a GPU device.
///
/// Creation is synchronous; contents are copied at creation time.
pub trait DeviceContext {
    type Buffer: BufferHandle;

    /// Creates a vertex buffer holding `contents`, laid out as `layout`.
    fn create_vertex_buffer(
        &mut self,
        label: &str,
        contents: &[u8],
        layout: &wgpu::VertexBufferLayout<'_>,
    ) -> Self::Buffer;

    /// Creates a `u16` index buffer.
    fn create_index_buffer(&mut self, label: &str, indices: &[u16]) -> Self::Buffer;
}
