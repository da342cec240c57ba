use wgpu::util::DeviceExt;

use super::{BufferHandle, DeviceContext};

/// A `wgpu::Buffer` plus the vertex stride it was created with.
#[derive(Debug)]
pub struct GpuBuffer {
    buffer: wgpu::Buffer,
    /// Vertex stride in bytes; 0 for index buffers.
    stride: u64,
}

impl GpuBuffer {
    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl BufferHandle for GpuBuffer {
    fn size(&self) -> u64 {
        self.buffer.size()
    }

    fn destroy(self) {
        self.buffer.destroy();
    }
}

/// [`DeviceContext`] backed by a `wgpu::Device`.
pub struct WgpuContext<'a> {
    device: &'a wgpu::Device,
}

impl<'a> WgpuContext<'a> {
    #[inline]
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }
}

impl DeviceContext for WgpuContext<'_> {
    type Buffer = GpuBuffer;

    fn create_vertex_buffer(
        &mut self,
        label: &str,
        contents: &[u8],
        layout: &wgpu::VertexBufferLayout<'_>,
    ) -> GpuBuffer {
        debug_assert!(
            layout.array_stride == 0 || contents.len() as u64 % layout.array_stride == 0,
            "vertex buffer `{label}` is not a whole number of vertices"
        );
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        });
        GpuBuffer { buffer, stride: layout.array_stride }
    }

    fn create_index_buffer(&mut self, label: &str, indices: &[u16]) -> GpuBuffer {
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuBuffer { buffer, stride: 0 }
    }
}
