use bytemuck::{Pod, Zeroable};

/// Vertices per circle quad.
pub const QUAD_VERTICES: usize = 4;

/// Triangles emitted per circle quad.
pub const QUAD_TRIANGLES: usize = 2;

/// Layout vertex of a circle quad (8 bytes):
///
///  offset 0  pos      [i16; 2]   loc 0  (tile-space center offset)
///  offset 4  extrude  [i16; 2]   loc 1  (billboard corner, -1 or 1 per axis)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct CircleVertex {
    pub pos: [i16; 2],
    pub extrude: [i16; 2],
}

impl CircleVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Sint16x2, // pos
        1 => Sint16x2  // extrude
    ];

    #[inline]
    pub const fn new(x: i16, y: i16, extrude_x: i16, extrude_y: i16) -> Self {
        Self { pos: [x, y], extrude: [extrude_x, extrude_y] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Builds the four corners of a circle billboard centered at `(x, y)`.
///
/// Corner order matches the triangle pattern `(0, 1, 2)` + `(0, 3, 2)`.
pub fn circle_quad(x: i16, y: i16) -> [CircleVertex; QUAD_VERTICES] {
    [
        CircleVertex::new(x, y, -1, -1),
        CircleVertex::new(x, y, 1, -1),
        CircleVertex::new(x, y, 1, 1),
        CircleVertex::new(x, y, -1, 1),
    ]
}

/// One indexed triangle. Indices are local to the owning segment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Triangle(pub [u16; 3]);

impl Triangle {
    #[inline]
    pub const fn new(a: u16, b: u16, c: u16) -> Self {
        Self([a, b, c])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_four_packed_shorts() {
        assert_eq!(std::mem::size_of::<CircleVertex>(), 8);
        assert_eq!(CircleVertex::layout().array_stride, 8);
    }

    #[test]
    fn circle_quad_shares_center() {
        let quad = circle_quad(12, -7);
        assert!(quad.iter().all(|v| v.pos == [12, -7]));
        assert_eq!(quad[0].extrude, [-1, -1]);
        assert_eq!(quad[2].extrude, [1, 1]);
    }

    #[test]
    fn triangles_cast_to_flat_indices() {
        let tris = [Triangle::new(0, 1, 2), Triangle::new(0, 3, 2)];
        let flat: &[u16] = bytemuck::cast_slice(&tris);
        assert_eq!(flat, &[0, 1, 2, 0, 3, 2]);
    }
}
