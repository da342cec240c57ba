//! Circle geometry: layout vertices, index segments and the global compositor.
//!
//! Convention:
//! - one circle = one quad = 4 layout vertices + 2 triangles
//! - triangle indices are `u16`, relative to their segment's first vertex
//! - draw order is ascending quad Y offset within each segment

mod compositor;
mod segment;
mod vertex;

pub use compositor::{quad_sort_key, GeometryCompositor};
pub use segment::{Segment, SegmentVector, MAX_SEGMENT_VERTICES};
pub use vertex::{circle_quad, CircleVertex, Triangle, QUAD_TRIANGLES, QUAD_VERTICES};
