//! Data-driven paint attributes.
//!
//! Scope:
//! - per-tile encoded attribute buffers (`PaintArrays`)
//! - binders describing how a property maps to a vertex attribute
//! - merging per-tile buffers into one global buffer per property
//!
//! Encoding style values into bytes is done upstream by the tile bucket.

mod attribute;
mod binder;
mod merger;

pub use attribute::{PaintArrays, PaintAttributeData, PaintProperty};
pub use binder::PaintBinder;
pub use merger::{MergedPaintBuffer, PaintMerger, PaintSpan};
