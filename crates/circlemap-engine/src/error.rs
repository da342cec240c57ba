use std::fmt;

use crate::paint::PaintProperty;

/// Errors reported by the compositor.
///
/// Every variant except `AlreadyDestroyed` is a contract violation by whoever
/// produced the data (tile bucket, style binder, or configuration). None of
/// them are recoverable by retrying.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorError {
    /// A tile's layout vertex count is not a multiple of four (one quad per circle).
    MisalignedQuads { vertex_count: usize },
    /// A tile supplied paint data for a property that has no binder.
    UnknownPaintProperty { property: PaintProperty },
    /// A tile's paint buffer does not hold exactly one encoded value per vertex.
    PaintLengthMismatch {
        property: PaintProperty,
        expected: usize,
        actual: usize,
    },
    /// The configured segment vertex limit cannot hold a quad or exceeds `u16` addressing.
    InvalidSegmentLimit { limit: usize },
    /// A single allocation asked for more vertices than one segment can address.
    SegmentCapacity { needed: usize, limit: usize },
    /// `destroy` was called twice without a rebuild in between.
    AlreadyDestroyed,
}

impl fmt::Display for CompositorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MisalignedQuads { vertex_count } => write!(
                f,
                "tile vertex count {vertex_count} is not a multiple of 4"
            ),
            Self::UnknownPaintProperty { property } => {
                write!(f, "no paint binder for property `{property}`")
            }
            Self::PaintLengthMismatch { property, expected, actual } => write!(
                f,
                "paint buffer for `{property}` has {actual} bytes, expected {expected}"
            ),
            Self::InvalidSegmentLimit { limit } => write!(
                f,
                "segment vertex limit {limit} must be within 4..=65536"
            ),
            Self::SegmentCapacity { needed, limit } => write!(
                f,
                "{needed} vertices requested but a segment holds at most {limit}"
            ),
            Self::AlreadyDestroyed => write!(f, "batch resources were already destroyed"),
        }
    }
}

impl std::error::Error for CompositorError {}
