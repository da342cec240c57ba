use crate::error::CompositorError;
use crate::geometry::{MAX_SEGMENT_VERTICES, QUAD_VERTICES};

/// Batch configuration.
///
/// `label` prefixes every device buffer label, which makes the batch easy to
/// find in GPU debuggers.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub label: String,

    /// Maximum vertices addressed by one segment.
    ///
    /// Must be within `4..=65536`. Values below the `u16` range are only
    /// useful to exercise segment splitting.
    pub segment_vertex_limit: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            label: "circlemap circles".to_owned(),
            segment_vertex_limit: MAX_SEGMENT_VERTICES,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), CompositorError> {
        if !(QUAD_VERTICES..=MAX_SEGMENT_VERTICES).contains(&self.segment_vertex_limit) {
            return Err(CompositorError::InvalidSegmentLimit { limit: self.segment_vertex_limit });
        }
        Ok(())
    }
}
