/// Lifecycle of a batch's CPU arrays and device buffers.
///
/// `Empty -> Built -> Uploaded -> Stale -> Built -> Uploaded ...`; `Destroyed`
/// is left only through a rebuild.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BatchState {
    /// Nothing built or uploaded yet.
    #[default]
    Empty,
    /// CPU arrays are current but not on the device.
    Built,
    /// Device buffers match the CPU arrays.
    Uploaded,
    /// Tiles changed since the last upload.
    Stale,
    /// Device buffers were released.
    Destroyed,
}

/// What an `upload` call did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UploadOutcome {
    /// Arrays were rebuilt and all buffers re-created.
    Rebuilt,
    /// Previously built data was pushed without a rebuild.
    Uploaded,
    /// Device buffers were already current.
    UpToDate,
}
