//! Circlemap engine crate.
//!
//! Merges per-tile circle marker geometry into one globally ordered,
//! GPU-ready buffer set:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`tile`] | `TileKey`, `TileContribution`, `TileRegistry` |
//! | [`geometry`] | layout vertices, `SegmentVector`, `GeometryCompositor` |
//! | [`paint`] | `PaintBinder`, `PaintMerger` |
//! | [`batch`] | `GlobalCircleBatch` (dirty tracking + device buffer lifecycle) |
//! | [`device`] | `DeviceContext` trait, wgpu backend, headless GPU |

pub mod batch;
pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod tile;

pub use batch::{BatchConfig, BatchState, GlobalCircleBatch, UploadOutcome, WgpuCircleBatch};
pub use error::CompositorError;
