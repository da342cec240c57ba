//! GPU device access.
//!
//! This module is responsible for:
//! - the `DeviceContext` / `BufferHandle` traits the batch uploads through
//! - a wgpu implementation of those traits
//! - acquiring a wgpu Adapter/Device/Queue without a window surface

mod context;
mod init;
mod wgpu_context;

#[cfg(test)]
pub(crate) mod mock;

pub use context::{BufferHandle, DeviceContext};
pub use init::{GpuInit, HeadlessGpu};
pub use wgpu_context::{GpuBuffer, WgpuContext};
