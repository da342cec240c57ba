//! Global circle batch: membership, rebuild and device buffer lifecycle.
//!
//! Tiles attach and detach at any time; each change marks the batch dirty.
//! The next `upload` rebuilds the global geometry and paint buffers from
//! every attached tile, releases the old device buffers, and creates new
//! ones. Everything runs on the caller's thread; `&mut self` keeps attach,
//! detach and rebuild from interleaving.

mod config;
mod state;


use std::collections::BTreeMap;

use crate::device::{BufferHandle, DeviceContext, GpuBuffer};
use crate::error::CompositorError;
use crate::geometry::{CircleVertex, GeometryCompositor, Segment};
use crate::paint::{MergedPaintBuffer, PaintArrays, PaintBinder, PaintMerger, PaintProperty};
use crate::tile::{TileContribution, TileKey, TileRegistry};

pub use config::BatchConfig;
pub use state::{BatchState, UploadOutcome};

/// Batch uploading through [`crate::device::WgpuContext`].
pub type WgpuCircleBatch = GlobalCircleBatch<GpuBuffer>;

/// Circles of many tiles merged into one sorted, GPU-ready buffer set.
///
/// `B` is the device buffer type of the [`DeviceContext`] used for upload.
#[derive(Debug)]
pub struct GlobalCircleBatch<B: BufferHandle> {
    config: BatchConfig,

    registry: TileRegistry,
    geometry: GeometryCompositor,
    paint: PaintMerger,

    state: BatchState,
    dirty: bool,
    geometry_needs_upload: bool,
    uploaded_once: bool,

    vertex_buffer: Option<B>,
    index_buffer: Option<B>,
    paint_buffers: BTreeMap<PaintProperty, B>,
}

impl<B: BufferHandle> GlobalCircleBatch<B> {
    /// Creates an empty batch. `binders` lists the data-driven properties
    /// tiles may supply paint buffers for.
    pub fn new(config: BatchConfig, binders: Vec<PaintBinder>) -> Result<Self, CompositorError> {
        config.validate()?;
        let geometry = GeometryCompositor::new(config.segment_vertex_limit)?;

        Ok(Self {
            config,
            registry: TileRegistry::new(),
            geometry,
            paint: PaintMerger::new(binders),
            state: BatchState::Empty,
            dirty: true,
            geometry_needs_upload: false,
            uploaded_once: false,
            vertex_buffer: None,
            index_buffer: None,
            paint_buffers: BTreeMap::new(),
        })
    }

    // ── membership ─────────────────────────────────────────────────────────

    /// Adds or replaces the circles of `key`.
    ///
    /// `zoom` is the zoom level the paint data was encoded at; the most recent
    /// one wins. Malformed contributions are rejected without touching the batch.
    pub fn attach(
        &mut self,
        key: TileKey,
        vertices: Vec<CircleVertex>,
        paint: PaintArrays,
        zoom: f32,
    ) -> Result<(), CompositorError> {
        let contribution = TileContribution::new(vertices, paint)?;
        self.attach_contribution(key, contribution, zoom)
    }

    /// Adds or replaces an already wrapped contribution.
    pub fn attach_contribution(
        &mut self,
        key: TileKey,
        contribution: TileContribution,
        zoom: f32,
    ) -> Result<(), CompositorError> {
        self.paint.validate(&contribution)?;

        log::trace!("attach {key}: {} circles at z{zoom}", contribution.quad_count());
        if self.registry.attach(key, contribution, zoom).is_some() {
            log::trace!("replaced previous contribution");
        }
        self.mark_dirty();
        Ok(())
    }

    /// Removes the circles of `key`. Returns `false` if the tile was not attached.
    ///
    /// Tile loading can race detach against attach, so unknown keys are ignored.
    pub fn detach(&mut self, key: &TileKey) -> bool {
        if self.registry.detach(key).is_none() {
            log::trace!("detach {key}: not attached");
            return false;
        }
        log::trace!("detach {key}");
        self.mark_dirty();
        true
    }

    /// True iff no attached tile contributes a vertex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        if self.state != BatchState::Empty {
            self.state = BatchState::Stale;
        }
    }

    // ── rebuild + upload ───────────────────────────────────────────────────

    /// True if `upload` has device work to do.
    pub fn upload_pending(&self) -> bool {
        !self.uploaded_once || self.dirty || self.geometry_needs_upload || self.paint.needs_upload()
    }

    /// Rebuilds CPU arrays if dirty. Returns whether a rebuild happened.
    ///
    /// Geometry and paint always rebuild together: paint bytes are positional
    /// per vertex.
    pub fn rebuild(&mut self) -> Result<bool, CompositorError> {
        if !self.dirty {
            return Ok(false);
        }

        self.geometry.rebuild(self.registry.contributions())?;
        self.paint.rebuild(self.registry.contributions(), self.registry.zoom());

        self.dirty = false;
        self.geometry_needs_upload = true;
        self.state = BatchState::Built;
        Ok(true)
    }

    /// Rebuilds if dirty, then pushes whatever the device is missing.
    ///
    /// Old buffers are destroyed before their replacements are created.
    pub fn upload<C>(&mut self, ctx: &mut C) -> Result<UploadOutcome, CompositorError>
    where
        C: DeviceContext<Buffer = B>,
    {
        let rebuilt = self.rebuild()?;
        let mut pushed = false;

        if self.geometry_needs_upload {
            self.release_geometry_buffers();

            let label = &self.config.label;
            self.vertex_buffer = Some(ctx.create_vertex_buffer(
                &format!("{label} vertices"),
                bytemuck::cast_slice(self.geometry.vertices()),
                &CircleVertex::layout(),
            ));
            self.index_buffer =
                Some(ctx.create_index_buffer(&format!("{label} indices"), self.geometry.indices()));

            self.geometry_needs_upload = false;
            pushed = true;
        }

        if self.paint.needs_upload() {
            self.release_paint_buffers();

            for binder in self.paint.binders() {
                let property = binder.property();
                let Some(merged) = self.paint.merged(property) else { continue };
                let buffer = ctx.create_vertex_buffer(
                    &format!("{} {property}", self.config.label),
                    merged.bytes(),
                    &binder.layout(),
                );
                self.paint_buffers.insert(property.clone(), buffer);
            }

            self.paint.mark_uploaded();
            pushed = true;
        }

        self.uploaded_once = true;
        self.state = BatchState::Uploaded;

        let outcome = if rebuilt {
            UploadOutcome::Rebuilt
        } else if pushed {
            UploadOutcome::Uploaded
        } else {
            UploadOutcome::UpToDate
        };
        if outcome != UploadOutcome::UpToDate {
            log::debug!(
                "uploaded {} ({} tiles, {} vertices, {} segments, {} paint buffers)",
                self.config.label,
                self.registry.len(),
                self.geometry.vertices().len(),
                self.geometry.segments().len(),
                self.paint_buffers.len()
            );
        }
        Ok(outcome)
    }

    /// Releases every device buffer.
    ///
    /// A no-op if nothing is on the device. Destroying again before the next
    /// rebuild is reported as [`CompositorError::AlreadyDestroyed`].
    pub fn destroy(&mut self) -> Result<(), CompositorError> {
        if self.state == BatchState::Destroyed {
            log::warn!("{}: destroy called twice", self.config.label);
            return Err(CompositorError::AlreadyDestroyed);
        }
        if self.vertex_buffer.is_none() && self.index_buffer.is_none() && self.paint_buffers.is_empty() {
            log::trace!("{}: destroy with no device buffers", self.config.label);
            return Ok(());
        }

        self.release_geometry_buffers();
        self.release_paint_buffers();

        // The device copy is gone; the next upload must rebuild and re-create it.
        self.dirty = true;
        self.state = BatchState::Destroyed;
        log::debug!("{}: device buffers released", self.config.label);
        Ok(())
    }

    fn release_geometry_buffers(&mut self) {
        if let Some(buffer) = self.vertex_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.index_buffer.take() {
            buffer.destroy();
        }
    }

    fn release_paint_buffers(&mut self) {
        for buffer in std::mem::take(&mut self.paint_buffers).into_values() {
            buffer.destroy();
        }
    }

    // ── accessors ──────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> BatchState {
        self.state
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Most recent zoom level passed to `attach`.
    #[inline]
    pub fn zoom(&self) -> Option<f32> {
        self.registry.zoom()
    }

    #[inline]
    pub fn binders(&self) -> &[PaintBinder] {
        self.paint.binders()
    }

    #[inline]
    pub fn vertices(&self) -> &[CircleVertex] {
        self.geometry.vertices()
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        self.geometry.indices()
    }

    /// Draw ranges; issue one indexed draw per segment.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        self.geometry.segments()
    }

    /// Changes only when the arrays are rebuilt.
    #[inline]
    pub fn geometry_version(&self) -> u64 {
        self.geometry.version()
    }

    #[inline]
    pub fn merged_paint(&self, property: &PaintProperty) -> Option<&MergedPaintBuffer> {
        self.paint.merged(property)
    }

    #[inline]
    pub fn vertex_buffer(&self) -> Option<&B> {
        self.vertex_buffer.as_ref()
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&B> {
        self.index_buffer.as_ref()
    }

    #[inline]
    pub fn paint_buffer(&self, property: &PaintProperty) -> Option<&B> {
        self.paint_buffers.get(property)
    }
}
