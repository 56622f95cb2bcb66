//! Headless backend that records surface operations.
//!
//! Used by the demo binary and by tests. Each frame starts from an empty
//! recording, so [`HeadlessBackend::last_frame`] always holds exactly the
//! operations of the most recent frame.

use stage_core::{DrawingSurface, RecordingSurface, SurfaceOp};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// Recording renderer with frame counters.
#[derive(Debug)]
pub struct HeadlessBackend {
    surface: RecordingSurface,
    width: u32,
    height: u32,
    frames: u64,
    total_ops: u64,
}

impl HeadlessBackend {
    /// Create a headless backend of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RecordingSurface::new(),
            width,
            height,
            frames: 0,
            total_ops: 0,
        }
    }

    /// Operations recorded during the last frame.
    #[must_use]
    pub fn last_frame(&self) -> &[SurfaceOp] {
        self.surface.ops()
    }

    /// Number of completed frames.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Operations recorded over every completed frame.
    #[must_use]
    pub fn total_ops(&self) -> u64 {
        self.total_ops
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl RenderBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }

    fn surface(&mut self) -> &mut dyn DrawingSurface {
        &mut self.surface
    }

    fn begin_frame(&mut self) -> RenderResult<()> {
        self.surface = RecordingSurface::new();
        Ok(())
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        if self.surface.depth() != 0 {
            return Err(RenderError::Frame(format!(
                "{} unmatched save(s) at end of frame",
                self.surface.depth()
            )));
        }
        let ops = self.surface.ops().len() as u64;
        self.frames += 1;
        self.total_ops += ops;
        tracing::trace!("Headless frame {}: {ops} ops", self.frames);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        tracing::debug!("Headless resized to {}x{}", width, height);
        Ok(())
    }
}
