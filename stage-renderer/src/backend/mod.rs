//! Rendering backend implementations.

#[cfg(feature = "wasm")]
pub mod canvas2d;
pub mod headless;

use stage_core::DrawingSurface;

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
///
/// A backend owns the drawing surface. The renderer brackets each frame with
/// [`begin_frame`](Self::begin_frame) and [`end_frame`](Self::end_frame) and
/// draws onto [`surface`](Self::surface) in between.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// The surface scene nodes draw on.
    fn surface(&mut self) -> &mut dyn DrawingSurface;

    /// Prepare for a new frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is unavailable.
    fn begin_frame(&mut self) -> RenderResult<()> {
        Ok(())
    }

    /// Finish the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame was left in an inconsistent state.
    fn end_frame(&mut self) -> RenderResult<()> {
        Ok(())
    }

    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn backend_type(&self) -> BackendType {
        (**self).backend_type()
    }

    fn surface(&mut self) -> &mut dyn DrawingSurface {
        (**self).surface()
    }

    fn begin_frame(&mut self) -> RenderResult<()> {
        (**self).begin_frame()
    }

    fn end_frame(&mut self) -> RenderResult<()> {
        (**self).end_frame()
    }

    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        (**self).resize(width, height)
    }
}
