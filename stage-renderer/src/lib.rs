//! # Stagecraft Renderer
//!
//! Drives scenes frame by frame onto a drawing surface.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Renderer<B: RenderBackend>           │
//! │   clock ─► advance ─► clear ─► draw         │
//! ├──────────────────────┬──────────────────────┤
//! │ Canvas2D             │ Headless             │
//! │ (browser, `wasm`)    │ (recording, tests)   │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Each call to [`Renderer::frame`] converts the timestamp into a
//! normalized delta, advances the target's schedulers, clears the surface
//! and draws the target.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod binder;
pub mod clock;
pub mod error;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use backend::headless::HeadlessBackend;
pub use backend::RenderBackend;
pub use binder::{ClientRect, InputBinder};
pub use clock::FrameClock;
pub use error::{RenderError, RenderResult};

use serde::{Deserialize, Serialize};
use stage_core::{Color, DrawingSurface, Scene, SceneNode};

/// Configuration for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Preferred backend (will fall back if unavailable).
    pub preferred_backend: BackendType,
    /// Target frames per second; a delta of 1.0 is one such frame.
    pub target_fps: u32,
    /// Background used when the target has none of its own.
    pub background_color: Option<Color>,
    /// Outline every node's bound.
    pub debug_bounds: bool,
    /// Clear the surface before drawing each frame.
    pub clear_each_frame: bool,
    /// Largest delta handed to the scene, in frames.
    pub max_delta: f64,
    /// Initial surface size for backends that own their surface.
    pub width: u32,
    /// Initial surface height.
    pub height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Canvas2D,
            target_fps: 60,
            background_color: Some(Color::rgb(255, 255, 255)),
            debug_bounds: false,
            clear_each_frame: true,
            max_delta: 4.0,
            width: 800,
            height: 600,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendType {
    /// Browser 2D canvas.
    Canvas2D,
    /// In-memory recording surface.
    Headless,
}

/// Anything the renderer can advance and draw.
pub trait FrameTarget {
    /// Advance time by `delta` normalized frames.
    fn advance(&mut self, delta: f64);

    /// Draw onto `surface`.
    fn draw(&self, surface: &mut dyn DrawingSurface);

    /// Background this target wants behind it.
    fn background(&self) -> Option<Color> {
        None
    }

    /// Turn bound outlines on or off.
    fn show_bounds(&mut self, on: bool);
}

impl FrameTarget for Scene {
    fn advance(&mut self, delta: f64) {
        self.update(delta);
    }

    fn draw(&self, surface: &mut dyn DrawingSurface) {
        self.render(surface);
    }

    fn background(&self) -> Option<Color> {
        self.background.clone()
    }

    fn show_bounds(&mut self, on: bool) {
        self.set_debug_bounds(on);
    }
}

impl FrameTarget for SceneNode {
    fn advance(&mut self, delta: f64) {
        self.update(delta);
    }

    fn draw(&self, surface: &mut dyn DrawingSurface) {
        self.render(surface);
    }

    fn show_bounds(&mut self, on: bool) {
        self.set_debug_bounds(on);
    }
}

/// The main renderer interface.
pub struct Renderer<B: RenderBackend = Box<dyn RenderBackend>> {
    config: RendererConfig,
    backend: B,
    clock: FrameClock,
    frame_count: u64,
    bounds_shown: bool,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no suitable
    /// backend is available.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let backend = Self::create_backend(&config)?;
        Renderer::with_backend(config, backend)
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> RenderResult<Box<dyn RenderBackend>> {
        match config.preferred_backend {
            BackendType::Canvas2D => {
                #[cfg(feature = "wasm")]
                {
                    match backend::canvas2d::Canvas2DBackend::from_element_id(wasm::CANVAS_ID) {
                        Ok(b) => return Ok(Box::new(b)),
                        Err(e) => {
                            tracing::warn!("Canvas2D unavailable, falling back: {}", e);
                        }
                    }
                }
                #[cfg(not(feature = "wasm"))]
                {
                    tracing::warn!("Canvas2D needs the wasm feature, falling back to headless");
                }
                Self::create_backend(&RendererConfig {
                    preferred_backend: BackendType::Headless,
                    ..config.clone()
                })
            }
            BackendType::Headless => {
                if config.width == 0 || config.height == 0 {
                    return Err(RenderError::Config(format!(
                        "surface size must be positive, got {}x{}",
                        config.width, config.height
                    )));
                }
                Ok(Box::new(HeadlessBackend::new(config.width, config.height)))
            }
        }
    }
}

impl<B: RenderBackend> Renderer<B> {
    /// Create a renderer around an existing backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame timing configuration is invalid.
    pub fn with_backend(config: RendererConfig, backend: B) -> RenderResult<Self> {
        let clock = FrameClock::new(config.target_fps, config.max_delta)?;
        tracing::info!(
            "Renderer ready: {:?} backend at {} fps",
            backend.backend_type(),
            config.target_fps
        );
        Ok(Self {
            config,
            backend,
            clock,
            frame_count: 0,
            bounds_shown: false,
        })
    }

    /// Advance and draw one frame at timestamp `now_ms`. Returns the delta
    /// handed to the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to begin or finish the frame.
    pub fn frame<T: FrameTarget + ?Sized>(&mut self, target: &mut T, now_ms: f64) -> RenderResult<f64> {
        let delta = self.clock.tick(now_ms);
        target.advance(delta);

        if self.bounds_shown != self.config.debug_bounds {
            target.show_bounds(self.config.debug_bounds);
            self.bounds_shown = self.config.debug_bounds;
        }

        self.draw(target)?;
        Ok(delta)
    }

    /// Draw without advancing time, e.g. after input changed the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to begin or finish the frame.
    pub fn redraw<T: FrameTarget + ?Sized>(&mut self, target: &T) -> RenderResult<()> {
        self.draw(target)
    }

    fn draw<T: FrameTarget + ?Sized>(&mut self, target: &T) -> RenderResult<()> {
        let background = if self.config.clear_each_frame {
            Some(target.background().or_else(|| self.config.background_color.clone()))
        } else {
            None
        };

        self.backend.begin_frame()?;
        let surface = self.backend.surface();
        if let Some(background) = background {
            surface.clear(background.as_ref());
        }
        target.draw(surface);
        self.backend.end_frame()?;

        self.frame_count += 1;
        Ok(())
    }

    /// Toggle bound outlines; applied on the next frame.
    pub fn set_debug_bounds(&mut self, on: bool) {
        self.config.debug_bounds = on;
    }

    /// Forget the last timestamp so the next frame advances by one.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage_core::{PathGraphic, Rect2D, SurfaceOp};

    fn headless() -> Renderer<HeadlessBackend> {
        Renderer::with_backend(RendererConfig::default(), HeadlessBackend::new(100, 100)).unwrap()
    }

    #[test]
    fn test_falls_back_to_headless() {
        let renderer = Renderer::new(RendererConfig::default()).unwrap();
        #[cfg(not(feature = "wasm"))]
        assert_eq!(renderer.active_backend(), BackendType::Headless);
        assert_eq!(renderer.frame_count(), 0);
    }

    #[test]
    fn test_frame_clears_then_draws() {
        let mut renderer = headless();
        let mut scene = Scene::new(100.0, 100.0);
        scene.background = Some(Color::rgb(0, 0, 0));
        scene.add_node(SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 5.0, 5.0))));

        renderer.frame(&mut scene, 0.0).unwrap();
        let ops = renderer.backend().last_frame();
        assert_eq!(ops[0], SurfaceOp::Clear(Some(Color::rgb(0, 0, 0))));
        assert!(ops.iter().any(|op| matches!(op, SurfaceOp::Fill)));
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn test_config_background_when_target_has_none() {
        let mut renderer = headless();
        let mut node = SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 5.0, 5.0)));
        renderer.frame(&mut node, 0.0).unwrap();
        assert_eq!(
            renderer.backend().last_frame()[0],
            SurfaceOp::Clear(Some(Color::rgb(255, 255, 255)))
        );
    }

    #[test]
    fn test_delta_follows_timestamps() {
        let mut renderer = headless();
        let mut scene = Scene::new(10.0, 10.0);
        let mut node = SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 1.0, 1.0)));
        node.animate("pos.x", 10.0, 10.0);
        let id = scene.add_node(node);

        assert!((renderer.frame(&mut scene, 1000.0).unwrap() - 1.0).abs() < 1e-9);
        let half = 1000.0 + renderer.config().max_delta * 1000.0;
        let delta = renderer.frame(&mut scene, half).unwrap();
        assert!((delta - renderer.config().max_delta).abs() < 1e-9);
        assert!(scene.get(id).unwrap().position().x > 0.0);
        assert!(scene.get(id).unwrap().position().y.abs() < 1e-9);
    }

    #[test]
    fn test_debug_bounds_applied_once() {
        let mut renderer = headless();
        let mut scene = Scene::new(10.0, 10.0);
        let id = scene.add_node(SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 1.0, 1.0))));
        renderer.set_debug_bounds(true);
        renderer.frame(&mut scene, 0.0).unwrap();
        assert!(scene.get(id).unwrap().debug_bound);

        scene.get_mut(id).unwrap().debug_bound = false;
        renderer.frame(&mut scene, 16.0).unwrap();
        assert!(!scene.get(id).unwrap().debug_bound);
    }

    #[test]
    fn test_no_clear_when_disabled() {
        let config = RendererConfig {
            clear_each_frame: false,
            ..RendererConfig::default()
        };
        let mut renderer = Renderer::with_backend(config, HeadlessBackend::default()).unwrap();
        renderer.redraw(&Scene::new(1.0, 1.0)).unwrap();
        assert!(renderer.backend().last_frame().is_empty());
    }
}
