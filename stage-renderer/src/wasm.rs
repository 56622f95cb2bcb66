//! WebAssembly bindings for the renderer.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.

use wasm_bindgen::prelude::*;

use stage_core::{Color, KeyEvent, KeyPhase, PathGraphic, PointerKind, Scene, SceneNode, Vector2D};

use crate::backend::canvas2d::Canvas2DBackend;
use crate::{InputBinder, Renderer, RendererConfig};

/// Element id the renderer looks for when no canvas is given.
pub const CANVAS_ID: &str = "stage";

/// Initialize the renderer WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// A scene bound to a page canvas.
#[wasm_bindgen]
pub struct WasmStage {
    scene: Scene,
    renderer: Renderer<Canvas2DBackend>,
    binder: InputBinder,
}

#[wasm_bindgen]
impl WasmStage {
    /// Attach to the canvas with the given element id.
    ///
    /// # Errors
    ///
    /// Returns an error string if the canvas cannot be found.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WasmStage, String> {
        let backend = Canvas2DBackend::from_element_id(canvas_id).map_err(|e| e.to_string())?;
        let rect = backend.client_rect();
        let (width, height) = crate::RenderBackend::size(&backend);
        let config = RendererConfig {
            width,
            height,
            ..RendererConfig::default()
        };
        let renderer = Renderer::with_backend(config, backend).map_err(|e| e.to_string())?;
        Ok(Self {
            scene: Scene::new(f64::from(width), f64::from(height)),
            renderer,
            binder: InputBinder::new(rect, width, height),
        })
    }

    /// Add a shape from SVG-style path data. Returns the node id.
    ///
    /// # Errors
    ///
    /// Returns an error string if the path or color does not parse.
    #[wasm_bindgen(js_name = addShape)]
    pub fn add_shape(&mut self, path: &str, x: f64, y: f64, fill: &str) -> Result<String, String> {
        let graphic = PathGraphic::parse(path).map_err(|e| e.to_string())?;
        let fill: Color = fill.parse().map_err(|e: stage_core::StageError| e.to_string())?;
        let mut node = SceneNode::shape(graphic);
        node.set_position(Vector2D::new(x, y));
        node.style.fill = Some(fill);
        Ok(self.scene.add_node(node).to_string())
    }

    /// Advance and draw one frame.
    ///
    /// # Errors
    ///
    /// Returns an error string if drawing fails.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), String> {
        self.renderer
            .frame(&mut self.scene, now_ms)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    /// Forward a pointer event in client coordinates.
    pub fn pointer(&mut self, kind: &str, client_x: f64, client_y: f64) {
        let kind = match kind {
            "down" => PointerKind::Down,
            "up" => PointerKind::Up,
            "wheel" => PointerKind::Wheel,
            _ => PointerKind::Move,
        };
        self.binder.dispatch_pointer(&mut self.scene, kind, client_x, client_y);
    }

    /// Forward a key event.
    pub fn key(&mut self, phase: &str, key: &str) {
        let phase = match phase {
            "up" => KeyPhase::Up,
            "press" => KeyPhase::Press,
            _ => KeyPhase::Down,
        };
        self.binder.dispatch_key(&mut self.scene, &KeyEvent::new(phase, key));
    }

    /// Resize the canvas and rebind input.
    ///
    /// # Errors
    ///
    /// Returns an error string if the size is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.renderer.resize(width, height).map_err(|e| e.to_string())?;
        self.scene.set_viewport(f64::from(width), f64::from(height));
        let rect = self.renderer.backend().client_rect();
        self.binder.resize(rect, width, height);
        Ok(())
    }

    /// Toggle bound outlines.
    #[wasm_bindgen(js_name = setDebugBounds)]
    pub fn set_debug_bounds(&mut self, on: bool) {
        self.renderer.set_debug_bounds(on);
    }
}
