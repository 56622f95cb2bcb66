//! Browser 2D canvas backend.
//!
//! Forwards every [`DrawingSurface`] call to a `CanvasRenderingContext2d`.
//! Canvas calls that can throw are logged and otherwise ignored so a single
//! bad draw never aborts a frame.

use stage_core::{Color, DrawingSurface, EllipseSpec, TextMetrics};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// 2D canvas renderer.
pub struct Canvas2DBackend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2DBackend {
    /// Wrap an existing canvas element.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas has no 2D context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> RenderResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RenderError::Surface(js_message(&e)))?
            .ok_or_else(|| RenderError::NoBackend("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::Surface("context is not a 2d context".to_string()))?;
        tracing::debug!(
            "Canvas2D attached to {}x{} canvas",
            canvas.width(),
            canvas.height()
        );
        Ok(Self { canvas, ctx })
    }

    /// Look up a canvas by element id and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no document, no such element, or the
    /// element is not a canvas.
    pub fn from_element_id(id: &str) -> RenderResult<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| RenderError::NoBackend("no document available".to_string()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| RenderError::Surface(format!("no element with id '{id}'")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RenderError::Surface(format!("element '{id}' is not a canvas")))?;
        Self::from_canvas(canvas)
    }

    /// The underlying canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Canvas bounding rectangle, for input mapping.
    #[must_use]
    pub fn client_rect(&self) -> crate::binder::ClientRect {
        crate::binder::ClientRect::from(&self.canvas.get_bounding_client_rect())
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn log_js(op: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!("Canvas2D {op} failed: {}", js_message(&e));
    }
}

impl DrawingSurface for Canvas2DBackend {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        log_js("translate", self.ctx.translate(x, y));
    }

    fn rotate(&mut self, radians: f64) {
        log_js("rotate", self.ctx.rotate(radians));
    }

    fn scale(&mut self, x: f64, y: f64) {
        log_js("scale", self.ctx.scale(x, y));
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quadratic_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cx, cy, x, y);
    }

    fn bezier_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.ctx.bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn ellipse(&mut self, spec: &EllipseSpec) {
        log_js(
            "ellipse",
            self.ctx.ellipse_with_anticlockwise(
                spec.center.x,
                spec.center.y,
                spec.radii.x.abs(),
                spec.radii.y.abs(),
                spec.rotation,
                spec.start,
                spec.end,
                spec.anticlockwise,
            ),
        );
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ctx.set_fill_style_str(color.hex());
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ctx.set_stroke_style_str(color.hex());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_shadow(&mut self, blur: f64, color: &Color) {
        self.ctx.set_shadow_blur(blur);
        self.ctx.set_shadow_color(color.hex());
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        match self.ctx.measure_text(text) {
            Ok(m) => TextMetrics {
                width: m.width(),
                ascent: m.actual_bounding_box_ascent(),
                descent: m.actual_bounding_box_descent(),
            },
            Err(e) => {
                tracing::warn!("Canvas2D measure_text failed: {}", js_message(&e));
                TextMetrics::default()
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        log_js("fill_text", self.ctx.fill_text(text, x, y));
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        log_js("stroke_text", self.ctx.stroke_text(text, x, y));
    }

    fn clear(&mut self, background: Option<&Color>) {
        let w = f64::from(self.canvas.width());
        let h = f64::from(self.canvas.height());
        self.ctx.save();
        log_js("reset transform", self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0));
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if let Some(color) = background {
            self.ctx.set_fill_style_str(color.hex());
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
        self.ctx.restore();
    }
}

impl RenderBackend for Canvas2DBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn surface(&mut self) -> &mut dyn DrawingSurface {
        self
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        tracing::debug!("Canvas2D resized to {}x{}", width, height);
        Ok(())
    }
}
