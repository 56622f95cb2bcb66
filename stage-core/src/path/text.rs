//! Text graphic: a single line of text centered on the local origin.

use std::cell::Cell;

use crate::surface::{DrawingSurface, TextMetrics};
use crate::{Rect2D, Vector2D};

use super::PathGraphic;

/// A single line of centered text.
///
/// The bound starts as an estimate (`0.6em` advance per character) and is
/// replaced by measured metrics the first time the text is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGraphic {
    text: String,
    family: String,
    size: f64,
    bound: Cell<Rect2D>,
}

impl TextGraphic {
    /// Default font family.
    pub const DEFAULT_FAMILY: &'static str = "sans-serif";

    /// Create a text graphic with a base font size in pixels.
    #[must_use]
    pub fn new(text: impl Into<String>, size: f64) -> Self {
        let text = text.into();
        let bound = Cell::new(Self::estimate(&text, size));
        Self {
            text,
            family: Self::DEFAULT_FAMILY.to_string(),
            size,
            bound,
        }
    }

    /// Builder-style font family override.
    #[must_use]
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    fn estimate(text: &str, size: f64) -> Rect2D {
        #[allow(clippy::cast_precision_loss)]
        let width = text.chars().count() as f64 * size * 0.6;
        Rect2D::new(-width / 2.0, -size / 2.0, width, size)
    }

    fn centered(metrics: &TextMetrics) -> Rect2D {
        let height = metrics.height();
        Rect2D::new(-metrics.width / 2.0, -height / 2.0, metrics.width, height)
    }

    /// The displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and fall back to an estimated bound until the next render.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.bound.set(Self::estimate(&self.text, self.size));
    }

    /// Base font size in pixels.
    #[must_use]
    pub const fn size(&self) -> f64 {
        self.size
    }

    /// CSS font shorthand for this text.
    #[must_use]
    pub fn font(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }

    /// Current bound: measured if rendered at least once, estimated otherwise.
    #[must_use]
    pub fn bound(&self) -> Rect2D {
        self.bound.get()
    }

    /// Measure against `surface` and cache the resulting bound.
    pub fn measure(&self, surface: &mut dyn DrawingSurface) -> TextMetrics {
        surface.set_font(&self.font());
        let metrics = surface.measure_text(&self.text);
        self.bound.set(Self::centered(&metrics));
        metrics
    }

    /// Draw the text centered on the origin at `scale`.
    pub fn render(&self, surface: &mut dyn DrawingSurface, scale: Vector2D, stroke: bool, fill: bool) {
        surface.save();
        surface.scale(scale.x, scale.y);
        let metrics = self.measure(surface);
        let x = -metrics.width / 2.0;
        let baseline = (metrics.ascent - metrics.descent) / 2.0;
        if fill {
            surface.fill_text(&self.text, x, baseline);
        }
        if stroke {
            surface.stroke_text(&self.text, x, baseline);
        }
        surface.restore();
    }

    /// Draw the bound outline at `scale`.
    pub fn render_bound(
        &self,
        surface: &mut dyn DrawingSurface,
        scale: Vector2D,
        stroke: bool,
        fill: bool,
    ) {
        PathGraphic::rect(self.bound()).render(surface, scale, stroke, fill);
    }

    /// Whether `point` falls inside the bound scaled by `scale`.
    #[must_use]
    pub fn bound_contains(&self, point: Vector2D, scale: Vector2D) -> bool {
        self.bound().scaled(scale).contains(point)
    }
}
