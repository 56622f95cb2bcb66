//! The drawing-surface boundary.
//!
//! Scene nodes never talk to a concrete graphics API. They emit a small,
//! fixed vocabulary of operations onto a [`DrawingSurface`]: state
//! save/restore, an affine transform stack, path construction, fill/stroke
//! with style, and text measurement/drawing.
//!
//! [`RecordingSurface`] is a headless implementation that records every call
//! as a [`SurfaceOp`]; it backs the headless renderer and the tests.

use serde::{Deserialize, Serialize};

use crate::{Color, Vector2D};

/// Measured extent of a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline to the top of the glyph box.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the glyph box.
    pub descent: f64,
}

impl TextMetrics {
    /// Total glyph-box height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// An elliptical arc in center form, as consumed by [`DrawingSurface::ellipse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseSpec {
    /// Ellipse center.
    pub center: Vector2D,
    /// Radii along the (rotated) axes.
    pub radii: Vector2D,
    /// Axis rotation in radians.
    pub rotation: f64,
    /// Start parameter angle in radians.
    pub start: f64,
    /// End parameter angle in radians.
    pub end: f64,
    /// Sweep direction.
    pub anticlockwise: bool,
}

/// Operations a drawing surface must support.
pub trait DrawingSurface {
    /// Push the current transform and style state.
    fn save(&mut self);
    /// Pop the most recently saved state.
    fn restore(&mut self);

    /// Translate the current transform.
    fn translate(&mut self, x: f64, y: f64);
    /// Rotate the current transform by `radians`.
    fn rotate(&mut self, radians: f64);
    /// Scale the current transform non-uniformly.
    fn scale(&mut self, x: f64, y: f64);

    /// Start a new path.
    fn begin_path(&mut self);
    /// Move the pen without drawing.
    fn move_to(&mut self, x: f64, y: f64);
    /// Straight segment to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);
    /// Quadratic Bézier segment.
    fn quadratic_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    /// Cubic Bézier segment.
    fn bezier_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    /// Elliptical arc in center form.
    fn ellipse(&mut self, spec: &EllipseSpec);
    /// Close the current sub-path.
    fn close_path(&mut self);

    /// Fill the current path.
    fn fill(&mut self);
    /// Stroke the current path.
    fn stroke(&mut self);

    /// Set the fill color.
    fn set_fill_color(&mut self, color: &Color);
    /// Set the stroke color.
    fn set_stroke_color(&mut self, color: &Color);
    /// Set the stroke width.
    fn set_line_width(&mut self, width: f64);
    /// Enable a glow/shadow. A blur of zero disables it.
    fn set_shadow(&mut self, blur: f64, color: &Color);

    /// Set the font used by text operations (CSS font shorthand).
    fn set_font(&mut self, font: &str);
    /// Measure `text` in the current font.
    fn measure_text(&mut self, text: &str) -> TextMetrics;
    /// Fill `text` with its alphabetic baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Stroke `text` with its alphabetic baseline starting at `(x, y)`.
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);

    /// Clear the whole surface, optionally painting a background color.
    fn clear(&mut self, background: Option<&Color>);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum SurfaceOp {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { radians: f64 },
    Scale { x: f64, y: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadraticTo { cx: f64, cy: f64, x: f64, y: f64 },
    BezierTo { c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64 },
    Ellipse(EllipseSpec),
    ClosePath,
    Fill,
    Stroke,
    FillColor(Color),
    StrokeColor(Color),
    LineWidth(f64),
    Shadow { blur: f64, color: Color },
    Font(String),
    FillText { text: String, x: f64, y: f64 },
    StrokeText { text: String, x: f64, y: f64 },
    Clear(Option<Color>),
}

/// Headless surface that records every operation.
///
/// Text is measured with a fixed advance of `0.6em` per character, the em
/// size being read from the leading `<n>px` of the current font.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    font: String,
    depth: usize,
}

impl RecordingSurface {
    /// Font used until [`DrawingSurface::set_font`] is called.
    pub const DEFAULT_FONT: &'static str = "10px sans-serif";

    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font: Self::DEFAULT_FONT.to_string(),
            depth: 0,
        }
    }

    /// Recorded operations, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of saves not yet matched by a restore.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Count recorded operations matching `pred`.
    pub fn count(&self, pred: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    fn font_size(&self) -> f64 {
        self.font
            .split_whitespace()
            .find_map(|part| part.strip_suffix("px")?.parse::<f64>().ok())
            .unwrap_or(10.0)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for RecordingSurface {
    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(SurfaceOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::Translate { x, y });
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(SurfaceOp::Rotate { radians });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::Scale { x, y });
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(SurfaceOp::LineTo { x, y });
    }

    fn quadratic_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.ops.push(SurfaceOp::QuadraticTo { cx, cy, x, y });
    }

    fn bezier_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.ops.push(SurfaceOp::BezierTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        });
    }

    fn ellipse(&mut self, spec: &EllipseSpec) {
        self.ops.push(SurfaceOp::Ellipse(*spec));
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(SurfaceOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ops.push(SurfaceOp::FillColor(color.clone()));
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ops.push(SurfaceOp::StrokeColor(color.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(SurfaceOp::LineWidth(width));
    }

    fn set_shadow(&mut self, blur: f64, color: &Color) {
        self.ops.push(SurfaceOp::Shadow {
            blur,
            color: color.clone(),
        });
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
        self.ops.push(SurfaceOp::Font(font.to_string()));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let size = self.font_size();
        #[allow(clippy::cast_precision_loss)]
        let chars = text.chars().count() as f64;
        TextMetrics {
            width: chars * size * 0.6,
            ascent: size * 0.8,
            descent: size * 0.2,
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(SurfaceOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(SurfaceOp::StrokeText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn clear(&mut self, background: Option<&Color>) {
        self.ops.push(SurfaceOp::Clear(background.cloned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_restore_depth() {
        let mut s = RecordingSurface::new();
        s.save();
        s.save();
        s.restore();
        assert_eq!(s.depth(), 1);
        assert_eq!(s.count(|op| matches!(op, SurfaceOp::Save)), 2);
    }

    #[test]
    fn test_measure_uses_font_size() {
        let mut s = RecordingSurface::new();
        s.set_font("bold 20px serif");
        let m = s.measure_text("abcd");
        assert!((m.width - 48.0).abs() < 1e-9);
        assert!((m.height() - 20.0).abs() < 1e-9);
    }
}
