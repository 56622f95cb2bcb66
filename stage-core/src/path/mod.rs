//! Path graphics: the path mini-language, authored bounds, rendering and
//! hit-testing.
//!
//! ## Path language
//!
//! ```text
//! M x y                    move
//! L x y                    line
//! H x                      horizontal line
//! V y                      vertical line
//! Q cx cy x y              quadratic curve
//! C c1x c1y c2x c2y x y    cubic curve
//! A rx ry rot large sweep x y
//!                          elliptical arc (SVG endpoint form)
//! Z                        close
//! ```
//!
//! Arguments are separated by commas or whitespace.

pub mod arc;
mod parse;
mod text;

pub use arc::{endpoint_to_center, ArcSegment, CenterArc, ARC_SAMPLES};
pub use text::TextGraphic;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presets::{PathPreset, PresetTable};
use crate::surface::DrawingSurface;
use crate::{Rect2D, Vector2D};

/// Segments used when flattening Bézier curves for hit-testing.
const CURVE_SEGMENTS: usize = 16;

/// Errors from parsing or replaying path data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// A letter that is not a path command.
    #[error("unknown path command {0:?}")]
    UnknownCommand(char),

    /// Numbers appeared before any command letter.
    #[error("expected a command letter at token {0}")]
    MissingCommand(usize),

    /// A command did not receive all of its arguments.
    #[error("command {command} expects {expected} arguments, found {found}")]
    MissingArguments {
        /// The command letter.
        command: char,
        /// Arguments per group.
        expected: usize,
        /// Arguments present.
        found: usize,
    },

    /// A token could not be read as a number.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// An arc with a zero radius between two distinct points.
    #[error("degenerate arc from {from} to {to}: radii must be non-zero")]
    DegenerateArc {
        /// Pen position at the arc.
        from: Vector2D,
        /// Arc end point.
        to: Vector2D,
    },
}

/// One typed drawing command (absolute coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "args", rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum PathCommand {
    /// Move the pen.
    Move(Vector2D),
    /// Straight line.
    Line(Vector2D),
    /// Horizontal line to an x coordinate.
    Horizontal(f64),
    /// Vertical line to a y coordinate.
    Vertical(f64),
    /// Quadratic Bézier.
    Quadratic { control: Vector2D, to: Vector2D },
    /// Cubic Bézier.
    Cubic {
        control1: Vector2D,
        control2: Vector2D,
        to: Vector2D,
    },
    /// Elliptical arc in endpoint form.
    Arc(ArcSegment),
    /// Close the sub-path.
    Close,
}

/// A replayed command with the pen position it starts from and, for arcs,
/// the resolved center form.
enum Step {
    Move(Vector2D),
    Line(Vector2D),
    Quadratic(Vector2D, Vector2D),
    Cubic(Vector2D, Vector2D, Vector2D),
    Arc(CenterArc, Vector2D),
    Close,
}

/// Replay commands with a virtual pen, resolving relative-to-pen commands
/// (H, V, arcs) into absolute steps.
fn replay(commands: &[PathCommand]) -> Result<Vec<Step>, PathError> {
    let mut pen = Vector2D::ZERO;
    let mut start = Vector2D::ZERO;
    let mut steps = Vec::with_capacity(commands.len());

    for command in commands {
        match *command {
            PathCommand::Move(p) => {
                pen = p;
                start = p;
                steps.push(Step::Move(p));
            }
            PathCommand::Line(p) => {
                pen = p;
                steps.push(Step::Line(p));
            }
            PathCommand::Horizontal(x) => {
                pen.x = x;
                steps.push(Step::Line(pen));
            }
            PathCommand::Vertical(y) => {
                pen.y = y;
                steps.push(Step::Line(pen));
            }
            PathCommand::Quadratic { control, to } => {
                pen = to;
                steps.push(Step::Quadratic(control, to));
            }
            PathCommand::Cubic {
                control1,
                control2,
                to,
            } => {
                pen = to;
                steps.push(Step::Cubic(control1, control2, to));
            }
            PathCommand::Arc(ref arc) => {
                match endpoint_to_center(pen, arc)? {
                    Some(center) => steps.push(Step::Arc(center, arc.to)),
                    None => steps.push(Step::Line(arc.to)),
                }
                pen = arc.to;
            }
            PathCommand::Close => {
                pen = start;
                steps.push(Step::Close);
            }
        }
    }
    Ok(steps)
}

fn scale_point(p: Vector2D, scale: Vector2D) -> Vector2D {
    Vector2D::new(p.x * scale.x, p.y * scale.y)
}

fn quadratic_point(p0: Vector2D, c: Vector2D, p1: Vector2D, t: f64) -> Vector2D {
    let mt = 1.0 - t;
    p0 * (mt * mt) + c * (2.0 * mt * t) + p1 * (t * t)
}

fn cubic_point(p0: Vector2D, c1: Vector2D, c2: Vector2D, p1: Vector2D, t: f64) -> Vector2D {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + c1 * (3.0 * mt * mt * t) + c2 * (3.0 * mt * t * t) + p1 * (t * t * t)
}

/// Non-zero winding test over a set of implicitly closed polygons.
fn winding_contains(polygons: &[Vec<Vector2D>], p: Vector2D) -> bool {
    let mut winding = 0i32;
    for poly in polygons {
        if poly.len() < 3 {
            continue;
        }
        for (i, a) in poly.iter().enumerate() {
            let b = poly[(i + 1) % poly.len()];
            let side = (b - *a).cross(p - *a);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
    }
    winding != 0
}

/// An authored vector path with its bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGraphic {
    commands: Vec<PathCommand>,
    bound: Rect2D,
    outline: Vec<PathCommand>,
}

impl PathGraphic {
    /// Build from commands, validating arcs and computing the bound.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::DegenerateArc`] for zero-radius arcs between
    /// distinct points.
    pub fn from_commands(commands: Vec<PathCommand>) -> Result<Self, PathError> {
        let bound = Self::calculate_boundary(&commands)?;
        let outline = Self::outline_of(&bound);
        Ok(Self {
            commands,
            bound,
            outline,
        })
    }

    /// Parse path-language source.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed source or degenerate arcs.
    pub fn parse(source: &str) -> Result<Self, PathError> {
        Self::from_commands(parse::parse(source)?)
    }

    /// A closed line loop through `points`.
    #[must_use]
    pub fn polygon(points: &[Vector2D]) -> Self {
        let mut commands = Vec::with_capacity(points.len() + 1);
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            commands.push(PathCommand::Move(*first));
            commands.extend(iter.map(|p| PathCommand::Line(*p)));
            commands.push(PathCommand::Close);
        }
        let bound = Rect2D::from_points(points.iter().copied()).unwrap_or_default();
        let outline = Self::outline_of(&bound);
        Self {
            commands,
            bound,
            outline,
        }
    }

    /// An axis-aligned rectangle path.
    #[must_use]
    pub fn rect(rect: Rect2D) -> Self {
        Self::polygon(&rect.corners())
    }

    /// Resolve `name` through `table`; unknown names are parsed as literal
    /// path source.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is unknown and is not valid path source.
    pub fn named(name: &str, table: &PresetTable) -> Result<Self, PathError> {
        match table.path(name) {
            Some(PathPreset::Polygon(points)) => {
                let points: Vec<Vector2D> = points.iter().copied().map(Vector2D::from).collect();
                Ok(Self::polygon(&points))
            }
            Some(PathPreset::Path(source)) => Self::parse(source),
            None => {
                tracing::trace!("No preset named {name:?}, parsing as path source");
                Self::parse(name)
            }
        }
    }

    /// Resolve `name` through the built-in preset table.
    ///
    /// # Errors
    ///
    /// See [`PathGraphic::named`].
    pub fn preset(name: &str) -> Result<Self, PathError> {
        Self::named(name, PresetTable::builtin())
    }

    /// Commands in authored order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Authored bounding rectangle.
    #[must_use]
    pub const fn bound(&self) -> Rect2D {
        self.bound
    }

    /// Closed rectangle path tracing the bound.
    #[must_use]
    pub fn outline(&self) -> &[PathCommand] {
        &self.outline
    }

    /// Replay `commands` with a virtual pen and grow a bounding rectangle.
    ///
    /// Curves contribute their control points (an over-estimate); arcs are
    /// sampled at [`ARC_SAMPLES`] points along their swept range.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::DegenerateArc`] for invalid arcs.
    pub fn calculate_boundary(commands: &[PathCommand]) -> Result<Rect2D, PathError> {
        let mut bound: Option<Rect2D> = None;
        let mut include = |p: Vector2D| match bound.as_mut() {
            Some(b) => {
                b.expand(p);
            }
            None => bound = Some(Rect2D::at(p)),
        };
        let mut pen = Vector2D::ZERO;
        let mut start = Vector2D::ZERO;

        for step in replay(commands)? {
            match step {
                Step::Move(p) => {
                    include(p);
                    pen = p;
                    start = p;
                }
                Step::Line(p) => {
                    include(pen);
                    include(p);
                    pen = p;
                }
                Step::Quadratic(c, p) => {
                    include(pen);
                    include(c);
                    include(p);
                    pen = p;
                }
                Step::Cubic(c1, c2, p) => {
                    include(pen);
                    include(c1);
                    include(c2);
                    include(p);
                    pen = p;
                }
                Step::Arc(arc, p) => {
                    for sample in arc.sample(ARC_SAMPLES) {
                        include(sample);
                    }
                    pen = p;
                }
                Step::Close => pen = start,
            }
        }
        Ok(bound.unwrap_or_default())
    }

    fn outline_of(bound: &Rect2D) -> Vec<PathCommand> {
        let [a, b, c, d] = bound.corners();
        vec![
            PathCommand::Move(a),
            PathCommand::Line(b),
            PathCommand::Line(c),
            PathCommand::Line(d),
            PathCommand::Close,
        ]
    }

    fn steps(commands: &[PathCommand]) -> Vec<Step> {
        // Constructors validate arcs, so replay cannot fail on stored commands.
        replay(commands).unwrap_or_default()
    }

    fn emit(
        commands: &[PathCommand],
        surface: &mut dyn DrawingSurface,
        scale: Vector2D,
        stroke: bool,
        fill: bool,
    ) {
        surface.begin_path();
        let mut pen = Vector2D::ZERO;
        for step in Self::steps(commands) {
            match step {
                Step::Move(p) => {
                    let p = scale_point(p, scale);
                    surface.move_to(p.x, p.y);
                    pen = p;
                }
                Step::Line(p) => {
                    let p = scale_point(p, scale);
                    surface.line_to(p.x, p.y);
                    pen = p;
                }
                Step::Quadratic(c, p) => {
                    let (c, p) = (scale_point(c, scale), scale_point(p, scale));
                    surface.quadratic_to(c.x, c.y, p.x, p.y);
                    pen = p;
                }
                Step::Cubic(c1, c2, p) => {
                    let (c1, c2, p) = (
                        scale_point(c1, scale),
                        scale_point(c2, scale),
                        scale_point(p, scale),
                    );
                    surface.bezier_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                    pen = p;
                }
                Step::Arc(arc, p) => {
                    if arc.rotation == 0.0 && scale.x > 0.0 && scale.y > 0.0 {
                        surface.ellipse(&arc.scaled(scale).to_ellipse());
                    } else {
                        for sample in arc.sample(ARC_SAMPLES).into_iter().skip(1) {
                            let s = scale_point(sample, scale);
                            surface.line_to(s.x, s.y);
                        }
                    }
                    pen = scale_point(p, scale);
                }
                Step::Close => surface.close_path(),
            }
        }
        tracing::trace!("Path emitted, pen at {pen}");
        if fill {
            surface.fill();
        }
        if stroke {
            surface.stroke();
        }
    }

    /// Draw the path at a non-uniform `scale`.
    pub fn render(&self, surface: &mut dyn DrawingSurface, scale: Vector2D, stroke: bool, fill: bool) {
        Self::emit(&self.commands, surface, scale, stroke, fill);
    }

    /// Draw the bound outline at a non-uniform `scale`.
    pub fn render_bound(
        &self,
        surface: &mut dyn DrawingSurface,
        scale: Vector2D,
        stroke: bool,
        fill: bool,
    ) {
        Self::emit(&self.outline, surface, scale, stroke, fill);
    }

    /// Flatten into polygons (one per sub-path) at `scale`.
    #[must_use]
    pub fn flatten(&self, scale: Vector2D) -> Vec<Vec<Vector2D>> {
        let mut polygons: Vec<Vec<Vector2D>> = Vec::new();
        let mut current: Vec<Vector2D> = Vec::new();
        let mut pen = Vector2D::ZERO;
        let mut start = Vector2D::ZERO;

        let curve_steps = || (1..=CURVE_SEGMENTS).map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / CURVE_SEGMENTS as f64;
            t
        });

        for step in Self::steps(&self.commands) {
            match step {
                Step::Move(p) => {
                    if current.len() > 1 {
                        polygons.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                    pen = p;
                    start = p;
                }
                Step::Line(p) => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    current.push(p);
                    pen = p;
                }
                Step::Quadratic(c, p) => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    current.extend(curve_steps().map(|t| quadratic_point(pen, c, p, t)));
                    pen = p;
                }
                Step::Cubic(c1, c2, p) => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    current.extend(curve_steps().map(|t| cubic_point(pen, c1, c2, p, t)));
                    pen = p;
                }
                Step::Arc(arc, p) => {
                    if current.is_empty() {
                        current.push(pen);
                    }
                    current.extend(arc.sample(ARC_SAMPLES).into_iter().skip(1));
                    pen = p;
                }
                Step::Close => {
                    if current.len() > 1 {
                        polygons.push(std::mem::take(&mut current));
                    }
                    pen = start;
                }
            }
        }
        if current.len() > 1 {
            polygons.push(current);
        }
        for poly in &mut polygons {
            for p in poly.iter_mut() {
                *p = scale_point(*p, scale);
            }
        }
        polygons
    }

    /// Whether `point` falls inside the path filled at `scale` (non-zero rule).
    #[must_use]
    pub fn contains(&self, point: Vector2D, scale: Vector2D) -> bool {
        winding_contains(&self.flatten(scale), point)
    }

    /// Whether `point` falls inside the bound scaled by `scale`.
    #[must_use]
    pub fn bound_contains(&self, point: Vector2D, scale: Vector2D) -> bool {
        self.bound.scaled(scale).contains(point)
    }
}

impl Default for PathGraphic {
    fn default() -> Self {
        Self::rect(Rect2D::new(0.0, 0.0, 1.0, 1.0))
    }
}

/// What a scene node draws: a path or a line of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Graphic {
    /// Vector path.
    Path(PathGraphic),
    /// Centered text.
    Text(TextGraphic),
}

impl Graphic {
    /// Authored bounding rectangle.
    #[must_use]
    pub fn bound(&self) -> Rect2D {
        match self {
            Self::Path(path) => path.bound(),
            Self::Text(text) => text.bound(),
        }
    }

    /// Draw at `scale`.
    pub fn render(&self, surface: &mut dyn DrawingSurface, scale: Vector2D, stroke: bool, fill: bool) {
        match self {
            Self::Path(path) => path.render(surface, scale, stroke, fill),
            Self::Text(text) => text.render(surface, scale, stroke, fill),
        }
    }

    /// Draw the bound outline at `scale`.
    pub fn render_bound(
        &self,
        surface: &mut dyn DrawingSurface,
        scale: Vector2D,
        stroke: bool,
        fill: bool,
    ) {
        match self {
            Self::Path(path) => path.render_bound(surface, scale, stroke, fill),
            Self::Text(text) => text.render_bound(surface, scale, stroke, fill),
        }
    }

    /// Hit-test the drawn shape at `scale`. Text hits its bound.
    #[must_use]
    pub fn contains(&self, point: Vector2D, scale: Vector2D) -> bool {
        match self {
            Self::Path(path) => path.contains(point, scale),
            Self::Text(text) => text.bound_contains(point, scale),
        }
    }

    /// Hit-test the bound at `scale`.
    #[must_use]
    pub fn bound_contains(&self, point: Vector2D, scale: Vector2D) -> bool {
        match self {
            Self::Path(path) => path.bound_contains(point, scale),
            Self::Text(text) => text.bound_contains(point, scale),
        }
    }
}

impl Default for Graphic {
    fn default() -> Self {
        Self::Path(PathGraphic::default())
    }
}

impl From<PathGraphic> for Graphic {
    fn from(path: PathGraphic) -> Self {
        Self::Path(path)
    }
}

impl From<TextGraphic> for Graphic {
    fn from(text: TextGraphic) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn test_polygon_bound_and_outline() {
        let path = PathGraphic::polygon(&[
            Vector2D::new(-1.0, -2.0),
            Vector2D::new(3.0, 0.0),
            Vector2D::new(0.0, 4.0),
        ]);
        assert_eq!(path.bound(), Rect2D::new(-1.0, -2.0, 4.0, 6.0));
        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.outline().len(), 5);
    }

    #[test]
    fn test_curves_bound_by_control_points() {
        let path = PathGraphic::parse("M 0 0 Q 5 -10 10 0 C 12 20 14 -30 16 0").unwrap();
        assert_eq!(path.bound(), Rect2D::new(0.0, -30.0, 16.0, 50.0));
    }

    #[test]
    fn test_h_v_use_pen() {
        let path = PathGraphic::parse("M 2 3 H 10 V 7 Z").unwrap();
        assert_eq!(path.bound(), Rect2D::new(2.0, 3.0, 8.0, 4.0));
    }

    #[test]
    fn test_arc_bound_is_sampled() {
        // Half circle from the top through the right side to the bottom.
        let path = PathGraphic::parse("M 0 -50 A 50 50 0 0 1 0 50").unwrap();
        let b = path.bound();
        assert!((b.right() - 50.0).abs() < 1e-9);
        assert!((b.top() + 50.0).abs() < 1e-9);
        assert!((b.bottom() - 50.0).abs() < 1e-9);
        assert!(b.left().abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_arc_fails_loud() {
        let err = PathGraphic::parse("M 0 0 A 0 10 0 0 1 10 10").unwrap_err();
        assert!(matches!(err, PathError::DegenerateArc { .. }));
    }

    #[test]
    fn test_named_presets_and_fallthrough() {
        let rect = PathGraphic::preset("rect").unwrap();
        assert_eq!(rect.bound(), Rect2D::new(0.0, 0.0, 1.0, 1.0));

        let circle = PathGraphic::preset("circle").unwrap();
        assert!((circle.bound().width - 1.0).abs() < 1e-9);

        let literal = PathGraphic::preset("M 0 0 L 4 4").unwrap();
        assert_eq!(literal.bound(), Rect2D::new(0.0, 0.0, 4.0, 4.0));

        assert!(PathGraphic::preset("no-such-thing").is_err());
    }

    #[test]
    fn test_render_scales_points() {
        let path = PathGraphic::parse("M 1 1 L 2 3").unwrap();
        let mut surface = RecordingSurface::new();
        path.render(&mut surface, Vector2D::new(2.0, 10.0), true, false);
        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo { x: 2.0, y: 10.0 },
                SurfaceOp::LineTo { x: 4.0, y: 30.0 },
                SurfaceOp::Stroke,
            ]
        );
    }

    #[test]
    fn test_render_arc_as_ellipse_or_samples() {
        let path = PathGraphic::parse("M 0 -50 A 50 50 0 0 1 50 0").unwrap();

        let mut surface = RecordingSurface::new();
        path.render(&mut surface, Vector2D::new(2.0, 1.0), false, true);
        assert_eq!(surface.count(|op| matches!(op, SurfaceOp::Ellipse(_))), 1);

        let mut surface = RecordingSurface::new();
        path.render(&mut surface, Vector2D::new(-1.0, 1.0), false, true);
        assert_eq!(surface.count(|op| matches!(op, SurfaceOp::Ellipse(_))), 0);
        assert_eq!(
            surface.count(|op| matches!(op, SurfaceOp::LineTo { .. })),
            ARC_SAMPLES
        );
    }

    #[test]
    fn test_contains_uses_path_not_bound() {
        let triangle = PathGraphic::polygon(&[
            Vector2D::new(0.0, 0.0),
            Vector2D::new(10.0, 0.0),
            Vector2D::new(0.0, 10.0),
        ]);
        assert!(triangle.contains(Vector2D::new(2.0, 2.0), Vector2D::ONE));
        assert!(!triangle.contains(Vector2D::new(8.0, 8.0), Vector2D::ONE));
        assert!(triangle.bound_contains(Vector2D::new(8.0, 8.0), Vector2D::ONE));
    }

    #[test]
    fn test_contains_respects_scale() {
        let rect = PathGraphic::rect(Rect2D::new(0.0, 0.0, 10.0, 10.0));
        let p = Vector2D::new(15.0, 5.0);
        assert!(!rect.contains(p, Vector2D::ONE));
        assert!(rect.contains(p, Vector2D::new(2.0, 1.0)));
    }

    #[test]
    fn test_circle_contains_center_not_corner() {
        let circle = PathGraphic::preset("circle").unwrap();
        assert!(circle.contains(Vector2D::ZERO, Vector2D::new(10.0, 10.0)));
        assert!(!circle.contains(Vector2D::new(4.8, 4.8), Vector2D::new(10.0, 10.0)));
    }
}
