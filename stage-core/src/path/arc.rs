//! Elliptical arcs: SVG endpoint form and its center parameterization.
//!
//! Arcs are authored the way SVG writes them: radii, x-axis rotation, the
//! large-arc and sweep flags, and an end point (the start point is wherever
//! the pen is). Bounding, sampling and hit-testing need the center form
//! instead, produced by [`endpoint_to_center`].

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::PathError;
use crate::surface::EllipseSpec;
use crate::Vector2D;

/// Number of samples used when an arc is bounded or flattened.
pub const ARC_SAMPLES: usize = 24;

/// An arc in SVG endpoint form. The start point is implied by the pen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    /// Radii before any correction.
    pub radii: Vector2D,
    /// X-axis rotation in degrees.
    pub rotation: f64,
    /// Take the larger of the two candidate arcs.
    pub large_arc: bool,
    /// Sweep in the positive-angle direction.
    pub sweep: bool,
    /// End point.
    pub to: Vector2D,
}

/// An arc in center form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterArc {
    /// Ellipse center.
    pub center: Vector2D,
    /// Radii after scaling up to fit the chord.
    pub radii: Vector2D,
    /// Axis rotation in radians.
    pub rotation: f64,
    /// Parameter angle of the start point.
    pub start_angle: f64,
    /// Signed sweep; positive when the sweep flag is set.
    pub delta_angle: f64,
}

impl CenterArc {
    /// Parameter angle of the end point.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.delta_angle
    }

    /// Whether the arc runs toward decreasing angles.
    #[must_use]
    pub fn anticlockwise(&self) -> bool {
        self.delta_angle < 0.0
    }

    /// Point on the ellipse at parameter angle `theta`.
    #[must_use]
    pub fn point_at(&self, theta: f64) -> Vector2D {
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let (sin_t, cos_t) = theta.sin_cos();
        let u = self.radii.x * cos_t;
        let v = self.radii.y * sin_t;
        Vector2D::new(
            self.center.x + cos_phi * u - sin_phi * v,
            self.center.y + sin_phi * u + cos_phi * v,
        )
    }

    /// `samples + 1` evenly spaced points from start to end, inclusive.
    #[must_use]
    pub fn sample(&self, samples: usize) -> Vec<Vector2D> {
        let samples = samples.max(1);
        #[allow(clippy::cast_precision_loss)]
        let step = self.delta_angle / samples as f64;
        (0..=samples)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let theta = self.start_angle + step * i as f64;
                self.point_at(theta)
            })
            .collect()
    }

    /// The same arc with center and radii scaled component-wise.
    ///
    /// Only exact for unrotated arcs and positive factors; other cases are
    /// flattened by the caller instead.
    #[must_use]
    pub fn scaled(&self, scale: Vector2D) -> Self {
        Self {
            center: Vector2D::new(self.center.x * scale.x, self.center.y * scale.y),
            radii: Vector2D::new(self.radii.x * scale.x, self.radii.y * scale.y),
            ..*self
        }
    }

    /// Surface-level description of this arc.
    #[must_use]
    pub fn to_ellipse(&self) -> EllipseSpec {
        EllipseSpec {
            center: self.center,
            radii: self.radii,
            rotation: self.rotation,
            start: self.start_angle,
            end: self.end_angle(),
            anticlockwise: self.anticlockwise(),
        }
    }
}

/// Convert an endpoint-form arc starting at `from` to center form.
///
/// Returns `Ok(None)` when the end point equals the start point (the arc
/// draws nothing).
///
/// # Errors
///
/// Returns [`PathError::DegenerateArc`] when a radius is zero but the end
/// points differ.
pub fn endpoint_to_center(from: Vector2D, arc: &ArcSegment) -> Result<Option<CenterArc>, PathError> {
    let to = arc.to;
    if from == to {
        return Ok(None);
    }
    let mut rx = arc.radii.x.abs();
    let mut ry = arc.radii.y.abs();
    if rx == 0.0 || ry == 0.0 {
        return Err(PathError::DegenerateArc { from, to });
    }

    let phi = arc.rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Chord midpoint offset, rotated into the ellipse's own frame.
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Radii too small for the chord are scaled up, never down.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let k = lambda.sqrt();
        rx *= k;
        ry *= k;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let numerator = (rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2).max(0.0);
    let denominator = rx2 * y1p2 + ry2 * x1p2;
    let sign = if arc.large_arc == arc.sweep { -1.0 } else { 1.0 };
    let coef = sign * (numerator / denominator).sqrt();
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    let center = Vector2D::new(
        cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0,
        sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0,
    );

    let a = Vector2D::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let b = Vector2D::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let start_angle = Vector2D::new(1.0, 0.0).angle_to(a);
    let mut delta_angle = a.angle_to(b);
    if !arc.sweep && delta_angle > 0.0 {
        delta_angle -= TAU;
    } else if arc.sweep && delta_angle < 0.0 {
        delta_angle += TAU;
    }

    Ok(Some(CenterArc {
        center,
        radii: Vector2D::new(rx, ry),
        rotation: phi,
        start_angle,
        delta_angle,
    }))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    fn segment(rx: f64, ry: f64, large: bool, sweep: bool, to: (f64, f64)) -> ArcSegment {
        ArcSegment {
            radii: Vector2D::new(rx, ry),
            rotation: 0.0,
            large_arc: large,
            sweep,
            to: to.into(),
        }
    }

    #[test]
    fn test_quarter_circle_center() {
        let from = Vector2D::new(0.0, -50.0);
        let arc = endpoint_to_center(from, &segment(50.0, 50.0, false, true, (50.0, 0.0)))
            .unwrap()
            .unwrap();

        assert!(arc.center.approx_eq(Vector2D::ZERO, 1e-9));
        assert!((arc.center.distance(from) - 50.0).abs() < 1e-9);
        assert!((arc.center.distance(Vector2D::new(50.0, 0.0)) - 50.0).abs() < 1e-9);
        assert!((arc.start_angle + FRAC_PI_2).abs() < 1e-9);
        assert!((arc.delta_angle - FRAC_PI_2).abs() < 1e-9);
        assert!(arc.point_at(arc.end_angle()).approx_eq(Vector2D::new(50.0, 0.0), 1e-9));
    }

    #[test]
    fn test_flag_combinations_pick_sign_and_center() {
        let from = Vector2D::new(0.0, -50.0);
        let to = (50.0, 0.0);
        for (large, sweep) in [(false, false), (false, true), (true, false), (true, true)] {
            let arc = endpoint_to_center(from, &segment(50.0, 50.0, large, sweep, to))
                .unwrap()
                .unwrap();
            assert_eq!(arc.delta_angle > 0.0, sweep, "large={large} sweep={sweep}");
            assert_eq!(arc.delta_angle.abs() > PI, large, "large={large} sweep={sweep}");
            assert!((arc.center.distance(from) - 50.0).abs() < 1e-9);
            assert!(arc.point_at(arc.end_angle()).approx_eq(to.into(), 1e-9));
        }
    }

    #[test]
    fn test_small_radii_scale_up() {
        let from = Vector2D::new(-10.0, 0.0);
        let arc = endpoint_to_center(from, &segment(1.0, 1.0, false, true, (10.0, 0.0)))
            .unwrap()
            .unwrap();
        assert!((arc.radii.x - 10.0).abs() < 1e-9);
        assert!(arc.center.approx_eq(Vector2D::ZERO, 1e-9));
        assert!((arc.delta_angle.abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_ellipse_hits_end_point() {
        let from = Vector2D::new(10.0, 20.0);
        let seg = ArcSegment {
            radii: Vector2D::new(30.0, 12.0),
            rotation: 35.0,
            large_arc: true,
            sweep: false,
            to: Vector2D::new(40.0, 35.0),
        };
        let arc = endpoint_to_center(from, &seg).unwrap().unwrap();
        assert!(arc.point_at(arc.start_angle).approx_eq(from, 1e-6));
        assert!(arc.point_at(arc.end_angle()).approx_eq(seg.to, 1e-6));
    }

    #[test]
    fn test_degenerate_arc_is_rejected() {
        let err = endpoint_to_center(Vector2D::ZERO, &segment(0.0, 5.0, false, true, (10.0, 0.0)));
        assert!(matches!(err, Err(PathError::DegenerateArc { .. })));

        let same = endpoint_to_center(Vector2D::ZERO, &segment(0.0, 0.0, false, true, (0.0, 0.0)));
        assert!(matches!(same, Ok(None)));
    }

    #[test]
    fn test_sample_count_and_endpoints() {
        let from = Vector2D::new(0.0, -50.0);
        let arc = endpoint_to_center(from, &segment(50.0, 50.0, false, true, (50.0, 0.0)))
            .unwrap()
            .unwrap();
        let points = arc.sample(ARC_SAMPLES);
        assert_eq!(points.len(), ARC_SAMPLES + 1);
        assert!(points[0].approx_eq(from, 1e-9));
    }
}
