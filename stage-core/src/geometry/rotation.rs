use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{Vector2D, EPSILON};

/// An angle in radians.
///
/// Two rotations compare equal when their radian values differ by at most
/// [`EPSILON`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation2D {
    rad: f64,
}

impl Rotation2D {
    /// No rotation.
    pub const ZERO: Self = Self::new(0.0);

    /// Create a rotation from radians.
    #[must_use]
    pub const fn new(rad: f64) -> Self {
        Self { rad }
    }

    /// Create a rotation from degrees.
    #[must_use]
    pub fn from_degrees(deg: f64) -> Self {
        Self::new(deg * PI / 180.0)
    }

    /// Angle in radians.
    #[must_use]
    pub const fn rad(&self) -> f64 {
        self.rad
    }

    /// Angle in degrees (derived view of the radian value).
    #[must_use]
    pub fn deg(&self) -> f64 {
        self.rad * 180.0 / PI
    }

    /// Set the angle in radians.
    pub fn set_rad(&mut self, rad: f64) -> &mut Self {
        self.rad = rad;
        self
    }

    /// Set the angle in degrees.
    pub fn set_deg(&mut self, deg: f64) -> &mut Self {
        self.rad = deg * PI / 180.0;
        self
    }

    /// Add another rotation in place.
    pub fn add(&mut self, other: Self) -> &mut Self {
        self.rad += other.rad;
        self
    }

    /// Subtract another rotation in place.
    pub fn sub(&mut self, other: Self) -> &mut Self {
        self.rad -= other.rad;
        self
    }

    /// Rotate a vector by this angle, returning the rotated copy.
    #[must_use]
    pub fn apply(&self, mut v: Vector2D) -> Vector2D {
        v.rotate(self.rad);
        v
    }

    /// Rotate a vector by the opposite of this angle.
    #[must_use]
    pub fn unapply(&self, mut v: Vector2D) -> Vector2D {
        v.rotate(-self.rad);
        v
    }
}

impl PartialEq for Rotation2D {
    fn eq(&self, other: &Self) -> bool {
        (self.rad - other.rad).abs() <= EPSILON
    }
}

impl From<f64> for Rotation2D {
    fn from(rad: f64) -> Self {
        Self::new(rad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_view() {
        let r = Rotation2D::new(PI);
        assert!((r.deg() - 180.0).abs() < 1e-12);

        let mut r = Rotation2D::ZERO;
        r.set_deg(90.0);
        assert!((r.rad() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_epsilon_equality() {
        assert_eq!(Rotation2D::new(1.0), Rotation2D::new(1.00005));
        assert_ne!(Rotation2D::new(1.0), Rotation2D::new(1.001));
    }

    #[test]
    fn test_apply_unapply_inverse() {
        let r = Rotation2D::from_degrees(33.0);
        let v = Vector2D::new(3.0, -7.0);
        assert!(r.unapply(r.apply(v)).approx_eq(v, 1e-12));
    }
}
