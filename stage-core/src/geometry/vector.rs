use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{StageError, StageResult};

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vector2D {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// The `(1, 1)` vector, the identity for component-wise scaling.
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Create a vector from two components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a vector from a `[x, y]` pair.
    #[must_use]
    pub const fn from_pair(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }

    /// Create a vector from a slice holding at least two numbers.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, ..] => Some(Self::new(*x, *y)),
            _ => None,
        }
    }

    /// Parse an `"x,y"` (or `"x y"`) literal.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal does not hold exactly two numbers.
    pub fn parse(literal: &str) -> StageResult<Self> {
        literal.parse()
    }

    /// Add another vector in place.
    pub fn add(&mut self, other: Self) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    /// Subtract another vector in place.
    pub fn sub(&mut self, other: Self) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    /// Multiply both components by a factor in place.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self
    }

    /// Multiply component-wise in place.
    pub fn scale_xy(&mut self, factor: Self) -> &mut Self {
        self.x *= factor.x;
        self.y *= factor.y;
        self
    }

    /// Divide component-wise in place.
    pub fn divide_xy(&mut self, divisor: Self) -> &mut Self {
        self.x /= divisor.x;
        self.y /= divisor.y;
        self
    }

    /// Rotate around the origin by `radians` in place.
    ///
    /// With a y-down surface a positive angle turns clockwise on screen.
    pub fn rotate(&mut self, radians: f64) -> &mut Self {
        let (sin, cos) = radians.sin_cos();
        let x = self.x * cos - self.y * sin;
        let y = self.x * sin + self.y * cos;
        self.x = x;
        self.y = y;
        self
    }

    /// Scale to unit length in place. The zero vector is left unchanged.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len > 0.0 {
            self.x /= len;
            self.y /= len;
        }
        self
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(&self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Signed angle from `self` to `other`, in `(-π, π]`.
    #[must_use]
    pub fn angle_to(&self, other: Self) -> f64 {
        self.cross(other).atan2(self.dot(other))
    }

    /// Whether both components are within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl FromStr for Vector2D {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let [x, y] = parts.as_slice() else {
            return Err(StageError::Parse(format!("expected \"x,y\", got {s:?}")));
        };
        let parse = |p: &str| {
            p.parse::<f64>()
                .map_err(|e| StageError::Parse(format!("invalid vector component {p:?}: {e}")))
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

impl From<[f64; 2]> for Vector2D {
    fn from(pair: [f64; 2]) -> Self {
        Self::from_pair(pair)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl std::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
